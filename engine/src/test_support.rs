//! Scripted analyzer and recording host for engine tests.

use std::collections::VecDeque;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use governor_analyzer::{Analyzer, GatewayError, RawAnalysisOutput};
use governor_types::{
    AnalysisRequest, ContentKind, Diagnostic, DiagnosticRange, DiagnosticSeverity, Document,
    DocumentId,
};
use tokio::sync::oneshot;

use crate::host::{EditorHost, OutputChannel};

pub type Reply = Result<RawAnalysisOutput, GatewayError>;

enum Scripted {
    Ready(Reply),
    Gated(oneshot::Receiver<Reply>),
}

/// Analyzer that answers from a queue, in call order.
#[derive(Default)]
pub struct ScriptedAnalyzer {
    replies: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<AnalysisRequest>>,
}

impl ScriptedAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, raw: &str) -> Self {
        self.push(Scripted::Ready(Ok(RawAnalysisOutput::new(raw, Some(0), true))))
    }

    pub fn fail(self, message: &str) -> Self {
        self.push(Scripted::Ready(Err(GatewayError::ProcessFailure {
            message: message.to_string(),
        })))
    }

    /// Queue a reply that resolves only when the returned sender fires.
    pub fn gated(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().unwrap().push_back(Scripted::Gated(rx));
        tx
    }

    pub fn requests(&self) -> Vec<AnalysisRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn push(self, scripted: Scripted) -> Self {
        self.replies.lock().unwrap().push_back(scripted);
        self
    }
}

impl Analyzer for ScriptedAnalyzer {
    fn invoke(&self, request: &AnalysisRequest) -> impl Future<Output = Reply> + Send {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.replies.lock().unwrap().pop_front();
        async move {
            match next {
                Some(Scripted::Ready(reply)) => reply,
                Some(Scripted::Gated(rx)) => rx.await.unwrap_or_else(|_| {
                    Err(GatewayError::ProcessFailure {
                        message: "gate dropped".into(),
                    })
                }),
                None => Err(GatewayError::ProcessFailure {
                    message: "no scripted reply".into(),
                }),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Info(String),
    Warning(String),
    Error(String),
    Line(OutputChannel, String),
    Clear(OutputChannel),
    Reveal(OutputChannel),
    Offer { message: String, action: String },
    PickBaseline,
    Opened(PathBuf),
}

#[derive(Default)]
pub struct RecordingHost {
    events: Mutex<Vec<HostEvent>>,
    active: Mutex<Option<Document>>,
    open: Mutex<Vec<Document>>,
    workspace: Option<PathBuf>,
    picked_baseline: Option<PathBuf>,
    accept_offers: bool,
    fail_open: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workspace(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace = Some(root.into());
        self
    }

    pub fn with_picked_baseline(mut self, path: impl Into<PathBuf>) -> Self {
        self.picked_baseline = Some(path.into());
        self
    }

    pub fn accepting_offers(mut self) -> Self {
        self.accept_offers = true;
        self
    }

    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub fn set_active(&self, document: Option<Document>) {
        *self.active.lock().unwrap() = document;
    }

    pub fn set_open(&self, documents: Vec<Document>) {
        *self.open.lock().unwrap() = documents;
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: HostEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl EditorHost for RecordingHost {
    fn show_info(&self, message: &str) {
        self.record(HostEvent::Info(message.to_string()));
    }

    fn show_warning(&self, message: &str) {
        self.record(HostEvent::Warning(message.to_string()));
    }

    fn show_error(&self, message: &str) {
        self.record(HostEvent::Error(message.to_string()));
    }

    fn append_line(&self, channel: OutputChannel, text: &str) {
        self.record(HostEvent::Line(channel, text.to_string()));
    }

    fn clear_channel(&self, channel: OutputChannel) {
        self.record(HostEvent::Clear(channel));
    }

    fn reveal_channel(&self, channel: OutputChannel) {
        self.record(HostEvent::Reveal(channel));
    }

    fn offer_action(&self, message: &str, action: &str) -> impl Future<Output = bool> + Send {
        self.record(HostEvent::Offer {
            message: message.to_string(),
            action: action.to_string(),
        });
        std::future::ready(self.accept_offers)
    }

    fn pick_baseline(&self) -> impl Future<Output = Option<PathBuf>> + Send {
        self.record(HostEvent::PickBaseline);
        std::future::ready(self.picked_baseline.clone())
    }

    fn open_artifact(&self, path: &Path) -> std::io::Result<()> {
        if self.fail_open {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no such file",
            ));
        }
        self.record(HostEvent::Opened(path.to_path_buf()));
        Ok(())
    }

    fn workspace_root(&self) -> Option<PathBuf> {
        self.workspace.clone()
    }

    fn active_document(&self) -> Option<Document> {
        self.active.lock().unwrap().clone()
    }

    fn open_documents(&self) -> Vec<Document> {
        self.open.lock().unwrap().clone()
    }
}

pub fn spec_doc(path: &str) -> Document {
    Document::new(DocumentId::new(path), ContentKind::Yaml, "openapi: 3.0.0\n")
}

pub fn plain_doc(path: &str) -> Document {
    Document::new(DocumentId::new(path), ContentKind::Other, "hello\n")
}

pub fn shared(host: RecordingHost) -> Arc<RecordingHost> {
    Arc::new(host)
}

pub fn sample_diagnostics() -> Vec<Diagnostic> {
    vec![Diagnostic::new(
        DiagnosticRange::on_line(0, 0, 100),
        "[OLD] stale".to_string(),
        DiagnosticSeverity::Error,
        "OLD".to_string(),
    )]
}
