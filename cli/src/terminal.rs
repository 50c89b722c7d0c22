//! [`EditorHost`] for a plain terminal.
//!
//! Results (side-channel text, opened reports) go to stdout; user messages go
//! to stderr so stdout stays machine-readable.

use std::fs;
use std::future::Future;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use governor_engine::{EditorHost, OutputChannel};
use governor_types::{ContentKind, Document, DocumentId};

type Sink = Mutex<Box<dyn Write + Send>>;

pub struct TerminalHost {
    out: Sink,
    err: Sink,
    workspace: Option<PathBuf>,
    open_reports: bool,
    active: Mutex<Option<Document>>,
    open: Mutex<Vec<Document>>,
}

impl TerminalHost {
    pub fn stdio(workspace: Option<PathBuf>, open_reports: bool) -> Self {
        Self::with_writers(
            Box::new(io::stdout()),
            Box::new(io::stderr()),
            workspace,
            open_reports,
        )
    }

    pub fn with_writers(
        out: Box<dyn Write + Send>,
        err: Box<dyn Write + Send>,
        workspace: Option<PathBuf>,
        open_reports: bool,
    ) -> Self {
        Self {
            out: Mutex::new(out),
            err: Mutex::new(err),
            workspace,
            open_reports,
            active: Mutex::new(None),
            open: Mutex::new(Vec::new()),
        }
    }

    pub fn set_active(&self, document: Option<Document>) {
        *self.active.lock().unwrap_or_else(PoisonError::into_inner) = document;
    }

    pub fn set_open(&self, documents: Vec<Document>) {
        *self.open.lock().unwrap_or_else(PoisonError::into_inner) = documents;
    }

    fn write_out(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(out, "{text}");
    }

    fn write_err(&self, text: &str) {
        let mut err = self.err.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(err, "{text}");
    }
}

impl EditorHost for TerminalHost {
    fn show_info(&self, message: &str) {
        self.write_err(message);
    }

    fn show_warning(&self, message: &str) {
        self.write_err(&format!("warning: {message}"));
    }

    fn show_error(&self, message: &str) {
        self.write_err(&format!("error: {message}"));
    }

    fn append_line(&self, channel: OutputChannel, text: &str) {
        tracing::trace!(channel = channel.name(), bytes = text.len(), "Channel output");
        self.write_out(text);
    }

    fn clear_channel(&self, _channel: OutputChannel) {}

    fn reveal_channel(&self, _channel: OutputChannel) {
        let _ = self
            .out
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush();
    }

    fn offer_action(&self, message: &str, action: &str) -> impl Future<Output = bool> + Send {
        if self.open_reports {
            self.write_err(&format!("{message} ({action})"));
        } else {
            self.write_err(message);
        }
        std::future::ready(self.open_reports)
    }

    fn pick_baseline(&self) -> impl Future<Output = Option<PathBuf>> + Send {
        async {
            tokio::task::spawn_blocking(prompt_baseline)
                .await
                .ok()
                .flatten()
        }
    }

    fn open_artifact(&self, path: &Path) -> io::Result<()> {
        let text = fs::read_to_string(path)?;
        self.write_out(&text);
        Ok(())
    }

    fn workspace_root(&self) -> Option<PathBuf> {
        self.workspace.clone()
    }

    fn active_document(&self) -> Option<Document> {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn open_documents(&self) -> Vec<Document> {
        self.open
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Ask on stdin for a baseline path. Empty input or EOF cancels.
fn prompt_baseline() -> Option<PathBuf> {
    let mut stderr = io::stderr();
    let _ = write!(stderr, "Baseline OpenAPI spec: ");
    let _ = stderr.flush();

    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => parse_baseline_answer(&line),
    }
}

fn parse_baseline_answer(line: &str) -> Option<PathBuf> {
    let trimmed = line.trim();
    (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
}

/// Read a file from disk as an open document.
pub fn load_document(path: &Path) -> Result<Document> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(Document::new(
        DocumentId::new(path),
        ContentKind::from_path(path),
        text,
    ))
}
