//! Process-lifetime wiring from host events to the orchestrator.
//!
//! [`EventTriggers`] is the single context object a host creates at startup.
//! Every trigger spawns its analysis on the current tokio runtime and returns
//! immediately, so the host stays free to deliver further events while an
//! analysis is outstanding.

use std::path::PathBuf;

use governor_analyzer::Analyzer;
use governor_types::{Document, DocumentId};
use tokio::task::JoinHandle;

use crate::host::EditorHost;
use crate::orchestrator::AnalysisOrchestrator;
use crate::outcome::{AnalysisOutcome, TriggerSource};

pub struct EventTriggers<A, H> {
    orchestrator: AnalysisOrchestrator<A, H>,
    auto_lint: bool,
}

impl<A: Analyzer, H: EditorHost> EventTriggers<A, H> {
    #[must_use]
    pub fn new(orchestrator: AnalysisOrchestrator<A, H>, auto_lint: bool) -> Self {
        Self {
            orchestrator,
            auto_lint,
        }
    }

    #[must_use]
    pub fn orchestrator(&self) -> &AnalysisOrchestrator<A, H> {
        &self.orchestrator
    }

    /// Run the open trigger for every document the host already has open.
    ///
    /// Must be called within a tokio runtime.
    pub fn activate(&self) -> Vec<JoinHandle<AnalysisOutcome>> {
        let documents = self.orchestrator.host().open_documents();
        tracing::info!(documents = documents.len(), auto_lint = self.auto_lint, "Activating");
        documents
            .into_iter()
            .map(|document| self.on_open(document))
            .collect()
    }

    pub fn on_open(&self, document: Document) -> JoinHandle<AnalysisOutcome> {
        self.spawn_lint(document, TriggerSource::Open)
    }

    /// Lint on save. `None` when auto-lint is off.
    pub fn on_save(&self, document: Document) -> Option<JoinHandle<AnalysisOutcome>> {
        if !self.auto_lint {
            tracing::debug!(document = %document.id(), "Auto-lint disabled, ignoring save");
            return None;
        }
        Some(self.spawn_lint(document, TriggerSource::Save))
    }

    /// The host closed the document; drop its diagnostics.
    pub fn on_close(&self, id: &DocumentId) {
        if self.orchestrator.registry().clear(id) {
            tracing::debug!(document = %id, "Cleared diagnostics for closed document");
        }
    }

    pub fn lint_command(&self) -> JoinHandle<AnalysisOutcome> {
        let orchestrator = self.orchestrator.clone();
        tokio::spawn(async move { orchestrator.lint_active().await })
    }

    pub fn diff_command(&self, baseline: Option<PathBuf>) -> JoinHandle<AnalysisOutcome> {
        let orchestrator = self.orchestrator.clone();
        tokio::spawn(async move { orchestrator.diff_active(baseline).await })
    }

    pub fn report_command(&self) -> JoinHandle<AnalysisOutcome> {
        let orchestrator = self.orchestrator.clone();
        tokio::spawn(async move { orchestrator.report_active().await })
    }

    /// Tear down: every registry entry is cleared. Outstanding analyses are
    /// not cancelled.
    pub fn deactivate(self) {
        let registry = self.orchestrator.registry();
        tracing::info!(documents = registry.len(), "Deactivating");
        registry.clear_all();
    }

    fn spawn_lint(&self, document: Document, source: TriggerSource) -> JoinHandle<AnalysisOutcome> {
        let orchestrator = self.orchestrator.clone();
        tokio::spawn(async move { orchestrator.lint(&document, source).await })
    }
}
