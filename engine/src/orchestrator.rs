//! Analysis orchestration: classify, invoke, translate, commit, report.
//!
//! Each call is an independent unit of work. Overlapping calls for the same
//! document are not serialized; the registry keeps whichever completes last.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use governor_analyzer::{
    Analyzer, DiagnosticRegistry, GatewayError, Translation, is_governed, translate,
};
use governor_config::{DEFAULT_POLICY, GovernorConfig};
use governor_types::{AnalysisRequest, Document};

use crate::error::AnalysisError;
use crate::host::{EditorHost, OutputChannel};
use crate::outcome::{AnalysisOutcome, ArtifactState, LintSummary, SkipReason, TriggerSource};

/// Report directory created under the workspace root.
pub const REPORT_DIR_NAME: &str = ".api-governor";
pub const REPORT_FILE_NAME: &str = "API_REVIEW.md";
pub const DIFF_HEADER: &str = "=== API Governor Breaking Change Analysis ===";

const NO_ACTIVE_FILE: &str = "No active file";
const NOT_A_SPEC: &str = "Current file is not an OpenAPI specification";
const OPEN_A_SPEC_FIRST: &str = "Open an OpenAPI file first";
const OPEN_REPORT_ACTION: &str = "Open Report";

/// Per-request inputs the orchestrator passes to the analyzer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisSettings {
    pub policy: String,
    /// Default diff baseline; the host is asked when absent.
    pub baseline: Option<PathBuf>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            policy: DEFAULT_POLICY.to_string(),
            baseline: None,
        }
    }
}

impl AnalysisSettings {
    #[must_use]
    pub fn from_config(config: &GovernorConfig) -> Self {
        Self {
            policy: config.policy.clone(),
            baseline: config.baseline_spec.clone(),
        }
    }
}

pub struct AnalysisOrchestrator<A, H> {
    analyzer: Arc<A>,
    host: Arc<H>,
    registry: Arc<DiagnosticRegistry>,
    settings: Arc<AnalysisSettings>,
}

impl<A, H> Clone for AnalysisOrchestrator<A, H> {
    fn clone(&self) -> Self {
        Self {
            analyzer: Arc::clone(&self.analyzer),
            host: Arc::clone(&self.host),
            registry: Arc::clone(&self.registry),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<A: Analyzer, H: EditorHost> AnalysisOrchestrator<A, H> {
    #[must_use]
    pub fn new(analyzer: A, host: Arc<H>, settings: AnalysisSettings) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            host,
            registry: Arc::new(DiagnosticRegistry::new()),
            settings: Arc::new(settings),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<DiagnosticRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    /// Lint the host's active document.
    pub async fn lint_active(&self) -> AnalysisOutcome {
        let Some(document) = self.host.active_document() else {
            self.host.show_warning(NO_ACTIVE_FILE);
            return AnalysisOutcome::Skipped(SkipReason::NoActiveDocument);
        };
        self.lint(&document, TriggerSource::Command).await
    }

    /// Lint `document` and replace its registry entry.
    ///
    /// Ungoverned documents are skipped; only explicit commands warn about it.
    /// Unstructured output commits an empty set and goes to the side channel.
    pub async fn lint(&self, document: &Document, source: TriggerSource) -> AnalysisOutcome {
        if !is_governed(document) {
            tracing::debug!(document = %document.id(), ?source, "Skipping ungoverned document");
            if source.is_explicit() {
                self.host.show_warning(NOT_A_SPEC);
            }
            return AnalysisOutcome::Skipped(SkipReason::NotGoverned);
        }

        let id = document.id().clone();
        let request = AnalysisRequest::lint(id.path(), self.settings.policy.as_str());
        tracing::info!(document = %id, ?source, "Linting");

        let raw = match self.analyzer.invoke(&request).await {
            Ok(raw) => raw,
            Err(err) => return self.fail("API Governor error", err),
        };
        if !raw.exited_cleanly() {
            tracing::debug!(exit_code = ?raw.exit_code(), "Analyzer exited non-zero but produced output");
        }

        match translate(raw.text()) {
            Translation::Structured { diagnostics, .. } => {
                let summary = LintSummary::from_diagnostics(&diagnostics);
                self.registry.set(id.clone(), diagnostics);
                if let Some(notice) = summary.notice() {
                    notice.deliver(&*self.host);
                }
                AnalysisOutcome::Committed {
                    document: id,
                    summary,
                }
            }
            Translation::Unstructured { .. } => {
                self.registry.set(id.clone(), Vec::new());
                self.host.append_line(OutputChannel::Analysis, raw.text());
                self.host.reveal_channel(OutputChannel::Analysis);
                AnalysisOutcome::Degraded {
                    document: id,
                    raw: raw.into_text(),
                }
            }
        }
    }

    /// Diff the active document against `baseline`, the configured baseline,
    /// or one picked by the user, in that order.
    pub async fn diff_active(&self, baseline: Option<PathBuf>) -> AnalysisOutcome {
        let Some(document) = self.host.active_document() else {
            self.host.show_warning(OPEN_A_SPEC_FIRST);
            return AnalysisOutcome::Skipped(SkipReason::NoActiveDocument);
        };
        self.diff(&document, baseline).await
    }

    /// Run a baseline diff. Results go to the diff channel, never the registry.
    pub async fn diff(&self, document: &Document, baseline: Option<PathBuf>) -> AnalysisOutcome {
        if !is_governed(document) {
            self.host.show_warning(OPEN_A_SPEC_FIRST);
            return AnalysisOutcome::Skipped(SkipReason::NotGoverned);
        }

        let baseline = match baseline.or_else(|| self.settings.baseline.clone()) {
            Some(baseline) => baseline,
            None => match self.host.pick_baseline().await {
                Some(picked) => picked,
                None => {
                    tracing::debug!(document = %document.id(), "Diff cancelled, no baseline");
                    return AnalysisOutcome::Cancelled;
                }
            },
        };

        let id = document.id().clone();
        let request =
            AnalysisRequest::diff(id.path(), self.settings.policy.as_str(), baseline.as_path());
        tracing::info!(document = %id, baseline = %baseline.display(), "Diffing");

        let raw = match self.analyzer.invoke(&request).await {
            Ok(raw) => raw,
            Err(err) => return self.fail("API Governor diff error", err),
        };

        self.host.clear_channel(OutputChannel::Diff);
        self.host.append_line(OutputChannel::Diff, DIFF_HEADER);
        self.host.append_line(OutputChannel::Diff, "");
        self.host.append_line(OutputChannel::Diff, raw.text());
        self.host.reveal_channel(OutputChannel::Diff);

        let breaking_changes = match translate(raw.text()) {
            Translation::Structured { result, .. } => result.breaking_changes.len(),
            Translation::Unstructured { .. } => 0,
        };
        AnalysisOutcome::DiffReported {
            document: id,
            raw: raw.into_text(),
            breaking_changes,
        }
    }

    pub async fn report_active(&self) -> AnalysisOutcome {
        let Some(document) = self.host.active_document() else {
            self.host.show_warning(OPEN_A_SPEC_FIRST);
            return AnalysisOutcome::Skipped(SkipReason::NoActiveDocument);
        };
        self.report(&document).await
    }

    /// Generate a persisted report and offer to open it.
    pub async fn report(&self, document: &Document) -> AnalysisOutcome {
        if !is_governed(document) {
            self.host.show_warning(OPEN_A_SPEC_FIRST);
            return AnalysisOutcome::Skipped(SkipReason::NotGoverned);
        }

        let id = document.id().clone();
        let output_dir = self.report_dir(document);
        let request = AnalysisRequest::report(
            id.path(),
            self.settings.policy.as_str(),
            output_dir.as_path(),
        );
        tracing::info!(document = %id, output_dir = %output_dir.display(), "Generating report");

        if let Err(err) = self.analyzer.invoke(&request).await {
            return self.fail("API Governor report error", err);
        }

        let report_path = output_dir.join(REPORT_FILE_NAME);
        let accepted = self
            .host
            .offer_action(
                &format!("Report generated in {}", output_dir.display()),
                OPEN_REPORT_ACTION,
            )
            .await;

        let artifact = if accepted {
            match self.host.open_artifact(&report_path) {
                Ok(()) => ArtifactState::Opened,
                Err(source) => {
                    let err = AnalysisError::ArtifactOpen {
                        path: report_path.clone(),
                        source,
                    };
                    tracing::warn!(error = %err, "Report open failed");
                    self.host.show_error(&format!("API Governor: {err}"));
                    ArtifactState::OpenFailed(err)
                }
            }
        } else {
            ArtifactState::Declined
        };

        AnalysisOutcome::ReportGenerated {
            document: id,
            output_dir,
            report_path,
            artifact,
        }
    }

    /// `<workspace>/.api-governor`, or the document's own directory when the
    /// host has no workspace.
    #[must_use]
    pub fn report_dir(&self, document: &Document) -> PathBuf {
        match self.host.workspace_root() {
            Some(root) => root.join(REPORT_DIR_NAME),
            None => document
                .id()
                .path()
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
        }
    }

    fn fail(&self, prefix: &str, err: GatewayError) -> AnalysisOutcome {
        tracing::warn!(error = %err, "Analysis failed");
        self.host.show_error(&format!("{prefix}: {err}"));
        AnalysisOutcome::Failed(AnalysisError::ExternalProcess(err))
    }
}
