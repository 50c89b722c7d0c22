//! Terminal states of one analysis and the user-facing summary they produce.

use std::path::PathBuf;

use governor_types::{Diagnostic, DiagnosticSeverity, DocumentId};

use crate::error::AnalysisError;
use crate::host::EditorHost;

/// What started an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSource {
    Open,
    Save,
    /// An explicit user command.
    Command,
}

impl TriggerSource {
    #[must_use]
    pub fn is_explicit(self) -> bool {
        matches!(self, Self::Command)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoActiveDocument,
    NotGoverned,
}

/// Per-severity counts of one committed lint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LintSummary {
    pub errors: usize,
    pub warnings: usize,
    pub information: usize,
    pub hints: usize,
}

impl LintSummary {
    #[must_use]
    pub fn from_diagnostics(diagnostics: &[Diagnostic]) -> Self {
        diagnostics
            .iter()
            .fold(Self::default(), |mut summary, diagnostic| {
                match diagnostic.severity() {
                    DiagnosticSeverity::Error => summary.errors += 1,
                    DiagnosticSeverity::Warning => summary.warnings += 1,
                    DiagnosticSeverity::Information => summary.information += 1,
                    DiagnosticSeverity::Hint => summary.hints += 1,
                }
                summary
            })
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.errors + self.warnings + self.information + self.hints
    }

    /// Message for the host, if any. Runs with only information or hint
    /// diagnostics stay quiet.
    #[must_use]
    pub fn notice(&self) -> Option<Notice> {
        if self.errors > 0 {
            Some(Notice::Error(format!(
                "API Governor: {} blockers, {} warnings",
                self.errors, self.warnings
            )))
        } else if self.warnings > 0 {
            Some(Notice::Warning(format!(
                "API Governor: {} warnings",
                self.warnings
            )))
        } else if self.total() == 0 {
            Some(Notice::Info("API Governor: All checks passed ✓".to_string()))
        } else {
            None
        }
    }
}

/// A one-line user message with its level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Warning(String),
    Error(String),
}

impl Notice {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Info(text) | Self::Warning(text) | Self::Error(text) => text,
        }
    }

    pub fn deliver(&self, host: &impl EditorHost) {
        match self {
            Self::Info(text) => host.show_info(text),
            Self::Warning(text) => host.show_warning(text),
            Self::Error(text) => host.show_error(text),
        }
    }
}

/// What happened to the offer to open a generated report.
#[derive(Debug)]
pub enum ArtifactState {
    Declined,
    Opened,
    OpenFailed(AnalysisError),
}

#[derive(Debug)]
pub enum AnalysisOutcome {
    /// Nothing ran.
    Skipped(SkipReason),
    /// Lint diagnostics replaced the registry entry.
    Committed {
        document: DocumentId,
        summary: LintSummary,
    },
    /// Lint output was not structured; an empty set was committed and the
    /// raw text went to the side channel.
    Degraded { document: DocumentId, raw: String },
    DiffReported {
        document: DocumentId,
        raw: String,
        breaking_changes: usize,
    },
    ReportGenerated {
        document: DocumentId,
        output_dir: PathBuf,
        report_path: PathBuf,
        artifact: ArtifactState,
    },
    /// The user dismissed a required prompt.
    Cancelled,
    Failed(AnalysisError),
}

impl AnalysisOutcome {
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    #[must_use]
    pub fn summary(&self) -> Option<&LintSummary> {
        match self {
            Self::Committed { summary, .. } => Some(summary),
            _ => None,
        }
    }

    #[must_use]
    pub fn document(&self) -> Option<&DocumentId> {
        match self {
            Self::Committed { document, .. }
            | Self::Degraded { document, .. }
            | Self::DiffReported { document, .. }
            | Self::ReportGenerated { document, .. } => Some(document),
            Self::Skipped(_) | Self::Cancelled | Self::Failed(_) => None,
        }
    }
}
