//! Display-ready diagnostics and read-only snapshots of them.

use std::path::Path;

use serde::Serialize;

use crate::DocumentId;

/// Source tag stamped on every diagnostic this system produces.
pub const DIAGNOSTIC_SOURCE: &str = "API Governor";

/// Code used for every breaking-change diagnostic.
pub const BREAKING_CHANGE_CODE: &str = "BREAKING_CHANGE";

/// Internal severity scale, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error = 1,
    Warning = 2,
    Information = 3,
    Hint = 4,
}

impl DiagnosticSeverity {
    /// Map the analyzer's severity vocabulary onto the internal scale.
    ///
    /// Total: unknown or absent values become [`Self::Hint`].
    #[must_use]
    pub fn from_analyzer(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return Self::Hint;
        };
        match value.to_ascii_uppercase().as_str() {
            "BLOCKER" | "ERROR" => Self::Error,
            "MAJOR" | "WARNING" => Self::Warning,
            "MINOR" => Self::Information,
            _ => Self::Hint,
        }
    }

    #[must_use]
    pub fn is_error(self) -> bool {
        self == Self::Error
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Information => "info",
            Self::Hint => "hint",
        }
    }
}

/// A single-line span. Lines and columns are 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiagnosticRange {
    line: u32,
    start_col: u32,
    end_col: u32,
}

impl DiagnosticRange {
    #[must_use]
    pub fn on_line(line: u32, start_col: u32, end_col: u32) -> Self {
        Self {
            line,
            start_col,
            end_col: end_col.max(start_col),
        }
    }

    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    #[must_use]
    pub fn start_col(&self) -> u32 {
        self.start_col
    }

    #[must_use]
    pub fn end_col(&self) -> u32 {
        self.end_col
    }
}

/// A problem record derived from an analyzer finding or breaking change.
///
/// Fields are private; diagnostics are projections of analyzer output and are
/// never edited after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    range: DiagnosticRange,
    message: String,
    severity: DiagnosticSeverity,
    source: &'static str,
    code: String,
}

impl Diagnostic {
    #[must_use]
    pub fn new(
        range: DiagnosticRange,
        message: String,
        severity: DiagnosticSeverity,
        code: String,
    ) -> Self {
        Self {
            range,
            message,
            severity,
            source: DIAGNOSTIC_SOURCE,
            code,
        }
    }

    #[must_use]
    pub fn range(&self) -> DiagnosticRange {
        self.range
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn severity(&self) -> DiagnosticSeverity {
        self.severity
    }

    #[must_use]
    pub fn source(&self) -> &str {
        self.source
    }

    /// Rule id, or [`BREAKING_CHANGE_CODE`].
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Format as `path:line:col: severity: message` (1-indexed for display).
    ///
    /// Messages already carry their `[rule]` or `[BREAKING]` prefix.
    #[must_use]
    pub fn display_with_path(&self, path: &Path) -> String {
        format!(
            "{}:{}:{}: {}: {}",
            path.display(),
            self.range.line + 1,
            self.range.start_col + 1,
            self.severity.label(),
            self.message,
        )
    }
}

/// Immutable view of every document's diagnostics, suitable for rendering.
///
/// Counts are computed from `documents` rather than cached alongside it.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticsSnapshot {
    documents: Vec<(DocumentId, Vec<Diagnostic>)>,
}

impl DiagnosticsSnapshot {
    /// Build a snapshot, ordering documents with errors first, then by path.
    #[must_use]
    pub fn new(mut documents: Vec<(DocumentId, Vec<Diagnostic>)>) -> Self {
        documents.sort_by(|a, b| {
            let a_has_errors = a.1.iter().any(|d| d.severity().is_error());
            let b_has_errors = b.1.iter().any(|d| d.severity().is_error());
            b_has_errors.cmp(&a_has_errors).then_with(|| a.0.cmp(&b.0))
        });
        Self { documents }
    }

    #[must_use]
    pub fn documents(&self) -> &[(DocumentId, Vec<Diagnostic>)] {
        &self.documents
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }

    fn count_by_severity(&self, severity: DiagnosticSeverity) -> usize {
        self.documents
            .iter()
            .flat_map(|(_, items)| items)
            .filter(|d| d.severity() == severity)
            .count()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.count_by_severity(DiagnosticSeverity::Error)
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count_by_severity(DiagnosticSeverity::Warning)
    }

    #[must_use]
    pub fn info_count(&self) -> usize {
        self.count_by_severity(DiagnosticSeverity::Information)
    }

    #[must_use]
    pub fn hint_count(&self) -> usize {
        self.count_by_severity(DiagnosticSeverity::Hint)
    }

    #[must_use]
    pub fn total_count(&self) -> usize {
        self.documents.iter().map(|(_, items)| items.len()).sum()
    }

    /// Compact status like "E:3 W:5"; empty when there is nothing to show.
    #[must_use]
    pub fn status_string(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        format!("E:{} W:{}", self.error_count(), self.warning_count())
    }
}
