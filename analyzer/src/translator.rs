//! Translate raw analyzer output into diagnostics.

use governor_types::{
    BREAKING_CHANGE_CODE, Diagnostic, DiagnosticRange, DiagnosticSeverity,
};

use crate::protocol::{AnalysisResult, BreakingChange, Finding, ResultParseError};

/// Width of the synthetic span; the contract carries no column information.
pub const FINDING_SPAN_WIDTH: u32 = 100;

const UNKNOWN_RULE: &str = "unknown";

/// Outcome of translating one raw result.
#[derive(Debug)]
pub enum Translation {
    Structured {
        diagnostics: Vec<Diagnostic>,
        result: AnalysisResult,
    },
    /// Output was not the structured contract. Carries no diagnostics.
    Unstructured { error: ResultParseError },
}

impl Translation {
    /// Translated diagnostics; empty for unstructured output.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::Structured { diagnostics, .. } => diagnostics,
            Self::Unstructured { .. } => &[],
        }
    }

    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        match self {
            Self::Structured { diagnostics, .. } => diagnostics,
            Self::Unstructured { .. } => Vec::new(),
        }
    }

    #[must_use]
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Structured { .. })
    }
}

/// Parse `raw` and convert findings, then breaking changes, preserving order.
///
/// Never fails: unparsable output becomes [`Translation::Unstructured`].
#[must_use]
pub fn translate(raw: &str) -> Translation {
    let result = match AnalysisResult::parse(raw) {
        Ok(result) => result,
        Err(error) => {
            tracing::warn!(error = %error, bytes = raw.len(), "Analyzer output is unstructured");
            return Translation::Unstructured { error };
        }
    };

    if let Some(status) = &result.status {
        tracing::debug!(status = %status, "Analyzer reported status");
    }

    let diagnostics = result
        .findings
        .iter()
        .map(finding_to_diagnostic)
        .chain(result.breaking_changes.iter().map(breaking_change_to_diagnostic))
        .collect();

    Translation::Structured {
        diagnostics,
        result,
    }
}

fn finding_to_diagnostic(finding: &Finding) -> Diagnostic {
    let rule_id = finding.rule_id.as_deref().unwrap_or(UNKNOWN_RULE);
    let line = finding.line.map_or(0, |line| line - 1);
    Diagnostic::new(
        DiagnosticRange::on_line(line, 0, FINDING_SPAN_WIDTH),
        format!(
            "[{rule_id}] {}",
            finding.message.as_deref().unwrap_or_default()
        ),
        DiagnosticSeverity::from_analyzer(finding.severity.as_deref()),
        rule_id.to_string(),
    )
}

/// Breaking changes are always errors, anchored at the document start.
fn breaking_change_to_diagnostic(change: &BreakingChange) -> Diagnostic {
    Diagnostic::new(
        DiagnosticRange::on_line(0, 0, FINDING_SPAN_WIDTH),
        format!(
            "[BREAKING] {} - {}",
            change.description.as_deref().unwrap_or_default(),
            change.client_impact.as_deref().unwrap_or_default()
        ),
        DiagnosticSeverity::Error,
        BREAKING_CHANGE_CODE.to_string(),
    )
}
