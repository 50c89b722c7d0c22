use std::fmt;
use std::path::{Path, PathBuf};

/// What the external analyzer is asked to do with a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisMode {
    /// In-editor diagnostics only.
    Lint,
    /// Compare against a baseline spec; results go to a side channel.
    Diff,
    /// Write a persisted report into an output directory.
    Report,
}

impl AnalysisMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lint => "lint",
            Self::Diff => "diff",
            Self::Report => "report",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single, immutable analysis invocation.
///
/// The mode-specific paths are only reachable through the matching
/// constructor, so a `Lint` request never carries a baseline and a `Diff`
/// request always does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    document_path: PathBuf,
    mode: AnalysisMode,
    policy: String,
    baseline_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
}

impl AnalysisRequest {
    #[must_use]
    pub fn lint(document_path: impl Into<PathBuf>, policy: impl Into<String>) -> Self {
        Self {
            document_path: document_path.into(),
            mode: AnalysisMode::Lint,
            policy: policy.into(),
            baseline_path: None,
            output_dir: None,
        }
    }

    #[must_use]
    pub fn diff(
        document_path: impl Into<PathBuf>,
        policy: impl Into<String>,
        baseline_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            document_path: document_path.into(),
            mode: AnalysisMode::Diff,
            policy: policy.into(),
            baseline_path: Some(baseline_path.into()),
            output_dir: None,
        }
    }

    #[must_use]
    pub fn report(
        document_path: impl Into<PathBuf>,
        policy: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            document_path: document_path.into(),
            mode: AnalysisMode::Report,
            policy: policy.into(),
            baseline_path: None,
            output_dir: Some(output_dir.into()),
        }
    }

    #[must_use]
    pub fn document_path(&self) -> &Path {
        &self.document_path
    }

    #[must_use]
    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    #[must_use]
    pub fn policy(&self) -> &str {
        &self.policy
    }

    /// Present only for [`AnalysisMode::Diff`].
    #[must_use]
    pub fn baseline_path(&self) -> Option<&Path> {
        self.baseline_path.as_deref()
    }

    /// Present only for [`AnalysisMode::Report`].
    #[must_use]
    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }
}
