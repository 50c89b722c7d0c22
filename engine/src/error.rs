use std::path::PathBuf;

use governor_analyzer::GatewayError;

/// Failures surfaced to the user as errors.
///
/// Classification skips and unstructured analyzer output are outcomes, not
/// errors; see [`crate::AnalysisOutcome`].
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The analyzer could not run or exited abnormally with no stdout.
    #[error(transparent)]
    ExternalProcess(#[from] GatewayError),
    /// The generated report exists (or should) but the host could not open it.
    #[error("could not open report {}: {source}", path.display())]
    ArtifactOpen {
        path: PathBuf,
        source: std::io::Error,
    },
}
