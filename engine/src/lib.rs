//! Orchestration for API Governor.
//!
//! The host implements [`EditorHost`], builds an [`AnalysisOrchestrator`]
//! around an [`governor_analyzer::Analyzer`], and drives it through
//! [`EventTriggers`].

mod error;
mod host;
mod orchestrator;
mod outcome;
mod triggers;

#[cfg(test)]
mod test_support;

pub use error::AnalysisError;
pub use host::{EditorHost, OutputChannel};
pub use orchestrator::{
    AnalysisOrchestrator, AnalysisSettings, DIFF_HEADER, REPORT_DIR_NAME, REPORT_FILE_NAME,
};
pub use outcome::{
    AnalysisOutcome, ArtifactState, LintSummary, Notice, SkipReason, TriggerSource,
};
pub use triggers::EventTriggers;
