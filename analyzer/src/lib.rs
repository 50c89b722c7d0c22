//! Analyzer-facing half of API Governor.
//!
//! Classifies documents, runs the external policy analyzer as a child
//! process, translates its JSON output into diagnostics, and keeps the
//! per-document diagnostics registry.

pub mod classifier;
pub mod gateway;
pub mod protocol;
pub mod registry;
pub mod translator;

pub use classifier::{Classification, classify, is_governed};
pub use gateway::{
    Analyzer, AnalyzerCommand, AnalyzerGateway, GatewayError, OUTPUT_LIMIT_BYTES, OutputStream,
    RawAnalysisOutput,
};
pub use protocol::{AnalysisResult, BreakingChange, Finding, ResultParseError};
pub use registry::DiagnosticRegistry;
pub use translator::{FINDING_SPAN_WIDTH, Translation, translate};
