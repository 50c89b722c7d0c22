//! Core domain types for API Governor.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

mod diagnostic;
mod document;
mod request;

pub use diagnostic::{
    BREAKING_CHANGE_CODE, DIAGNOSTIC_SOURCE, Diagnostic, DiagnosticRange, DiagnosticSeverity,
    DiagnosticsSnapshot,
};
pub use document::{ContentKind, Document, DocumentId};
pub use request::{AnalysisMode, AnalysisRequest};
