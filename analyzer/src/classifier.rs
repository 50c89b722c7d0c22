//! Cheap admission filter deciding which open documents are governed specs.
//!
//! Nothing here parses the document; a match only means "worth sending to
//! the analyzer".

use governor_types::Document;

/// Filename suffixes that mark a governed spec, compared case-insensitively.
const GOVERNED_SUFFIXES: [&str; 6] = [
    ".openapi.yaml",
    ".openapi.json",
    "openapi.yaml",
    "openapi.json",
    "swagger.yaml",
    "swagger.json",
];

/// Literal markers sniffed from YAML/JSON text. Case-sensitive.
const CONTENT_MARKERS: [&str; 4] = ["openapi:", "\"openapi\"", "swagger:", "\"swagger\""];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Matched one of the fixed filename suffixes.
    FileName,
    /// YAML/JSON document containing an OpenAPI or Swagger marker.
    Content,
    NotGoverned,
}

impl Classification {
    #[must_use]
    pub fn is_governed(self) -> bool {
        !matches!(self, Self::NotGoverned)
    }
}

#[must_use]
pub fn classify(document: &Document) -> Classification {
    let file_name = document.id().path().to_string_lossy().to_lowercase();
    if GOVERNED_SUFFIXES
        .iter()
        .any(|suffix| file_name.ends_with(suffix))
    {
        return Classification::FileName;
    }

    if document.kind().is_structured()
        && CONTENT_MARKERS
            .iter()
            .any(|marker| document.text().contains(marker))
    {
        return Classification::Content;
    }

    Classification::NotGoverned
}

#[must_use]
pub fn is_governed(document: &Document) -> bool {
    classify(document).is_governed()
}
