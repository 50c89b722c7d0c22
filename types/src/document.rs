use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Stable identity of an open document, keyed by the path the host opened.
///
/// Only `.` components and repeated separators are dropped. `..` is kept,
/// since `link/../b.yaml` need not name `b.yaml` when `link` is a symlink;
/// the analyzer receives this path as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(PathBuf);

impl DocumentId {
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self(normalize_path(path.as_ref()))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Final path component, or the whole path when there is none.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.0.file_name().map_or_else(
            || self.0.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        )
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

fn normalize_path(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Declared content kind of a document, the editor's "language id".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Yaml,
    Json,
    Other,
}

impl ContentKind {
    #[must_use]
    pub fn from_language_id(language_id: &str) -> Self {
        match language_id.trim().to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Self::Yaml,
            "json" | "jsonc" => Self::Json,
            _ => Self::Other,
        }
    }

    /// Infer the kind from a file extension, as editors do for new buffers.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(Self::Other, Self::from_language_id)
    }

    #[must_use]
    pub fn is_structured(self) -> bool {
        matches!(self, Self::Yaml | Self::Json)
    }
}

/// An open document as the host sees it: identity, kind, and current text.
#[derive(Debug, Clone)]
pub struct Document {
    id: DocumentId,
    kind: ContentKind,
    text: String,
}

impl Document {
    #[must_use]
    pub fn new(id: DocumentId, kind: ContentKind, text: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}
