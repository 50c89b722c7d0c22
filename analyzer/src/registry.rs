//! Authoritative per-document diagnostic sets.
//!
//! Each entry is replaced whole in one write. Readers receive an `Arc`
//! snapshot, so a later `set` never disturbs a reader still iterating the
//! previous set.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use governor_types::{Diagnostic, DiagnosticsSnapshot, DocumentId};

#[derive(Debug, Default)]
pub struct DiagnosticRegistry {
    entries: RwLock<HashMap<DocumentId, Arc<[Diagnostic]>>>,
}

impl DiagnosticRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the document's diagnostics. An empty set is still an entry.
    pub fn set(&self, id: DocumentId, diagnostics: Vec<Diagnostic>) {
        tracing::debug!(document = %id, count = diagnostics.len(), "Diagnostics committed");
        let diagnostics: Arc<[Diagnostic]> = diagnostics.into();
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, diagnostics);
    }

    /// Current diagnostics for the document, empty when there is no entry.
    #[must_use]
    pub fn get(&self, id: &DocumentId) -> Arc<[Diagnostic]> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .unwrap_or_else(|| Arc::from(Vec::new()))
    }

    #[must_use]
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    /// Drop the document's entry. Returns whether one existed.
    pub fn clear(&self, id: &DocumentId) -> bool {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .is_some()
    }

    pub fn clear_all(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy every entry into a sorted, immutable snapshot.
    #[must_use]
    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        let documents = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, items)| (id.clone(), items.to_vec()))
            .collect();
        DiagnosticsSnapshot::new(documents)
    }
}
