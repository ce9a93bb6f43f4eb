use crate::document::{Document, Snapshot, merge_snapshot};
use crate::generation::GeneratedContent;
use crate::persistence::{Persistence, SnapshotStore};
use crate::sections::{SECTION_ORDER, SectionId};

/// Owner of the live [`Document`] and its only writer.
///
/// Every mutation is a single field (or whole-document) replacement followed
/// by exactly one save. Callers in live mode are expected not to route text
/// edits here; the store itself does not know about presentation focus.
#[derive(Debug)]
pub struct EditorStore<S> {
    document: Document,
    persistence: Persistence<S>,
    last_save_error: Option<String>,
}

impl<S: SnapshotStore> EditorStore<S> {
    /// Creates the store from whatever the persistence slot holds.
    pub fn open(persistence: Persistence<S>) -> Self {
        let document = persistence.load();
        Self {
            document,
            persistence,
            last_save_error: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    /// Takes the message of the most recent failed save, if any.
    pub fn take_save_error(&mut self) -> Option<String> {
        self.last_save_error.take()
    }

    pub fn set_reference(&mut self, reference: impl Into<String>) {
        self.document.reference = reference.into();
        self.persist();
    }

    pub fn set_verses(&mut self, verses: impl Into<String>) {
        self.document.verses = verses.into();
        self.persist();
    }

    pub fn set_statement(&mut self, statement: impl Into<String>) {
        self.document.statement = statement.into();
        self.persist();
    }

    pub fn set_section_content(&mut self, id: SectionId, content: impl Into<String>) {
        self.document.sections.get_mut(id).content = content.into();
        self.persist();
    }

    /// String-keyed variant of [`set_section_content`](Self::set_section_content).
    /// Unknown keys change nothing and return `false`.
    pub fn set_section_content_by_key(&mut self, key: &str, content: impl Into<String>) -> bool {
        let Some(id) = SectionId::from_key(key) else {
            tracing::debug!(key, "ignoring content for unknown section");
            return false;
        };
        self.set_section_content(id, content);
        true
    }

    pub fn toggle_expanded(&mut self, id: SectionId) {
        let section = self.document.sections.get_mut(id);
        section.expanded = !section.expanded;
        self.persist();
    }

    pub fn toggle_expanded_by_key(&mut self, key: &str) -> bool {
        let Some(id) = SectionId::from_key(key) else {
            tracing::debug!(key, "ignoring toggle for unknown section");
            return false;
        };
        self.toggle_expanded(id);
        true
    }

    /// Replaces the document with an external snapshot merged over registry
    /// defaults. Sections the snapshot does not mention end up at their
    /// defaults, not at their previous values.
    pub fn replace_all(&mut self, snapshot: Snapshot) {
        self.document = merge_snapshot(snapshot);
        self.persist();
    }

    /// Writes generated text into the statement and every section at once.
    /// Reference, verses and expanded flags are kept.
    pub fn apply_generated(&mut self, generated: &GeneratedContent) {
        let mut next = self.document.clone();
        next.statement = generated.statement.clone();
        for id in SECTION_ORDER {
            next.sections.get_mut(id).content = generated.content(id).to_string();
        }
        self.document = next;
        self.persist();
    }

    /// Restores defaults and clears the storage slot, but only if `confirm`
    /// agrees. Returns whether the reset happened.
    pub fn reset(&mut self, confirm: impl FnOnce() -> bool) -> bool {
        if !confirm() {
            return false;
        }
        self.document = Document::new();
        if let Err(err) = self.persistence.clear() {
            tracing::warn!(error = %err, "failed to clear stored snapshot");
            self.last_save_error = Some(err.to_string());
        }
        tracing::info!("document reset to defaults");
        true
    }

    fn persist(&mut self) {
        if let Err(err) = self.persistence.save(&self.document) {
            tracing::warn!(error = %err, "failed to save snapshot");
            self.last_save_error = Some(err.to_string());
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod store_tests;
