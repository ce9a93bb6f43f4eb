use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;

use crate::document::{Document, Snapshot, merge_snapshot};
use crate::error::{ImportError, SnapshotError};

/// Name of the single storage slot.
pub const STORAGE_KEY: &str = "sprout_sermon_data";

/// A single opaque key-value slot holding the serialized document.
pub trait SnapshotStore {
    /// Returns `None` when nothing has been stored yet.
    fn read(&self) -> Result<Option<String>, SnapshotError>;
    fn write(&mut self, contents: &str) -> Result<(), SnapshotError>;
    fn remove(&mut self) -> Result<(), SnapshotError>;
}

/// Slot backed by `<dir>/<STORAGE_KEY>.json`.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("{STORAGE_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, error: std::io::Error) -> SnapshotError {
        SnapshotError::Io {
            path: self.path.clone(),
            error,
        }
    }
}

impl SnapshotStore for FileStore {
    fn read(&self) -> Result<Option<String>, SnapshotError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(self.io_error(error)),
        }
    }

    fn write(&mut self, contents: &str) -> Result<(), SnapshotError> {
        fs::write(&self.path, contents).map_err(|error| self.io_error(error))
    }

    fn remove(&mut self) -> Result<(), SnapshotError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(self.io_error(error)),
        }
    }
}

/// In-memory slot, used by tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slot: Option<String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            slot: Some(contents.into()),
            writes: 0,
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.slot.as_deref()
    }

    /// Number of successful writes since creation.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl SnapshotStore for MemoryStore {
    fn read(&self) -> Result<Option<String>, SnapshotError> {
        Ok(self.slot.clone())
    }

    fn write(&mut self, contents: &str) -> Result<(), SnapshotError> {
        self.slot = Some(contents.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self) -> Result<(), SnapshotError> {
        self.slot = None;
        Ok(())
    }
}

/// Loads, saves and clears the document through a [`SnapshotStore`].
#[derive(Debug)]
pub struct Persistence<S> {
    backend: S,
}

impl<S: SnapshotStore> Persistence<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Reads the stored document, merged over registry defaults.
    ///
    /// Never fails: an empty, unreadable or corrupt slot yields the default
    /// document.
    pub fn load(&self) -> Document {
        match self.try_load() {
            Ok(Some(document)) => document,
            Ok(None) => {
                tracing::debug!("no stored snapshot, starting with defaults");
                Document::new()
            }
            Err(err) => {
                tracing::warn!(error = %err, "discarding stored snapshot");
                Document::new()
            }
        }
    }

    fn try_load(&self) -> Result<Option<Document>, SnapshotError> {
        let Some(contents) = self.backend.read()? else {
            return Ok(None);
        };
        let snapshot: Snapshot = serde_json::from_str(&contents)?;
        Ok(Some(merge_snapshot(snapshot)))
    }

    pub fn save(&mut self, document: &Document) -> Result<(), SnapshotError> {
        let contents = serde_json::to_string(&Snapshot::from_document(document))?;
        self.backend.write(&contents)
    }

    pub fn clear(&mut self) -> Result<(), SnapshotError> {
        self.backend.remove()
    }
}

/// Writes the document to a standalone file for backup or transfer.
pub fn export_to_file(document: &Document, path: &Path) -> Result<(), SnapshotError> {
    let contents = serde_json::to_string_pretty(&Snapshot::from_document(document))?;
    fs::write(path, contents).map_err(|error| SnapshotError::Io {
        path: path.to_path_buf(),
        error,
    })
}

/// Reads a snapshot previously written by [`export_to_file`] (or by the
/// earlier web version). The result still has to be merged over defaults.
pub fn import_from_file(path: &Path) -> Result<Snapshot, ImportError> {
    let contents = fs::read_to_string(path).map_err(|error| ImportError::Io {
        path: path.to_path_buf(),
        error,
    })?;
    parse_import(&contents)
}

pub fn parse_import(contents: &str) -> Result<Snapshot, ImportError> {
    Ok(serde_json::from_str(contents)?)
}

pub fn default_export_file_name(date: NaiveDate) -> String {
    format!("sprout-sermon-{}.json", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::sections::{SECTION_ORDER, SectionId};

    fn sample_document() -> Document {
        let mut document = Document::new();
        document.reference = "Mark 4:35-41".to_string();
        document.verses = "And he awoke, and rebuked the wind".to_string();
        document.statement = "Storms reveal what we trust.".to_string();
        document.sections.get_mut(SectionId::We2).content = "Imagine a calm church".to_string();
        document.sections.get_mut(SectionId::Me).expanded = false;
        document
    }

    #[test]
    fn empty_slot_loads_defaults() {
        let persistence = Persistence::new(MemoryStore::new());
        assert_eq!(persistence.load(), Document::new());
    }

    #[test]
    fn corrupt_slot_loads_defaults() {
        for contents in ["{not json", "[]", "null", "\"text\"", ""] {
            let persistence = Persistence::new(MemoryStore::with_contents(contents));
            assert_eq!(persistence.load(), Document::new(), "contents: {contents:?}");
        }
    }

    #[test]
    fn unknown_section_shapes_do_not_discard_the_slot() {
        let cases = [
            (
                r#"{"reference":"Acts 2","sections":{"god":{"content":"keep"},"notes":"v2"}}"#,
                "keep",
            ),
            (
                r#"{"reference":"Acts 2","sections":{"god":{"content":"keep"},"bonus":null}}"#,
                "keep",
            ),
            (r#"{"reference":"Acts 2","sections":null}"#, ""),
        ];
        for (contents, god) in cases {
            let document = Persistence::new(MemoryStore::with_contents(contents)).load();
            assert_eq!(document.reference, "Acts 2", "contents: {contents:?}");
            assert_eq!(document.section(SectionId::God).content, god);
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let document = sample_document();
        let mut persistence = Persistence::new(MemoryStore::new());
        persistence.save(&document).unwrap();
        assert_eq!(persistence.backend().writes(), 1);
        assert_eq!(persistence.load(), document);
    }

    #[test]
    fn clear_empties_the_slot() {
        let mut persistence = Persistence::new(MemoryStore::new());
        persistence.save(&sample_document()).unwrap();
        persistence.clear().unwrap();
        assert_eq!(persistence.backend().contents(), None);
        assert_eq!(persistence.load(), Document::new());
    }

    #[test]
    fn saved_snapshot_lists_every_section() {
        let mut persistence = Persistence::new(MemoryStore::new());
        persistence.save(&Document::new()).unwrap();
        let raw = persistence.backend().contents().unwrap();
        let value: serde_json::Value = serde_json::from_str(raw).unwrap();
        for id in SECTION_ORDER {
            assert_eq!(value["sections"][id.key()]["content"], "");
            assert_eq!(value["sections"][id.key()]["expanded"], true);
        }
    }

    #[test]
    fn file_store_round_trips_and_tolerates_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.path().ends_with("sprout_sermon_data.json"));

        let mut persistence = Persistence::new(store);
        assert_eq!(persistence.load(), Document::new());
        persistence.clear().unwrap();

        let document = sample_document();
        persistence.save(&document).unwrap();
        assert_eq!(Persistence::new(FileStore::new(dir.path())).load(), document);

        persistence.clear().unwrap();
        assert!(!dir.path().join("sprout_sermon_data.json").exists());
    }

    #[test]
    fn export_and_import_go_through_a_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("backup.json");
        let document = sample_document();

        export_to_file(&document, &path).unwrap();
        let snapshot = import_from_file(&path).unwrap();
        assert_eq!(merge_snapshot(snapshot), document);
    }

    #[test]
    fn import_rejects_invalid_json() {
        assert!(matches!(
            parse_import("<html>"),
            Err(ImportError::InvalidFormat(_))
        ));
    }

    #[test]
    fn import_reports_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = import_from_file(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(ImportError::Io { .. })));
    }

    #[test]
    fn export_file_name_uses_the_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(default_export_file_name(date), "sprout-sermon-2024-03-09.json");
    }
}
