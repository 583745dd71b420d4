//! JSON records file.
//!
//! The whole record sequence is rewritten on every save; there is no append
//! mode and no partial-write protection.

use crate::{Error, PostRecord};
use std::path::{Path, PathBuf};

/// File-backed store for the accumulated post records.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the file with the full record sequence as a pretty JSON array.
    ///
    /// Creates the parent directory if needed.
    pub fn save(&self, records: &[PostRecord]) -> Result<(), Error> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let json = serde_json::to_string_pretty(records)?;
        std::fs::write(&self.path, json).map_err(|e| Error::io(&self.path, e))?;

        tracing::debug!(path = %self.path.display(), count = records.len(), "records saved");
        Ok(())
    }

    /// Read a previously saved records file.
    pub fn load(&self) -> Result<Vec<PostRecord>, Error> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| Error::io(&self.path, e))?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(offset: u32, text: &str) -> PostRecord {
        PostRecord {
            offset,
            post_id: format!("p{offset}"),
            author: "Bob".into(),
            date: "1 jan 2024 at 9:00".into(),
            text: text.into(),
            emojis: vec![],
            photos: vec![],
        }
    }

    #[test]
    fn test_save_creates_parent_and_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("out").join("topic.json"));

        store.save(&[record(0, "one"), record(20, "two")]).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].text, "two");
    }

    #[test]
    fn test_save_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("topic.json"));

        store.save(&[record(0, "one"), record(20, "two")]).unwrap();
        store.save(&[record(40, "three")]).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, vec![record(40, "three")]);
    }

    #[test]
    fn test_save_writes_pretty_array() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("topic.json"));
        store.save(&[]).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, "[]");

        store.save(&[record(0, "one")]).unwrap();
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.starts_with("[\n"));
        assert!(raw.contains("\"postId\": \"p0\""));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("absent.json"));
        assert!(matches!(store.load(), Err(Error::Io { .. })));
    }
}
