use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::{next_revision, DocumentStore};
use crate::document::Document;
use crate::error::{MapcfgError, Result};
use crate::index::Buckets;

/// Document store backed by a JSON file, with an optional candidates file.
pub struct FileStore {
    document_path: PathBuf,
    candidates_path: Option<PathBuf>,
}

impl FileStore {
    pub fn new(document_path: impl Into<PathBuf>) -> Self {
        Self {
            document_path: document_path.into(),
            candidates_path: None,
        }
    }

    pub fn with_candidates(mut self, path: Option<PathBuf>) -> Self {
        self.candidates_path = path;
        self
    }

    pub fn document_path(&self) -> &Path {
        &self.document_path
    }

    pub fn candidates_path(&self) -> Option<&Path> {
        self.candidates_path.as_deref()
    }

    fn read_text(&self) -> Result<Option<String>> {
        if !self.document_path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&self.document_path)
            .map(Some)
            .map_err(MapcfgError::Io)
    }

    fn stored_revision(&self, force: bool) -> Result<u64> {
        let Some(text) = self.read_text()? else {
            return Ok(0);
        };
        match serde_json::from_str::<Document>(&text) {
            Ok(doc) => Ok(doc.revision),
            // unreadable file: only a forced save may replace it
            Err(_) if force => Ok(0),
            Err(e) => Err(MapcfgError::Serialization(e)),
        }
    }

    fn write_atomic(&self, content: &str) -> Result<()> {
        let dir = match self.document_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(MapcfgError::Io)?;
        let tmp_file = dir.join(format!(".mapcfg-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(MapcfgError::Io)?;
        if let Err(e) = fs::rename(&tmp_file, &self.document_path) {
            let _ = fs::remove_file(&tmp_file);
            return Err(MapcfgError::Io(e));
        }
        Ok(())
    }
}

/// Reads a candidate buckets file (`{ bucketKey: [record, ...] }`).
pub fn read_buckets(path: &Path) -> Result<Buckets> {
    let text = fs::read_to_string(path).map_err(MapcfgError::Io)?;
    Ok(serde_json::from_str(&text)?)
}

impl DocumentStore for FileStore {
    fn load(&self) -> Result<Document> {
        match self.read_text()? {
            Some(text) => Ok(serde_json::from_str(&text)?),
            None => Ok(Document::default()),
        }
    }

    fn load_raw(&self) -> Result<Option<Value>> {
        match self.read_text()? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, doc: &Document, force: bool) -> Result<Document> {
        let stored = self.stored_revision(force)?;
        let next = next_revision(doc, stored, force)?;
        let content = serde_json::to_string_pretty(&next)?;
        self.write_atomic(&content)?;
        tracing::debug!(
            path = %self.document_path.display(),
            revision = next.revision,
            "saved document"
        );
        Ok(next)
    }

    fn load_buckets(&self) -> Result<Buckets> {
        match &self.candidates_path {
            Some(path) => read_buckets(path),
            None => Ok(Buckets::new()),
        }
    }

    fn location(&self) -> Option<PathBuf> {
        Some(self.document_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_loads_default() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("mapcfg.json"));
        assert_eq!(store.load().unwrap(), Document::default());
        assert!(store.load_raw().unwrap().is_none());
    }

    #[test]
    fn test_save_creates_parent_and_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("mapcfg.json");
        let mut store = FileStore::new(&path);
        let saved = store.save(&Document::default(), false).unwrap();
        assert_eq!(saved.revision, 1);
        assert!(path.exists());

        let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
        assert_eq!(store.load().unwrap().revision, 1);
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = tempdir().unwrap();
        // a non-empty directory where the document should go
        let path = dir.path().join("mapcfg.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();
        let store = FileStore::new(&path);

        assert!(matches!(store.write_atomic("{}"), Err(MapcfgError::Io(_))));
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
        assert!(path.join("keep").exists());
    }

    #[test]
    fn test_corrupt_file_needs_force() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mapcfg.json");
        fs::write(&path, "{ not json").unwrap();
        let mut store = FileStore::new(&path);

        assert!(matches!(store.load(), Err(MapcfgError::Serialization(_))));
        assert!(store.save(&Document::default(), false).is_err());
        assert_eq!(store.save(&Document::default(), true).unwrap().revision, 1);
    }

    #[test]
    fn test_load_buckets() {
        let dir = tempdir().unwrap();
        let candidates = dir.path().join("layers.json");
        fs::write(
            &candidates,
            r#"{"wmslayers": [{"id": 12, "caption": "Roads"}], "wfslayers": []}"#,
        )
        .unwrap();

        let store = FileStore::new(dir.path().join("mapcfg.json"));
        assert!(store.load_buckets().unwrap().is_empty());

        let store = store.with_candidates(Some(candidates));
        let buckets = store.load_buckets().unwrap();
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets["wmslayers"][0].caption.as_deref(), Some("Roads"));
    }
}
