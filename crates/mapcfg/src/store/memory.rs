use serde_json::Value;

use super::{next_revision, DocumentStore};
use crate::document::Document;
use crate::error::Result;
use crate::index::Buckets;

/// Document store held in memory. Used by tests and as a scratch store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    document: Option<Document>,
    raw: Option<Value>,
    buckets: Buckets,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store as if `doc` had been saved already.
    pub fn with_document(mut self, doc: Document) -> Self {
        self.document = Some(doc);
        self.raw = None;
        self
    }

    /// Seeds the store with raw JSON, for inputs the typed document would normalize away.
    pub fn with_raw(mut self, raw: Value) -> Result<Self> {
        self.document = Some(serde_json::from_value(raw.clone())?);
        self.raw = Some(raw);
        Ok(self)
    }

    pub fn with_buckets(mut self, buckets: Buckets) -> Self {
        self.buckets = buckets;
        self
    }

    pub fn stored(&self) -> Option<&Document> {
        self.document.as_ref()
    }
}

impl DocumentStore for InMemoryStore {
    fn load(&self) -> Result<Document> {
        Ok(self.document.clone().unwrap_or_default())
    }

    fn load_raw(&self) -> Result<Option<Value>> {
        if let Some(raw) = &self.raw {
            return Ok(Some(raw.clone()));
        }
        match &self.document {
            Some(doc) => Ok(Some(serde_json::to_value(doc)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, doc: &Document, force: bool) -> Result<Document> {
        let stored = self.document.as_ref().map_or(0, |d| d.revision);
        let next = next_revision(doc, stored, force)?;
        self.document = Some(next.clone());
        self.raw = None;
        Ok(next)
    }

    fn load_buckets(&self) -> Result<Buckets> {
        Ok(self.buckets.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MapcfgError;

    #[test]
    fn test_empty_store_loads_default() {
        let store = InMemoryStore::new();
        assert_eq!(store.load().unwrap(), Document::default());
        assert!(store.load_raw().unwrap().is_none());
    }

    #[test]
    fn test_save_then_stale_save_conflicts() {
        let mut store = InMemoryStore::new();
        let doc = store.load().unwrap();
        let saved = store.save(&doc, false).unwrap();
        assert_eq!(saved.revision, 1);
        assert_eq!(store.load().unwrap().revision, 1);

        // a second session still holding revision 0
        assert!(matches!(
            store.save(&doc, false),
            Err(MapcfgError::RevisionConflict { .. })
        ));
        assert_eq!(store.save(&doc, true).unwrap().revision, 2);
    }

    #[test]
    fn test_raw_is_kept_until_next_save() {
        let raw = serde_json::json!({"layerMenu": {"id": "root", "layers": [{"id": "1", "visibleForGroups": [""]}]}});
        let mut store = InMemoryStore::new().with_raw(raw.clone()).unwrap();
        assert_eq!(store.load_raw().unwrap(), Some(raw));

        let doc = store.load().unwrap();
        store.save(&doc, false).unwrap();
        let after = store.load_raw().unwrap().unwrap();
        assert_eq!(after["layerMenu"]["layers"][0]["visibleForGroups"], serde_json::json!([]));
    }
}
