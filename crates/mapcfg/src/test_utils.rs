use crate::api::MapcfgApi;
use crate::config::MapcfgConfig;
use crate::index::Buckets;
use crate::store::fs::FileStore;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestEnv {
    // We keep _temp_dir to ensure the directory is not dropped until the test is done
    pub _temp_dir: TempDir,
    pub root: PathBuf,
    pub document: PathBuf,
    pub candidates: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        Self {
            document: root.join("mapcfg.json"),
            candidates: root.join("layers.json"),
            _temp_dir: temp_dir,
            root,
        }
    }

    pub fn with_buckets(self, buckets: &Buckets) -> Self {
        let json = serde_json::to_string(buckets).expect("serialize buckets");
        std::fs::write(&self.candidates, json).expect("write candidates");
        self
    }

    pub fn with_document(self, json: &str) -> Self {
        std::fs::write(&self.document, json).expect("write document");
        self
    }

    pub fn store(&self) -> FileStore {
        let candidates = self.candidates.exists().then(|| self.candidates.clone());
        FileStore::new(&self.document).with_candidates(candidates)
    }

    pub fn api(&self) -> MapcfgApi<FileStore> {
        MapcfgApi::new(self.store(), MapcfgConfig::default())
    }
}
