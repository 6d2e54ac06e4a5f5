//! Test doubles shared by the pipeline and ingest tests.

use std::path::Path;
use std::sync::Mutex;

use docsweep_shared::Result;
use docsweep_storage::ObjectStore;

/// In-memory stand-in for the object store, recording every upload.
#[derive(Default)]
pub(crate) struct MemoryStore {
    pub merged: Mutex<Vec<(String, String, Vec<u8>)>>,
    pub documents: Mutex<Vec<(String, String, Vec<u8>)>>,
    /// Objects handed out by `download_prefix`, written under `dest`.
    pub seeded: Vec<(String, Vec<u8>)>,
    pub fail_download: bool,
}

impl ObjectStore for MemoryStore {
    async fn upload_merged(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<()> {
        self.merged
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string(), bytes));
        Ok(())
    }

    async fn upload_document(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<()> {
        self.documents
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string(), bytes));
        Ok(())
    }

    async fn download_prefix(&self, _bucket: &str, prefix: &str, dest: &Path) -> bool {
        if self.fail_download {
            return false;
        }
        for (key, bytes) in &self.seeded {
            assert!(key.starts_with(prefix), "seeded key outside prefix");
            let target = dest.join(key);
            std::fs::create_dir_all(target.parent().unwrap()).unwrap();
            std::fs::write(target, bytes).unwrap();
        }
        true
    }
}
