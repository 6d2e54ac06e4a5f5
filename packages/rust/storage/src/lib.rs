//! Object storage boundary: the [`ObjectStore`] contract and its S3
//! implementation.
//!
//! The pipelines hand fully encoded bytes across this boundary and never
//! touch the SDK directly, so tests substitute an in-memory store.

pub mod encode;

use std::path::Path;

use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use tracing::{debug, error, info};

use docsweep_shared::{DocsweepError, Result};

pub use encode::{
    document_key, gunzip_dir, gunzip_file, gzip_bytes, merged_key, path_to_url, to_jsonl,
    url_to_path,
};

// ---------------------------------------------------------------------------
// ObjectStore
// ---------------------------------------------------------------------------

/// Contract the pipelines require from object storage.
pub trait ObjectStore {
    /// Upload the merged, gzip-compressed JSONL blob for one run.
    async fn upload_merged(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<()>;

    /// Upload one document's republished raw HTML.
    async fn upload_document(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<()>;

    /// Download every object under `prefix` into `dest`, preserving key
    /// paths. Returns false on failure, never panics.
    async fn download_prefix(&self, bucket: &str, prefix: &str, dest: &Path) -> bool;
}

// ---------------------------------------------------------------------------
// S3Store
// ---------------------------------------------------------------------------

/// [`ObjectStore`] backed by S3.
pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Build a store from the ambient AWS configuration (environment,
    /// profile, instance metadata).
    pub async fn connect() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self {
            client: Client::new(&config),
        }
    }

    async fn put_bytes(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| DocsweepError::Storage(format!("put s3://{bucket}/{key}: {e}")))?;
        Ok(())
    }

    async fn get_into(&self, bucket: &str, key: &str, dest: &Path) -> Result<()> {
        let object = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| DocsweepError::Storage(format!("get s3://{bucket}/{key}: {e}")))?;

        let bytes = object
            .body
            .collect()
            .await
            .map_err(|e| DocsweepError::Storage(format!("read s3://{bucket}/{key}: {e}")))?
            .into_bytes();

        let target = dest.join(key);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DocsweepError::io(parent, e))?;
        }
        std::fs::write(&target, &bytes).map_err(|e| DocsweepError::io(&target, e))?;

        debug!(key, size = bytes.len(), "object downloaded");
        Ok(())
    }
}

impl ObjectStore for S3Store {
    async fn upload_merged(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<()> {
        info!(bucket, key, size = bytes.len(), "uploading merged data");
        self.put_bytes(bucket, key, bytes).await
    }

    async fn upload_document(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<()> {
        self.put_bytes(bucket, key, bytes).await
    }

    async fn download_prefix(&self, bucket: &str, prefix: &str, dest: &Path) -> bool {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .into_paginator()
            .send();

        let mut downloaded = 0usize;
        while let Some(page) = pages.next().await {
            let page = match page {
                Ok(page) => page,
                Err(e) => {
                    error!(bucket, prefix, error = %e, "listing failed");
                    return false;
                }
            };

            for object in page.contents() {
                let Some(key) = object.key() else { continue };
                // Console-created "folders" are zero-byte keys with a
                // trailing slash.
                if key.ends_with('/') {
                    continue;
                }
                if let Err(e) = self.get_into(bucket, key, dest).await {
                    error!(key, error = %e, "download failed");
                    return false;
                }
                downloaded += 1;
            }
        }

        info!(bucket, prefix, downloaded, "prefix downloaded");
        true
    }
}
