//! Object-store upload of artifact files.

use log::{info, warn};
use reqwest::{Client, StatusCode, header::CONTENT_TYPE};
use std::{path::Path, time::Duration};

/// Bound on one PUT; the artifacts are single screenshots, anything slower
/// is as good as failed for the consuming pipeline.
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(thiserror::Error, Debug)]
pub enum UploadError {
    #[error("failed to read {path}: {error}")]
    Read {
        error: std::io::Error,
        path: String,
    },

    #[error("PUT {url} failed: {error}")]
    Request { error: reqwest::Error, url: String },

    #[error("PUT {url} rejected with status {status}")]
    Status { status: StatusCode, url: String },
}

/// Uploads artifact files to one fixed bucket of an object store.
///
/// The store is addressed over plain HTTP PUT semantics:
/// `PUT {endpoint}/{bucket}/{key}` stores the file bytes under `key`.
/// Every call makes at most one attempt; failures are returned to the
/// caller and never retried.
#[derive(Debug, Clone)]
pub struct Uploader {
    client: Client,
    endpoint: String,
    bucket: String,
}

impl Uploader {
    /// `endpoint` is the object-store base URL, `bucket` the fixed target
    /// bucket all keys are stored under.
    pub fn new(endpoint: impl Into<String>, bucket: impl Into<String>) -> Self {
        let endpoint = endpoint.into();

        Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Uploads one local file under `key`.
    pub async fn upload(&self, local_path: &Path, key: &str) -> Result<(), UploadError> {
        match self.try_upload(local_path, key).await {
            Ok(()) => {
                info!("uploaded {key}");
                Ok(())
            }
            Err(e) => {
                warn!("upload of {key} failed: {e}");
                Err(e)
            }
        }
    }

    async fn try_upload(&self, local_path: &Path, key: &str) -> Result<(), UploadError> {
        let url = self.object_url(key);

        let bytes = tokio::fs::read(local_path)
            .await
            .map_err(|e| UploadError::Read {
                error: e,
                path: local_path.display().to_string(),
            })?;

        let response = self
            .client
            .put(&url)
            .timeout(UPLOAD_TIMEOUT)
            .header(CONTENT_TYPE, "image/png")
            .body(bytes)
            .send()
            .await
            .map_err(|e| UploadError::Request {
                error: e,
                url: url.clone(),
            })?;

        if !response.status().is_success() {
            return Err(UploadError::Status {
                status: response.status(),
                url,
            });
        }

        Ok(())
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, self.bucket, key)
    }
}
