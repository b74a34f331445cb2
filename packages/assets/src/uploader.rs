use crate::hash::ContentHash;
use crate::placeholder::AssetKind;
use crate::AssetError;
use figwind_common::AssetUploadSettings;
use futures::future::{BoxFuture, FutureExt};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One asset to push to remote storage
#[derive(Debug, Clone, Copy)]
pub struct UploadRequest<'a> {
    pub bytes: &'a [u8],
    pub hash: &'a ContentHash,
    pub kind: AssetKind,
    pub settings: &'a AssetUploadSettings,
}

/// Success body returned by the upload endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
    pub hash: String,
}

/// Transport that stores an asset remotely and returns its public URL
pub trait AssetUploader: Send + Sync {
    fn upload<'a>(&'a self, request: UploadRequest<'a>) -> BoxFuture<'a, Result<String, AssetError>>;
}

/// Uploads to an HTTP endpoint: `POST <endpoint>` with the raw bytes as body.
#[derive(Debug, Clone, Default)]
pub struct HttpUploader {
    client: Client,
}

impl HttpUploader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl AssetUploader for HttpUploader {
    fn upload<'a>(&'a self, request: UploadRequest<'a>) -> BoxFuture<'a, Result<String, AssetError>> {
        async move {
            let endpoint = request.settings.endpoint.trim();
            if endpoint.is_empty() {
                return Err(AssetError::MissingEndpoint);
            }

            debug!(hash = %request.hash, ext = request.kind.extension(), endpoint, "Starting upload");

            let response = self
                .client
                .post(endpoint)
                .header(CONTENT_TYPE, "application/octet-stream")
                .header("X-Asset-Ext", request.kind.extension())
                .header("X-Asset-Hash", request.hash.as_str())
                .header("X-Asset-Content-Type", request.kind.content_type())
                .header("X-Upload-Secret", request.settings.upload_secret.as_str())
                .body(request.bytes.to_vec())
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(AssetError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            let payload: UploadResponse = response.json().await?;
            info!(hash = %request.hash, url = %payload.url, "Upload succeeded");
            Ok(payload.url)
        }
        .boxed()
    }
}
