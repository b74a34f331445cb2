//! # Figwind Assets
//!
//! Content-addressed upload of exported images and vectors.
//!
//! ## Flow
//!
//! `AssetPipeline::get_or_upload` hashes the raw bytes, answers from the
//! in-memory cache when it can, and otherwise waits for one of a bounded
//! number of upload slots. Slots are granted in request order. The cache is
//! consulted again once a slot is held, so identical bytes requested
//! concurrently are uploaded once whenever the first upload finishes before
//! the second is admitted.
//!
//! Upload failures are never fatal: the pipeline returns `None` and the
//! caller substitutes a placeholder image.
//!
//! ## Hashing
//!
//! SHA-256 is used when the `sha2` feature is enabled (the default). Without
//! it a 32-bit FNV-1a digest tagged with an `h_` prefix is used instead. The
//! chosen algorithm is visible through `ContentHash::algorithm`.

mod cache;
mod hash;
mod pipeline;
mod placeholder;
mod uploader;

pub use cache::AssetCache;
pub use hash::{fnv1a_32, ContentHash, HashAlgorithm};
pub use pipeline::AssetPipeline;
pub use placeholder::{placeholder_image_url, to_data_uri, AssetKind, PLACEHOLDER_IMAGE_DOMAIN};
pub use uploader::{AssetUploader, HttpUploader, UploadRequest, UploadResponse};

use thiserror::Error;

/// Errors from a single upload attempt
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("No upload endpoint configured")]
    MissingEndpoint,

    #[error("Upload transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upload rejected with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Upload failed: {0}")]
    Other(String),
}
