use crate::cache::AssetCache;
use crate::hash::ContentHash;
use crate::placeholder::AssetKind;
use crate::uploader::{AssetUploader, HttpUploader, UploadRequest};
use figwind_common::AssetUploadSettings;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};
use tracing::{debug, instrument, warn};

/// Permits behind the upload slots; divisible by every limit up to 16.
const SLOT_PERMITS: u32 = 720_720;

/// Bounded set of upload slots shared by every limit.
///
/// One fair semaphore: an upload under a limit of `k` takes `1/k` of the
/// permits, so at most `k` such uploads run at once whatever other limits
/// are in flight. Waiting requests are admitted in FIFO order and a slot is
/// returned when its guard drops, whether the upload succeeded, failed, or
/// was abandoned.
#[derive(Debug)]
struct UploadSlots {
    semaphore: Arc<Semaphore>,
    in_flight: Arc<AtomicUsize>,
}

impl UploadSlots {
    fn new() -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(SLOT_PERMITS as usize)),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Permits one upload takes under a limit of `capacity`
    fn weight(capacity: usize) -> u32 {
        let capacity = capacity.clamp(1, SLOT_PERMITS as usize) as u32;
        SLOT_PERMITS.div_ceil(capacity)
    }

    async fn acquire(&self, capacity: usize) -> Result<SlotGuard, AcquireError> {
        let permit = self
            .semaphore
            .clone()
            .acquire_many_owned(Self::weight(capacity))
            .await?;
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        Ok(SlotGuard {
            _permit: permit,
            in_flight: self.in_flight.clone(),
        })
    }
}

struct SlotGuard {
    _permit: OwnedSemaphorePermit,
    in_flight: Arc<AtomicUsize>,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Hash -> cache -> bounded upload, shared by every conversion of a session.
pub struct AssetPipeline {
    uploader: Arc<dyn AssetUploader>,
    cache: AssetCache,
    slots: UploadSlots,
}

impl AssetPipeline {
    pub fn new(uploader: Arc<dyn AssetUploader>) -> Self {
        Self {
            uploader,
            cache: AssetCache::new(),
            slots: UploadSlots::new(),
        }
    }

    /// Pipeline uploading over HTTP
    pub fn http() -> Self {
        Self::new(Arc::new(HttpUploader::new()))
    }

    pub fn cache(&self) -> &AssetCache {
        &self.cache
    }

    /// Number of uploads currently holding a slot
    pub fn in_flight(&self) -> usize {
        self.slots.in_flight.load(Ordering::SeqCst)
    }

    /// Resolve `bytes` to a remote URL, uploading at most once per content.
    ///
    /// Returns `None` when uploads are disabled or the upload failed; callers
    /// fall back to a placeholder.
    #[instrument(skip(self, bytes, settings), fields(kind = %kind, size = bytes.len()))]
    pub async fn get_or_upload(
        &self,
        bytes: &[u8],
        kind: AssetKind,
        settings: &AssetUploadSettings,
    ) -> Option<String> {
        if !settings.enabled {
            debug!("Asset upload disabled");
            return None;
        }

        let hash = ContentHash::of(bytes);
        if let Some(url) = self.cache.get(&hash) {
            debug!(hash = %hash, url = %url, "Asset cache hit");
            return Some(url);
        }

        let _slot = match self.slots.acquire(settings.max_concurrent()).await {
            Ok(slot) => slot,
            Err(e) => {
                warn!(error = %e, "Upload slots closed");
                return None;
            }
        };

        if let Some(url) = self.cache.get(&hash) {
            debug!(hash = %hash, url = %url, "Asset cache hit after wait");
            return Some(url);
        }

        let request = UploadRequest {
            bytes,
            hash: &hash,
            kind,
            settings,
        };
        match self.uploader.upload(request).await {
            Ok(url) => {
                self.cache.insert(&hash, url.clone());
                Some(url)
            }
            Err(e) => {
                warn!(hash = %hash, error = %e, "Asset upload failed");
                None
            }
        }
    }
}
