//! Works downloaded for reading without a network connection.

use crate::domain::Work;
use crate::error::StoreResult;
use crate::ports::KeyValueStore;
use tracing::warn;

pub const OFFLINE_CACHE_KEY: &str = "grey_sky_offline_cache";

pub struct OfflineCache<S> {
    store: S,
    /// In download order.
    works: Vec<Work>,
}

impl<S: KeyValueStore> OfflineCache<S> {
    /// Loads the downloaded works. A corrupt cache yields no downloads.
    pub fn load(store: S) -> Self {
        let works = match store.get(OFFLINE_CACHE_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Offline cache corrupted: {}", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read offline cache: {}", e);
                Vec::new()
            }
        };
        Self { store, works }
    }

    pub fn works(&self) -> &[Work] {
        &self.works
    }

    pub fn is_downloaded(&self, work_id: &str) -> bool {
        self.works.iter().any(|w| w.id == work_id)
    }

    /// Finds a downloaded work by slug.
    pub fn offline_work(&self, slug: &str) -> Option<&Work> {
        self.works.iter().find(|w| w.slug == slug)
    }

    /// Downloads `work`, or removes it if it is already downloaded. Returns
    /// whether the work is now downloaded.
    pub fn toggle_download(&mut self, work: &Work) -> StoreResult<bool> {
        if let Some(index) = self.works.iter().position(|w| w.id == work.id) {
            self.works.remove(index);
            self.save()?;
            Ok(false)
        } else {
            self.works.push(work.clone());
            self.save()?;
            Ok(true)
        }
    }

    fn save(&self) -> StoreResult<()> {
        let raw = serde_json::to_string(&self.works)?;
        self.store.set(OFFLINE_CACHE_KEY, &raw)?;
        Ok(())
    }
}
