//! Recently viewed works, most recent first.

use crate::domain::Work;
use crate::error::StoreResult;
use crate::ports::KeyValueStore;
use tracing::warn;

pub const VIEW_HISTORY_KEY: &str = "grey_sky_view_history";

/// How many works the history keeps.
pub const MAX_HISTORY_ITEMS: usize = 3;

pub struct ViewHistory<S> {
    store: S,
    works: Vec<Work>,
}

impl<S: KeyValueStore> ViewHistory<S> {
    /// Loads the stored history. Unreadable data yields an empty history.
    pub fn load(store: S) -> Self {
        let works = match store.get(VIEW_HISTORY_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Failed to parse view history: {}", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read view history: {}", e);
                Vec::new()
            }
        };
        Self { store, works }
    }

    pub fn works(&self) -> &[Work] {
        &self.works
    }

    /// Moves `work` to the front, dropping anything past the size limit.
    pub fn add_work(&mut self, work: Work) -> StoreResult<()> {
        self.works.retain(|w| w.id != work.id);
        self.works.insert(0, work);
        self.works.truncate(MAX_HISTORY_ITEMS);

        let raw = serde_json::to_string(&self.works)?;
        self.store.set(VIEW_HISTORY_KEY, &raw)?;
        Ok(())
    }

    pub fn clear(&mut self) -> StoreResult<()> {
        self.works.clear();
        self.store.remove(VIEW_HISTORY_KEY)?;
        Ok(())
    }
}
