//! Where the reader left off in each work, keyed by work slug.

use crate::error::StoreResult;
use crate::ports::{Clock, KeyValueStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

pub const READING_PROGRESS_KEY: &str = "grey_sky_reading_progress";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadingProgress {
    pub chapter: u32,
    /// Scroll offset within the chapter.
    pub scroll: f64,
    /// When the position was saved, in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

pub struct ProgressStore<S, C> {
    store: S,
    clock: C,
    entries: BTreeMap<String, ReadingProgress>,
}

impl<S: KeyValueStore, C: Clock> ProgressStore<S, C> {
    /// Loads saved positions. Unreadable data yields no positions.
    pub fn load(store: S, clock: C) -> Self {
        let entries = match store.get(READING_PROGRESS_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Failed to parse reading progress: {}", e);
                BTreeMap::new()
            }),
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                warn!("Failed to read reading progress: {}", e);
                BTreeMap::new()
            }
        };
        Self {
            store,
            clock,
            entries,
        }
    }

    pub fn progress(&self, slug: &str) -> Option<&ReadingProgress> {
        self.entries.get(slug)
    }

    pub fn entries(&self) -> &BTreeMap<String, ReadingProgress> {
        &self.entries
    }

    /// Overwrites the saved position for `slug`, stamped with the current time.
    pub fn save_progress(&mut self, slug: &str, chapter: u32, scroll: f64) -> StoreResult<()> {
        let progress = ReadingProgress {
            chapter,
            scroll,
            timestamp: self.clock.now_millis(),
        };
        self.entries.insert(slug.to_string(), progress);
        self.save()
    }

    /// Forgets the position for `slug`. Nothing is written if none was saved.
    pub fn clear_progress(&mut self, slug: &str) -> StoreResult<()> {
        if self.entries.remove(slug).is_some() {
            self.save()?;
        }
        Ok(())
    }

    fn save(&self) -> StoreResult<()> {
        let raw = serde_json::to_string(&self.entries)?;
        self.store.set(READING_PROGRESS_KEY, &raw)?;
        Ok(())
    }
}
