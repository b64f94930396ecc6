//! services/reader/src/state.rs
//!
//! Defines the reader's shared state: every local store, opened once at
//! startup over a single storage backend and handed to the components that
//! need it.

use crate::tracker::{SessionController, SharedProfiles};
use reading_habit_core::{
    Clock, Comment, Interactions, KeyValueStore, Library, OfflineCache, ProfileStore,
    ProgressStore, ReadingSettingsStore, ViewHistory, Work,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// All local stores of the reader, sharing one storage backend.
pub struct ReaderState<S, C> {
    pub profiles: SharedProfiles<Arc<S>, C>,
    pub library: Mutex<Library<Arc<S>>>,
    pub history: Mutex<ViewHistory<Arc<S>>>,
    pub progress: Mutex<ProgressStore<Arc<S>, C>>,
    pub interactions: Mutex<Interactions<Arc<S>, C>>,
    pub settings: Mutex<ReadingSettingsStore<Arc<S>>>,
    pub offline: Mutex<OfflineCache<Arc<S>>>,
    session: SessionController<Arc<S>, C>,
}

impl<S, C> ReaderState<S, C>
where
    S: KeyValueStore + 'static,
    C: Clock + Clone + 'static,
{
    /// Loads every store from `store`. Corrupt records fall back to defaults.
    pub fn load(store: Arc<S>, clock: C) -> Self {
        let profiles = ProfileStore::load(store.clone(), clock.clone());
        info!(
            "Loaded profile for {} ({} read, {} words)",
            profiles.profile().username,
            profiles.formatted_total_time(),
            profiles.profile().stats.total_words
        );

        let profiles = Arc::new(Mutex::new(profiles));
        Self {
            session: SessionController::new(profiles.clone()),
            profiles,
            library: Mutex::new(Library::load(store.clone())),
            history: Mutex::new(ViewHistory::load(store.clone())),
            progress: Mutex::new(ProgressStore::load(store.clone(), clock.clone())),
            interactions: Mutex::new(Interactions::load(store.clone(), clock)),
            settings: Mutex::new(ReadingSettingsStore::load(store.clone())),
            offline: Mutex::new(OfflineCache::load(store)),
        }
    }

    /// A handle to the state's single session controller. Every handle shares
    /// one tick, so starting a session twice never double-counts time.
    pub fn session_controller(&self) -> SessionController<Arc<S>, C> {
        self.session.clone()
    }

    /// Records that the reader opened `work`.
    pub async fn open_work(&self, work: Work) {
        if let Err(e) = self.history.lock().await.add_work(work) {
            warn!("View history not persisted: {}", e);
        }
    }

    /// Saves the reading position in `slug`.
    pub async fn save_position(&self, slug: &str, chapter: u32, scroll: f64) {
        if let Err(e) = self.progress.lock().await.save_progress(slug, chapter, scroll) {
            warn!("Reading position not persisted: {}", e);
        }
    }

    /// Posts a comment signed with the current profile's name and avatar.
    /// Blank text posts nothing.
    pub async fn post_comment(&self, work_id: &str, text: &str) -> Option<Comment> {
        let profiles = self.profiles.lock().await;
        let mut interactions = self.interactions.lock().await;
        match interactions.add_comment(work_id, text, profiles.profile()) {
            Ok(comment) => comment,
            Err(e) => {
                warn!("Comment not persisted: {}", e);
                interactions.comments(work_id).first().cloned()
            }
        }
    }
}
