//! services/reader/src/tracker/session.rs
//!
//! The Session Controller. While a reading session is active it runs a
//! one-second tick that credits reading time to the profile and re-checks
//! achievements. Chapter completions are fed in independently of the session.

use crate::tracker::events::{publish, AchievementUnlocked, EVENT_CHANNEL_CAPACITY};
use reading_habit_core::{evaluate, AchievementId, Clock, KeyValueStore, ProfileStore};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Interval between reading-time credits. Each tick credits one second.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// The profile store shared between the controller and its tick task.
pub type SharedProfiles<S, C> = Arc<Mutex<ProfileStore<S, C>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
}

/// The live tick of an active session.
struct ActiveSession {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// The one tick slot shared by every handle of a controller.
#[derive(Default)]
struct TickSlot {
    active: StdMutex<Option<ActiveSession>>,
}

impl TickSlot {
    fn lock(&self) -> MutexGuard<'_, Option<ActiveSession>> {
        // The slot is only swapped under the lock, so a poisoned guard is still consistent.
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for TickSlot {
    fn drop(&mut self) {
        if let Some(active) = self.lock().take() {
            active.token.cancel();
            active.handle.abort();
        }
    }
}

/// Drives reading sessions over a shared profile.
///
/// Cloning yields another handle to the same controller: all handles share one
/// tick slot and one event channel, so at most one tick runs no matter how many
/// handles start a session. The tick stops when the last handle is dropped.
pub struct SessionController<S, C> {
    profiles: SharedProfiles<S, C>,
    events: broadcast::Sender<AchievementUnlocked>,
    slot: Arc<TickSlot>,
}

impl<S, C> Clone for SessionController<S, C> {
    fn clone(&self) -> Self {
        Self {
            profiles: self.profiles.clone(),
            events: self.events.clone(),
            slot: self.slot.clone(),
        }
    }
}

impl<S, C> SessionController<S, C>
where
    S: KeyValueStore + 'static,
    C: Clock + 'static,
{
    pub fn new(profiles: SharedProfiles<S, C>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            profiles,
            events,
            slot: Arc::new(TickSlot::default()),
        }
    }

    /// Receives every achievement unlocked from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<AchievementUnlocked> {
        self.events.subscribe()
    }

    pub fn state(&self) -> SessionState {
        if self.slot.lock().is_some() {
            SessionState::Active
        } else {
            SessionState::Idle
        }
    }

    /// Starts the reading tick. Does nothing if a session is already running
    /// on any handle of this controller.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_session(&self) {
        let mut active = self.slot.lock();
        if active.is_some() {
            debug!("Reading session already active");
            return;
        }

        let token = CancellationToken::new();
        let handle = tokio::spawn(tick_loop(
            self.profiles.clone(),
            self.events.clone(),
            token.clone(),
        ));
        *active = Some(ActiveSession { token, handle });
        info!("Reading session started");
    }

    /// Stops the reading tick. Once this returns no further tick will run.
    pub async fn end_session(&self) {
        let taken = self.slot.lock().take();
        let Some(active) = taken else {
            debug!("No active reading session to end");
            return;
        };
        active.token.cancel();
        active.handle.abort();
        // The task is either finished or aborted at its next await point.
        if let Err(e) = active.handle.await {
            if e.is_panic() {
                warn!("Reading tick panicked: {}", e);
            }
        }
        info!("Reading session ended");
    }

    /// Credits a finished chapter's words and returns the achievements it unlocked.
    pub async fn record_chapter_read(&self, word_count: u64) -> Vec<AchievementId> {
        let unlocked = {
            let mut profiles = self.profiles.lock().await;
            apply_activity(&mut profiles, 0, word_count)
        };
        publish(&self.events, &unlocked);
        unlocked
    }
}

async fn tick_loop<S, C>(
    profiles: SharedProfiles<S, C>,
    events: broadcast::Sender<AchievementUnlocked>,
    token: CancellationToken,
) where
    S: KeyValueStore,
    C: Clock,
{
    let mut interval = tokio::time::interval(TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; time is credited after a full period.
    interval.tick().await;

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = interval.tick() => {
                let unlocked = {
                    let mut profiles = profiles.lock().await;
                    if token.is_cancelled() {
                        break;
                    }
                    apply_activity(&mut profiles, 1, 0)
                };
                publish(&events, &unlocked);
            }
        }
    }
    debug!("Reading tick stopped");
}

/// Records activity, then evaluates achievements. A failed write is a warning:
/// the in-memory profile stays authoritative for the rest of the session.
fn apply_activity<S: KeyValueStore, C: Clock>(
    profiles: &mut ProfileStore<S, C>,
    seconds: u64,
    words: u64,
) -> Vec<AchievementId> {
    if let Err(e) = profiles.record_activity(seconds, words) {
        warn!("Reading progress not persisted: {}", e);
    }
    evaluate(profiles)
}
