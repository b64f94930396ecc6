//! services/reader/src/tracker/events.rs
//!
//! Events the tracker emits for the notification layer.

use reading_habit_core::{achievement_info, AchievementId};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

/// Capacity of the unlock broadcast channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 16;

/// An achievement was unlocked for the first time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementUnlocked {
    pub id: AchievementId,
    pub title: String,
    pub description: String,
}

impl AchievementUnlocked {
    pub fn new(id: AchievementId) -> Self {
        let (title, description) = match achievement_info(&id) {
            Some(info) => (info.title.to_string(), info.description.to_string()),
            None => (id.clone(), String::new()),
        };
        Self {
            id,
            title,
            description,
        }
    }
}

/// Sends one event per id. Having nobody subscribed is fine.
pub(crate) fn publish(events: &broadcast::Sender<AchievementUnlocked>, ids: &[AchievementId]) {
    for id in ids {
        if events.send(AchievementUnlocked::new(id.clone())).is_err() {
            debug!("No listeners for unlock of '{}'", id);
        }
    }
}
