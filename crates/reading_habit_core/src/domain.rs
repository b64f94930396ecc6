//! crates/reading_habit_core/src/domain.rs
//!
//! Defines the core data structures for the reader.
//! Field names serialize in camelCase so persisted records keep the layout
//! the front end has always written to local storage.

use serde::{Deserialize, Serialize};

/// Identifier of an achievement in the static table, e.g. `"night_owl"`.
pub type AchievementId = String;

/// Maximum number of daily logs retained on a profile.
pub const MAX_DAILY_LOGS: usize = 365;

//=========================================================================================
// Profile
//=========================================================================================

/// One calendar day's aggregated reading time and word count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLog {
    /// Local calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub seconds: u64,
    pub words: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_seconds: u64,
    pub total_words: u64,
    /// Legacy field kept for record compatibility. The live streak is always
    /// recomputed from `daily_logs`.
    pub current_streak: u32,
    pub last_active_date: Option<String>,
}

/// The durable per-user record of reading statistics and unlocked achievements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub username: String,
    pub avatar_url: String,
    pub join_date: String,
    pub level: u32,
    pub stats: UserStats,
    pub daily_logs: Vec<DailyLog>,
    pub unlocked_achievements: Vec<AchievementId>,
}

impl Profile {
    pub const DEFAULT_USERNAME: &'static str = "Guest Reader";
    pub const DEFAULT_AVATAR_URL: &'static str =
        "https://api.dicebear.com/7.x/bottts/svg?seed=GreySky";

    /// A fresh profile with zeroed statistics, joined at `join_date`.
    pub fn new(join_date: impl Into<String>) -> Self {
        Self {
            username: Self::DEFAULT_USERNAME.to_string(),
            avatar_url: Self::DEFAULT_AVATAR_URL.to_string(),
            join_date: join_date.into(),
            level: 1,
            stats: UserStats::default(),
            daily_logs: Vec::new(),
            unlocked_achievements: Vec::new(),
        }
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.unlocked_achievements.iter().any(|a| a == id)
    }

    pub fn daily_log(&self, date: &str) -> Option<&DailyLog> {
        self.daily_logs.iter().find(|l| l.date == date)
    }
}

//=========================================================================================
// Works
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkType {
    Original,
    Fanfic,
    Archive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkStatus {
    Complete,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "One-Shot")]
    OneShot,
    Frozen,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkStats {
    pub words: u64,
    pub chapters: u32,
    pub kudos: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmarks: Option<u32>,
    /// Publication date, `YYYY-MM-DD`.
    pub date: String,
    pub status: WorkStatus,
}

/// A literary work in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Work {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub author: String,
    #[serde(rename = "type")]
    pub work_type: WorkType,
    pub rating: String,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fandom: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub cover_url: String,
    pub stats: WorkStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
}

//=========================================================================================
// Collections
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionIcon {
    #[default]
    Default,
    Heart,
    Clock,
    Star,
    Flame,
    Skull,
    Book,
}

/// A user-curated list of saved works.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub title: String,
    pub icon: CollectionIcon,
    /// Most recently added first.
    pub work_ids: Vec<String>,
    /// System collections can't be renamed or deleted.
    #[serde(default)]
    pub is_system: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
