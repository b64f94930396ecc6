pub mod achievements;
pub mod catalog;
pub mod domain;
pub mod error;
pub mod history;
pub mod interactions;
pub mod library;
pub mod offline;
pub mod ports;
pub mod profile;
pub mod progress;
pub mod reading_settings;
pub mod storage;
pub mod streak;

pub use achievements::{
    achievement_info, evaluate, Achievement, AchievementInfo, AchievementInputs, ACHIEVEMENTS,
};
pub use catalog::{reading_time, SortBy, TypeFilter, WorkFilter};
pub use domain::{
    AchievementId, Collection, CollectionIcon, DailyLog, Profile, UserStats, Work, WorkStats,
    WorkStatus, WorkType,
};
pub use error::{StoreError, StoreResult};
pub use history::ViewHistory;
pub use interactions::{Comment, Interactions};
pub use library::Library;
pub use offline::OfflineCache;
pub use ports::{Clock, FixedClock, KeyValueStore, LocalClock, PortError, PortResult};
pub use profile::ProfileStore;
pub use progress::{ProgressStore, ReadingProgress};
pub use reading_settings::{FontFamily, PageWidth, ReadingSettings, ReadingSettingsStore, Theme};
pub use storage::MemoryStore;
