pub mod events;
pub mod session;

pub use events::AchievementUnlocked;
pub use session::{SessionController, SessionState, SharedProfiles, TICK_PERIOD};
