//! crates/reading_habit_core/src/achievements.rs
//!
//! The static achievement table and its evaluator.
//!
//! Evaluation data (id + predicate) lives in `ACHIEVEMENTS`. Display text
//! lives in a separate catalog looked up by id, so the evaluator carries no
//! presentation concern.

use crate::domain::{AchievementId, Profile};
use crate::ports::{Clock, KeyValueStore};
use crate::profile::ProfileStore;
use tracing::{info, warn};

pub const NIGHT_OWL: &str = "night_owl";
pub const MARATHON_RUNNER: &str = "marathon_runner";
pub const DEDICATED: &str = "dedicated";
pub const SCHOLAR: &str = "scholar";

/// Everything a condition may look at. Conditions are pure functions of this.
#[derive(Debug, Clone, Copy)]
pub struct AchievementInputs<'a> {
    pub profile: &'a Profile,
    pub streak: u32,
    /// Local wall-clock hour, `0..=23`.
    pub hour: u32,
}

/// One row of the evaluation table.
#[derive(Clone, Copy)]
pub struct Achievement {
    pub id: &'static str,
    pub condition: fn(&AchievementInputs<'_>) -> bool,
}

/// Display text for an achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementInfo {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

fn read_at_night(inputs: &AchievementInputs<'_>) -> bool {
    (2..5).contains(&inputs.hour)
}

fn read_ten_thousand_words(inputs: &AchievementInputs<'_>) -> bool {
    inputs.profile.stats.total_words >= 10_000
}

fn three_day_streak(inputs: &AchievementInputs<'_>) -> bool {
    inputs.streak >= 3
}

fn read_a_full_day(inputs: &AchievementInputs<'_>) -> bool {
    inputs.profile.stats.total_seconds >= 24 * 60 * 60
}

/// Evaluated in declaration order.
pub const ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: NIGHT_OWL,
        condition: read_at_night,
    },
    Achievement {
        id: MARATHON_RUNNER,
        condition: read_ten_thousand_words,
    },
    Achievement {
        id: DEDICATED,
        condition: three_day_streak,
    },
    Achievement {
        id: SCHOLAR,
        condition: read_a_full_day,
    },
];

const CATALOG: &[AchievementInfo] = &[
    AchievementInfo {
        id: NIGHT_OWL,
        title: "Night Owl",
        description: "Read between 2 AM and 5 AM.",
    },
    AchievementInfo {
        id: MARATHON_RUNNER,
        title: "Marathon Runner",
        description: "Read more than 10,000 words in total.",
    },
    AchievementInfo {
        id: DEDICATED,
        title: "Dedicated",
        description: "Maintain a 3-day reading streak.",
    },
    AchievementInfo {
        id: SCHOLAR,
        title: "Scholar",
        description: "Accumulate 24 hours of total reading time.",
    },
];

/// Looks up display text for `id`.
pub fn achievement_info(id: &str) -> Option<&'static AchievementInfo> {
    CATALOG.iter().find(|info| info.id == id)
}

/// All achievements with display text, in table order.
pub fn catalog() -> &'static [AchievementInfo] {
    CATALOG
}

/// Unlocks every achievement whose condition now holds.
///
/// Returns the newly unlocked ids in table order. Already unlocked entries are
/// skipped without evaluating their condition. A failed write is logged and
/// the unlock still counts, since it holds in memory for the session.
pub fn evaluate<S: KeyValueStore, C: Clock>(
    profiles: &mut ProfileStore<S, C>,
) -> Vec<AchievementId> {
    let streak = profiles.current_streak();
    let hour = profiles.clock().hour();

    let met: Vec<&'static str> = {
        let inputs = AchievementInputs {
            profile: profiles.profile(),
            streak,
            hour,
        };
        ACHIEVEMENTS
            .iter()
            .filter(|a| !inputs.profile.has_achievement(a.id))
            .filter(|a| (a.condition)(&inputs))
            .map(|a| a.id)
            .collect()
    };

    let mut unlocked = Vec::new();
    for id in met {
        let is_new = match profiles.unlock_achievement(id) {
            Ok(is_new) => is_new,
            Err(e) => {
                warn!("Achievement '{}' unlocked but not persisted: {}", id, e);
                true
            }
        };
        if is_new {
            let title = achievement_info(id).map_or(id, |info| info.title);
            info!("Achievement unlocked: {}", title);
            unlocked.push(id.to_string());
        }
    }
    unlocked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::FixedClock;
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;

    fn store_at(hour: u32) -> ProfileStore<MemoryStore, FixedClock> {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), hour);
        ProfileStore::load(MemoryStore::new(), clock)
    }

    #[test]
    fn test_every_table_entry_has_display_text() {
        for achievement in ACHIEVEMENTS {
            assert!(achievement_info(achievement.id).is_some(), "{}", achievement.id);
        }
        assert_eq!(catalog().len(), ACHIEVEMENTS.len());
    }

    #[test]
    fn test_night_owl_window() {
        for (hour, expected) in [(1, false), (2, true), (4, true), (5, false)] {
            let mut profiles = store_at(hour);
            let unlocked = evaluate(&mut profiles);
            assert_eq!(unlocked.contains(&NIGHT_OWL.to_string()), expected, "hour {}", hour);
        }
    }

    #[test]
    fn test_nothing_unlocks_on_a_fresh_profile() {
        let mut profiles = store_at(12);
        assert!(evaluate(&mut profiles).is_empty());
    }

    #[test]
    fn test_unlocks_come_back_in_table_order() {
        let mut profiles = store_at(3);
        profiles.record_activity(24 * 60 * 60, 10_000).unwrap();
        assert_eq!(
            evaluate(&mut profiles),
            vec![NIGHT_OWL, MARATHON_RUNNER, SCHOLAR]
        );
        assert!(evaluate(&mut profiles).is_empty());
    }

    #[test]
    fn test_unlock_counts_even_when_write_fails() {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), 12);
        let mut profiles = ProfileStore::load(MemoryStore::with_quota(0), clock);
        assert!(profiles.record_activity(0, 10_000).is_err());
        assert_eq!(evaluate(&mut profiles), vec![MARATHON_RUNNER]);
        assert!(profiles.profile().has_achievement(MARATHON_RUNNER));
        assert!(evaluate(&mut profiles).is_empty());
    }
}
