mod common;

use common::*;
use reading_habit_core::achievements::{evaluate, DEDICATED, MARATHON_RUNNER};
use reading_habit_core::domain::MAX_DAILY_LOGS;
use reading_habit_core::profile::PROFILE_KEY;
use reading_habit_core::{FixedClock, KeyValueStore, MemoryStore, ProfileStore};

#[test]
fn test_totals_equal_sum_of_deltas() {
    let (_, mut profiles) = profile_store_on("2024-01-05");
    let deltas = [(1, 0), (0, 250), (30, 1200), (0, 0), (59, 1)];
    for (seconds, words) in deltas {
        profiles.record_activity(seconds, words).unwrap();
    }
    let stats = &profiles.profile().stats;
    assert_eq!(stats.total_seconds, 90);
    assert_eq!(stats.total_words, 1451);
    assert_eq!(stats.last_active_date.as_deref(), Some("2024-01-05"));
}

#[test]
fn test_same_day_accumulates_into_one_log() {
    let (_, mut profiles) = profile_store_on("2024-01-05");
    profiles.record_activity(10, 100).unwrap();
    profiles.record_activity(5, 50).unwrap();

    assert_eq!(profiles.profile().daily_logs.len(), 1);
    let log = profiles.profile().daily_log("2024-01-05").unwrap();
    assert_eq!(log.seconds, 15);
    assert_eq!(log.words, 150);
}

#[test]
fn test_zero_deltas_still_create_todays_log_and_persist() {
    let (backing, mut profiles) = profile_store_on("2024-01-05");
    profiles.record_activity(0, 0).unwrap();
    assert_eq!(profiles.profile().daily_logs.len(), 1);
    assert!(backing.get(PROFILE_KEY).unwrap().is_some());
}

#[test]
fn test_daily_logs_are_capped_at_a_year() {
    let (_, mut profiles) = profile_store_on("2023-01-01");
    let start = day("2023-01-01");
    for offset in 0..(MAX_DAILY_LOGS as i64 + 10) {
        profiles.clock_mut().today = start + chrono::Duration::days(offset);
        profiles.record_activity(1, 0).unwrap();
    }

    let logs = &profiles.profile().daily_logs;
    assert_eq!(logs.len(), MAX_DAILY_LOGS);
    assert_eq!(logs[0].date, "2023-01-11");
    assert_eq!(profiles.profile().stats.total_seconds, MAX_DAILY_LOGS as u64 + 10);
}

#[test]
fn test_unlock_achievement_is_at_most_once() {
    let (_, mut profiles) = profile_store_on("2024-01-05");
    assert!(profiles.unlock_achievement("scholar").unwrap());
    for _ in 0..3 {
        assert!(!profiles.unlock_achievement("scholar").unwrap());
    }
    assert_eq!(profiles.profile().unlocked_achievements, vec!["scholar".to_string()]);
}

#[test]
fn test_streak_over_consecutive_days() {
    let (_, mut profiles) = profile_store_on("2024-01-01");
    for date in ["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05"] {
        profiles.clock_mut().today = day(date);
        profiles.record_activity(60, 0).unwrap();
    }
    assert_eq!(profiles.current_streak(), 5);

    // Still alive the next day, gone the day after.
    profiles.clock_mut().today = day("2024-01-06");
    assert_eq!(profiles.current_streak(), 5);
    profiles.clock_mut().today = day("2024-01-07");
    assert_eq!(profiles.current_streak(), 0);
}

#[test]
fn test_streak_with_missing_day() {
    let (_, mut profiles) = profile_store_on("2024-01-01");
    for date in ["2024-01-01", "2024-01-02", "2024-01-04", "2024-01-05"] {
        profiles.clock_mut().today = day(date);
        profiles.record_activity(60, 0).unwrap();
    }
    assert_eq!(profiles.current_streak(), 2);
}

#[test]
fn test_streak_of_empty_profile_is_zero() {
    let (_, profiles) = profile_store_on("2024-01-05");
    assert_eq!(profiles.current_streak(), 0);
}

#[test]
fn test_words_per_minute() {
    let (_, mut profiles) = profile_store_on("2024-01-05");
    assert_eq!(profiles.words_per_minute(), 0);

    profiles.record_activity(30, 100).unwrap();
    assert_eq!(profiles.words_per_minute(), 0);

    profiles.record_activity(90, 300).unwrap();
    assert_eq!(profiles.words_per_minute(), 200);
}

#[test]
fn test_marathon_runner_unlocks_when_crossing_ten_thousand_words() {
    let (_, mut profiles) = profile_store_on("2024-01-05");

    profiles.record_activity(0, 9_999).unwrap();
    assert!(!evaluate(&mut profiles).contains(&MARATHON_RUNNER.to_string()));
    assert!(!profiles.profile().has_achievement(MARATHON_RUNNER));

    profiles.record_activity(0, 1).unwrap();
    assert_eq!(evaluate(&mut profiles), vec![MARATHON_RUNNER.to_string()]);

    profiles.record_activity(0, 5_000).unwrap();
    assert!(evaluate(&mut profiles).is_empty());
    assert!(profiles.profile().has_achievement(MARATHON_RUNNER));
}

/// Records a minute of reading on each date, evaluating after every day.
fn read_on_days(
    profiles: &mut ProfileStore<std::sync::Arc<MemoryStore>, FixedClock>,
    dates: &[&str],
) -> Vec<String> {
    let mut unlocked = Vec::new();
    for date in dates {
        profiles.clock_mut().today = day(date);
        profiles.record_activity(60, 0).unwrap();
        unlocked.extend(evaluate(profiles));
    }
    unlocked
}

#[test]
fn test_dedicated_unlocks_on_third_consecutive_day() {
    let (backing, mut profiles) = profile_store_on("2024-01-30");

    assert!(read_on_days(&mut profiles, &["2024-01-30", "2024-01-31"]).is_empty());
    assert_eq!(
        read_on_days(&mut profiles, &["2024-02-01"]),
        vec![DEDICATED.to_string()]
    );
    assert!(read_on_days(&mut profiles, &["2024-02-02"]).is_empty());

    let reloaded = ProfileStore::load(backing, clock_on("2024-02-02"));
    assert!(reloaded.profile().has_achievement(DEDICATED));
}

#[test]
fn test_dedicated_stays_locked_across_a_gap() {
    let (_, mut profiles) = profile_store_on("2024-01-01");
    let dates = ["2024-01-01", "2024-01-02", "2024-01-04", "2024-01-05"];

    assert!(read_on_days(&mut profiles, &dates).is_empty());
    assert!(!profiles.profile().has_achievement(DEDICATED));
}

#[test]
fn test_dedicated_stays_locked_when_streak_is_stale() {
    let (_, mut profiles) = profile_store_on("2024-01-01");
    // Three consecutive days, but the evaluator only sees them two days later.
    for date in ["2024-01-01", "2024-01-02", "2024-01-03"] {
        profiles.clock_mut().today = day(date);
        profiles.record_activity(60, 0).unwrap();
    }
    profiles.clock_mut().today = day("2024-01-05");

    assert_eq!(profiles.current_streak(), 0);
    assert!(evaluate(&mut profiles).is_empty());
    assert!(!profiles.profile().has_achievement(DEDICATED));
}

#[test]
fn test_reload_round_trip() {
    let (backing, mut profiles) = profile_store_on("2024-01-05");
    profiles.record_activity(125, 480).unwrap();
    profiles.unlock_achievement("dedicated").unwrap();
    let before = profiles.profile().clone();

    let reloaded = ProfileStore::load(backing, clock_on("2024-01-05"));
    assert_eq!(reloaded.profile(), &before);
}

#[test]
fn test_old_record_without_new_fields_loads_with_defaults() {
    let backing = MemoryStore::new();
    backing
        .set(
            PROFILE_KEY,
            r#"{"username":"Old Reader","stats":{"totalSeconds":3600,"totalWords":9000},
               "dailyLogs":[{"date":"2024-01-04","seconds":3600,"words":9000}]}"#,
        )
        .unwrap();

    let profiles = ProfileStore::load(backing, clock_on("2024-01-05"));
    let profile = profiles.profile();
    assert_eq!(profile.username, "Old Reader");
    assert_eq!(profile.level, 1);
    assert!(profile.unlocked_achievements.is_empty());
    assert_eq!(profile.stats.total_seconds, 3600);
    assert_eq!(profile.stats.last_active_date, None);
    assert_eq!(profiles.current_streak(), 1);
    assert_eq!(profiles.formatted_total_time(), "1h 0m");
}

#[test]
fn test_corrupt_record_falls_back_to_defaults() {
    let backing = MemoryStore::new();
    backing.set(PROFILE_KEY, "{\"username\": oops").unwrap();
    let profiles = ProfileStore::load(backing, clock_on("2024-01-05"));
    assert_eq!(profiles.profile().username, "Guest Reader");
    assert_eq!(profiles.profile().stats.total_words, 0);
}

#[test]
fn test_write_failure_keeps_in_memory_state() {
    let clock = FixedClock::new(day("2024-01-05"), 12);
    let mut profiles = ProfileStore::load(MemoryStore::with_quota(16), clock);

    assert!(profiles.record_activity(5, 10).is_err());
    assert!(profiles.record_activity(5, 10).is_err());
    assert_eq!(profiles.profile().stats.total_seconds, 10);
    assert_eq!(profiles.profile().daily_logs.len(), 1);
}
