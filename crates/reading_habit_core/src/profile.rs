//! crates/reading_habit_core/src/profile.rs
//!
//! The Profile Store: owns the durable reading profile, applies activity to it,
//! and persists the whole record after every mutation.

use crate::domain::{DailyLog, Profile, MAX_DAILY_LOGS};
use crate::error::StoreResult;
use crate::ports::{Clock, KeyValueStore};
use crate::streak::{current_streak, format_date};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

/// Storage key holding the serialized profile.
pub const PROFILE_KEY: &str = "grey_sky_user_profile_v1";

/// Owns the user's `Profile` and the port it is persisted through.
pub struct ProfileStore<S, C> {
    store: S,
    clock: C,
    profile: Profile,
}

impl<S: KeyValueStore, C: Clock> ProfileStore<S, C> {
    /// Loads the profile from `store`, merging it over fresh defaults.
    ///
    /// A missing record yields defaults. A record that can't be read or parsed
    /// is discarded with a warning and defaults are used instead.
    pub fn load(store: S, clock: C) -> Self {
        let defaults = Profile::new(clock.now_rfc3339());

        let mut profile = match store.get(PROFILE_KEY) {
            Ok(Some(raw)) => match merge_with_defaults(&defaults, &raw) {
                Ok(profile) => {
                    debug!("Loaded stored reading profile");
                    profile
                }
                Err(e) => {
                    warn!("User profile corrupted, falling back to defaults: {}", e);
                    defaults
                }
            },
            Ok(None) => {
                info!("No stored reading profile, starting fresh");
                defaults
            }
            Err(e) => {
                warn!("Failed to read stored profile, falling back to defaults: {}", e);
                defaults
            }
        };

        while profile.daily_logs.len() > MAX_DAILY_LOGS {
            evict_oldest_log(&mut profile.daily_logs);
        }

        Self {
            store,
            clock,
            profile,
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Today's local date as `YYYY-MM-DD`.
    pub fn today_date_string(&self) -> String {
        format_date(self.clock.today())
    }

    /// Adds reading time and words to the running totals and to today's log.
    pub fn record_activity(&mut self, seconds_delta: u64, words_delta: u64) -> StoreResult<()> {
        let today = self.today_date_string();

        let stats = &mut self.profile.stats;
        stats.total_seconds = stats.total_seconds.saturating_add(seconds_delta);
        stats.total_words = stats.total_words.saturating_add(words_delta);
        if stats.last_active_date.as_deref() != Some(today.as_str()) {
            stats.last_active_date = Some(today.clone());
        }

        let logs = &mut self.profile.daily_logs;
        match logs.iter_mut().find(|log| log.date == today) {
            Some(log) => {
                log.seconds = log.seconds.saturating_add(seconds_delta);
                log.words = log.words.saturating_add(words_delta);
            }
            None => {
                logs.push(DailyLog {
                    date: today,
                    seconds: seconds_delta,
                    words: words_delta,
                });
                if logs.len() > MAX_DAILY_LOGS {
                    evict_oldest_log(logs);
                }
            }
        }

        self.save()
    }

    /// Marks `id` as unlocked.
    ///
    /// Returns `Ok(true)` only the first time an id is unlocked. When the write
    /// fails the id is still unlocked in memory and the storage error is returned.
    pub fn unlock_achievement(&mut self, id: &str) -> StoreResult<bool> {
        if self.profile.has_achievement(id) {
            return Ok(false);
        }
        self.profile.unlocked_achievements.push(id.to_string());
        self.save()?;
        Ok(true)
    }

    /// Replaces the profile with fresh defaults and persists it.
    pub fn reset(&mut self) -> StoreResult<()> {
        info!("Resetting reading profile");
        self.profile = Profile::new(self.clock.now_rfc3339());
        self.save()
    }

    /// Average reading speed, rounded. Zero until a full minute has been read.
    pub fn words_per_minute(&self) -> u64 {
        let stats = &self.profile.stats;
        if stats.total_seconds < 60 {
            return 0;
        }
        let minutes = stats.total_seconds as f64 / 60.0;
        (stats.total_words as f64 / minutes).round() as u64
    }

    pub fn current_streak(&self) -> u32 {
        current_streak(&self.profile.daily_logs, self.clock.today())
    }

    /// Total reading time as `"{hours}h {minutes}m"`.
    pub fn formatted_total_time(&self) -> String {
        let total = self.profile.stats.total_seconds;
        format!("{}h {}m", total / 3600, (total % 3600) / 60)
    }

    fn save(&self) -> StoreResult<()> {
        let raw = serde_json::to_string(&self.profile)?;
        self.store.set(PROFILE_KEY, &raw)?;
        Ok(())
    }
}

/// Overlays a stored record on `defaults`: top-level fields replace defaults,
/// and fields of `stats` replace default stats one by one. Fields missing
/// from the record (or stored as `null` at the top level) keep their defaults.
fn merge_with_defaults(defaults: &Profile, raw: &str) -> Result<Profile, serde_json::Error> {
    let parsed: Value = serde_json::from_str(raw)?;
    let Value::Object(overlay) = parsed else {
        return Err(serde::de::Error::custom("profile record is not a JSON object"));
    };

    let Value::Object(mut merged) = serde_json::to_value(defaults)? else {
        return Err(serde::de::Error::custom("default profile is not a JSON object"));
    };

    for (key, value) in overlay {
        if value.is_null() {
            continue;
        }
        if key == "stats" {
            if let Value::Object(stats) = value {
                merge_stats(&mut merged, stats);
            }
            continue;
        }
        merged.insert(key, value);
    }

    serde_json::from_value(Value::Object(merged))
}

fn merge_stats(merged: &mut Map<String, Value>, stats: Map<String, Value>) {
    if let Some(Value::Object(base)) = merged.get_mut("stats") {
        for (key, value) in stats {
            base.insert(key, value);
        }
    }
}

/// Removes the entry with the earliest date.
fn evict_oldest_log(logs: &mut Vec<DailyLog>) {
    let oldest = logs
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.date.cmp(&b.date))
        .map(|(index, _)| index);
    if let Some(index) = oldest {
        let evicted = logs.remove(index);
        debug!(date = %evicted.date, "Evicted oldest daily log");
    }
}
