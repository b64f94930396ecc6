//! crates/reading_habit_core/src/ports.rs
//!
//! Defines the service contracts (traits) the core logic depends on.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of where state is persisted and where "now" comes from.

use chrono::{Local, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the underlying storage medium.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Failed to read key '{key}': {reason}")]
    ReadFailed { key: String, reason: String },
    #[error("Failed to write key '{key}': {reason}")]
    WriteFailed { key: String, reason: String },
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Durable local key-value storage holding one JSON-encoded record per key.
///
/// Calls are synchronous and block the caller until the write has landed.
pub trait KeyValueStore: Send + Sync {
    /// Returns the raw value stored under `key`, or `None` if nothing is stored.
    fn get(&self, key: &str) -> PortResult<Option<String>>;

    /// Overwrites the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> PortResult<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> PortResult<()>;
}

/// Source of the local calendar date and wall-clock hour.
pub trait Clock: Send + Sync {
    /// The current local calendar date.
    fn today(&self) -> NaiveDate;

    /// The current local hour of day, `0..=23`.
    fn hour(&self) -> u32;

    /// The current instant formatted as RFC 3339, used for join dates.
    fn now_rfc3339(&self) -> String;

    /// The current instant as milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// The system clock in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn hour(&self) -> u32 {
        Local::now().hour()
    }

    fn now_rfc3339(&self) -> String {
        Local::now().to_rfc3339()
    }

    fn now_millis(&self) -> i64 {
        Local::now().timestamp_millis()
    }
}

/// A clock pinned to a fixed date and hour. Handy for tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub today: NaiveDate,
    pub hour: u32,
}

impl FixedClock {
    pub fn new(today: NaiveDate, hour: u32) -> Self {
        Self { today, hour }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn hour(&self) -> u32 {
        self.hour
    }

    fn now_rfc3339(&self) -> String {
        format!("{}T{:02}:00:00Z", self.today.format("%Y-%m-%d"), self.hour)
    }

    /// Midnight UTC of `today`, plus `hour` whole hours.
    fn now_millis(&self) -> i64 {
        let midnight = Utc.from_utc_datetime(&self.today.and_time(NaiveTime::MIN));
        midnight.timestamp_millis() + i64::from(self.hour) * 3_600_000
    }
}

impl<T: Clock + ?Sized> Clock for std::sync::Arc<T> {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }

    fn hour(&self) -> u32 {
        (**self).hour()
    }

    fn now_rfc3339(&self) -> String {
        (**self).now_rfc3339()
    }

    fn now_millis(&self) -> i64 {
        (**self).now_millis()
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> PortResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> PortResult<()> {
        (**self).remove(key)
    }
}
