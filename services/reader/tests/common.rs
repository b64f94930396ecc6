#![allow(dead_code)]

use chrono::NaiveDate;
use reader_lib::state::ReaderState;
use reading_habit_core::{FixedClock, MemoryStore, Work};
use std::sync::Arc;

/// A clock at noon on 2024-01-05, well outside the night-owl window.
pub fn noon_clock() -> FixedClock {
    FixedClock::new(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), 12)
}

/// Reader state over a fresh in-memory store.
pub fn create_test_state() -> (Arc<MemoryStore>, ReaderState<MemoryStore, FixedClock>) {
    let backing = Arc::new(MemoryStore::new());
    let state = ReaderState::load(backing.clone(), noon_clock());
    (backing, state)
}

/// Reader state whose every write fails.
pub fn create_full_storage_state() -> ReaderState<MemoryStore, FixedClock> {
    ReaderState::load(Arc::new(MemoryStore::with_quota(0)), noon_clock())
}

/// A one-shot work with the given id, decoded from its stored JSON form.
pub fn test_work(id: &str) -> Work {
    serde_json::from_value(serde_json::json!({
        "id": id, "slug": id, "title": "Grey Sky", "author": "A.", "type": "Original",
        "rating": "12+", "tags": ["rain"],
        "stats": {"words": 1234, "chapters": 1, "kudos": 3, "date": "2024-01-01",
            "status": "One-Shot"}
    }))
    .unwrap()
}
