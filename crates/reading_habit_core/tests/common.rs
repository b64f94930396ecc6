#![allow(dead_code)]

use chrono::NaiveDate;
use reading_habit_core::{
    FixedClock, MemoryStore, ProfileStore, Work, WorkStats, WorkStatus, WorkType,
};
use std::sync::Arc;

pub fn day(date: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()
}

/// A clock fixed at noon on `date`.
pub fn clock_on(date: &str) -> FixedClock {
    FixedClock::new(day(date), 12)
}

/// A profile store over a shared in-memory store, so tests can reload from it.
pub fn profile_store_on(
    date: &str,
) -> (Arc<MemoryStore>, ProfileStore<Arc<MemoryStore>, FixedClock>) {
    let backing = Arc::new(MemoryStore::new());
    let profiles = ProfileStore::load(backing.clone(), clock_on(date));
    (backing, profiles)
}

/// Creates a work with the given id and sensible defaults for everything else.
pub fn create_test_work(id: &str) -> Work {
    Work {
        id: id.to_string(),
        slug: id.to_string(),
        title: format!("Work {}", id),
        author: "Anonymous".to_string(),
        work_type: WorkType::Original,
        rating: "12+".to_string(),
        warnings: Vec::new(),
        fandom: None,
        summary: String::new(),
        tags: Vec::new(),
        cover_url: String::new(),
        stats: WorkStats {
            words: 1000,
            chapters: 1,
            kudos: 0,
            comments: None,
            bookmarks: None,
            date: "2024-01-01".to_string(),
            status: WorkStatus::Complete,
        },
        series: None,
    }
}
