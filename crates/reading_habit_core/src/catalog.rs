//! Catalog browsing: the work filter and reading-time estimates.

use crate::domain::{Work, WorkStatus, WorkType};
use std::collections::BTreeSet;

/// Ratings offered by the filter UI.
pub const AVAILABLE_RATINGS: &[&str] = &["0+", "6+", "12+", "16+", "18+"];

/// Words per minute assumed by `reading_time`.
pub const READING_SPEED_WPM: u64 = 200;

/// Estimated reading time, e.g. `"7 min read"`. Never less than one minute.
pub fn reading_time(words: u64) -> String {
    if words == 0 {
        return "1 min read".to_string();
    }
    format!("{} min read", words.div_ceil(READING_SPEED_WPM))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(WorkType),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Newest first.
    #[default]
    Date,
    /// Longest first.
    Words,
}

/// Filter state for the catalog view.
#[derive(Debug, Clone, Default)]
pub struct WorkFilter {
    pub search_query: String,
    pub active_type: TypeFilter,
    pub sort_by: SortBy,
    pub show_archived: bool,
    pub selected_ratings: Vec<String>,
    pub selected_statuses: Vec<WorkStatus>,
    pub selected_fandoms: Vec<String>,
    pub selected_tags: Vec<String>,
}

fn toggle<T: PartialEq>(items: &mut Vec<T>, value: T) {
    if let Some(pos) = items.iter().position(|item| *item == value) {
        items.remove(pos);
    } else {
        items.push(value);
    }
}

impl WorkFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_type(&mut self, work_type: TypeFilter) {
        self.active_type = work_type;
    }

    pub fn set_show_archived(&mut self, value: bool) {
        self.show_archived = value;
    }

    pub fn toggle_rating(&mut self, rating: &str) {
        toggle(&mut self.selected_ratings, rating.to_string());
    }

    pub fn toggle_status(&mut self, status: WorkStatus) {
        toggle(&mut self.selected_statuses, status);
    }

    pub fn toggle_fandom(&mut self, fandom: &str) {
        toggle(&mut self.selected_fandoms, fandom.to_string());
    }

    pub fn toggle_tag(&mut self, tag: &str) {
        toggle(&mut self.selected_tags, tag.to_string());
    }

    /// Clears type, query and selections. Archive mode and sort order are kept.
    pub fn reset_filters(&mut self) {
        self.active_type = TypeFilter::All;
        self.search_query.clear();
        self.selected_ratings.clear();
        self.selected_statuses.clear();
        self.selected_fandoms.clear();
        self.selected_tags.clear();
    }

    /// Shows everything carrying `tag`, leaving archive mode so results are visible.
    pub fn search_by_tag(&mut self, tag: &str) {
        self.reset_filters();
        self.selected_tags.push(tag.to_string());
        self.show_archived = false;
    }

    pub fn active_filters_count(&self) -> usize {
        self.selected_ratings.len()
            + self.selected_statuses.len()
            + self.selected_fandoms.len()
            + self.selected_tags.len()
    }

    /// Applies every active filter and sorts the survivors.
    pub fn apply<'a>(&self, works: &'a [Work]) -> Vec<&'a Work> {
        let query = self.search_query.to_lowercase();

        let mut result: Vec<&Work> = works
            .iter()
            .filter(|w| (w.work_type == WorkType::Archive) == self.show_archived)
            .filter(|w| match self.active_type {
                TypeFilter::All => true,
                TypeFilter::Only(t) => w.work_type == t,
            })
            .filter(|w| {
                query.is_empty()
                    || w.title.to_lowercase().contains(&query)
                    || w
                        .fandom
                        .as_ref()
                        .is_some_and(|f| f.to_lowercase().contains(&query))
            })
            .filter(|w| {
                self.selected_ratings.is_empty() || self.selected_ratings.contains(&w.rating)
            })
            .filter(|w| {
                self.selected_statuses.is_empty()
                    || self.selected_statuses.contains(&w.stats.status)
            })
            .filter(|w| {
                self.selected_fandoms.is_empty()
                    || w.fandom
                        .as_ref()
                        .is_some_and(|f| self.selected_fandoms.contains(f))
            })
            .filter(|w| self.selected_tags.iter().all(|tag| w.tags.contains(tag)))
            .collect();

        match self.sort_by {
            // ISO dates sort correctly as strings.
            SortBy::Date => result.sort_by(|a, b| b.stats.date.cmp(&a.stats.date)),
            SortBy::Words => result.sort_by(|a, b| b.stats.words.cmp(&a.stats.words)),
        }
        result
    }
}

/// Distinct fandoms in first-seen order.
pub fn available_fandoms(works: &[Work]) -> Vec<String> {
    let mut fandoms: Vec<String> = Vec::new();
    for fandom in works.iter().filter_map(|w| w.fandom.as_ref()) {
        if !fandoms.contains(fandom) {
            fandoms.push(fandom.clone());
        }
    }
    fandoms
}

/// Distinct tags, sorted.
pub fn available_tags(works: &[Work]) -> Vec<String> {
    works
        .iter()
        .flat_map(|w| w.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
