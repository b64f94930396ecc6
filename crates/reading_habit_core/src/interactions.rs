//! Likes and comments the reader leaves on works.
//!
//! Liked work ids and comments are persisted under separate keys. Like counts
//! are seeded from the catalog's figure on first use and only live in memory.

use crate::domain::Profile;
use crate::error::StoreResult;
use crate::ports::{Clock, KeyValueStore};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::warn;
use uuid::Uuid;

pub const LIKES_KEY: &str = "grey_sky_likes";
pub const COMMENTS_KEY: &str = "grey_sky_comments";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub work_id: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub text: String,
    /// RFC 3339 timestamp.
    pub date: String,
    #[serde(default)]
    pub likes: u32,
}

pub struct Interactions<S, C> {
    store: S,
    clock: C,
    liked: BTreeSet<String>,
    like_counts: HashMap<String, u32>,
    /// Newest comment first, per work id.
    comments: BTreeMap<String, Vec<Comment>>,
}

fn load_or_default<S: KeyValueStore, T: DeserializeOwned + Default>(store: &S, key: &str) -> T {
    match store.get(key) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Failed to parse '{}': {}", key, e);
            T::default()
        }),
        Ok(None) => T::default(),
        Err(e) => {
            warn!("Failed to read '{}': {}", key, e);
            T::default()
        }
    }
}

impl<S: KeyValueStore, C: Clock> Interactions<S, C> {
    pub fn load(store: S, clock: C) -> Self {
        let liked = load_or_default(&store, LIKES_KEY);
        let comments = load_or_default(&store, COMMENTS_KEY);
        Self {
            store,
            clock,
            liked,
            like_counts: HashMap::new(),
            comments,
        }
    }

    pub fn is_liked(&self, work_id: &str) -> bool {
        self.liked.contains(work_id)
    }

    /// The displayed like count, `initial_count` until the reader toggles a like.
    pub fn likes_count(&self, work_id: &str, initial_count: u32) -> u32 {
        self.like_counts
            .get(work_id)
            .copied()
            .unwrap_or(initial_count)
    }

    /// Likes or unlikes `work_id` and returns whether it is now liked.
    pub fn toggle_like(&mut self, work_id: &str, initial_count: u32) -> StoreResult<bool> {
        let count = self
            .like_counts
            .entry(work_id.to_string())
            .or_insert(initial_count);
        let liked = if self.liked.remove(work_id) {
            *count = count.saturating_sub(1);
            false
        } else {
            self.liked.insert(work_id.to_string());
            *count = count.saturating_add(1);
            true
        };

        let raw = serde_json::to_string(&self.liked)?;
        self.store.set(LIKES_KEY, &raw)?;
        Ok(liked)
    }

    pub fn comments(&self, work_id: &str) -> &[Comment] {
        self.comments
            .get(work_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Posts a comment as `author`. Blank text is ignored and returns `None`.
    pub fn add_comment(
        &mut self,
        work_id: &str,
        text: &str,
        author: &Profile,
    ) -> StoreResult<Option<Comment>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            work_id: work_id.to_string(),
            author: author.username.clone(),
            avatar_url: Some(author.avatar_url.clone()),
            text: text.to_string(),
            date: self.clock.now_rfc3339(),
            likes: 0,
        };
        self.comments
            .entry(work_id.to_string())
            .or_default()
            .insert(0, comment.clone());

        let raw = serde_json::to_string(&self.comments)?;
        self.store.set(COMMENTS_KEY, &raw)?;
        Ok(Some(comment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::FixedClock;
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;

    fn interactions() -> Interactions<MemoryStore, FixedClock> {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), 12);
        Interactions::load(MemoryStore::new(), clock)
    }

    #[test]
    fn test_toggle_like_moves_the_count() {
        let mut interactions = interactions();
        assert_eq!(interactions.likes_count("w1", 41), 41);

        assert!(interactions.toggle_like("w1", 41).unwrap());
        assert!(interactions.is_liked("w1"));
        assert_eq!(interactions.likes_count("w1", 41), 42);

        assert!(!interactions.toggle_like("w1", 41).unwrap());
        assert!(!interactions.is_liked("w1"));
        assert_eq!(interactions.likes_count("w1", 41), 41);
    }

    #[test]
    fn test_unlike_never_goes_below_zero() {
        let mut interactions = interactions();
        interactions.liked.insert("w1".to_string());
        interactions.toggle_like("w1", 0).unwrap();
        assert_eq!(interactions.likes_count("w1", 0), 0);
    }

    #[test]
    fn test_blank_comment_is_ignored() {
        let mut interactions = interactions();
        let author = Profile::new("2024-01-01");
        assert_eq!(interactions.add_comment("w1", "   \n", &author).unwrap(), None);
        assert!(interactions.comments("w1").is_empty());
    }
}
