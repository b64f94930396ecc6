//! crates/reading_habit_core/src/library.rs
//!
//! The personal library: user collections of saved works plus a cache of the
//! works they reference.

use crate::domain::{Collection, CollectionIcon, Work};
use crate::error::StoreResult;
use crate::ports::KeyValueStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use tracing::{info, warn};
use uuid::Uuid;

pub const LIBRARY_KEY: &str = "grey_sky_library_v2";

pub const DEFAULT_COLLECTION_ID: &str = "default";
pub const FAVORITES_COLLECTION_ID: &str = "favorites";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LibraryRecord {
    #[serde(default)]
    collections: Vec<Collection>,
    #[serde(default)]
    works_cache: BTreeMap<String, Work>,
}

fn system_collection(
    id: &str,
    title: &str,
    icon: CollectionIcon,
    work_ids: Vec<String>,
) -> Collection {
    Collection {
        id: id.to_string(),
        title: title.to_string(),
        icon,
        work_ids,
        is_system: true,
        description: None,
    }
}

fn default_record() -> LibraryRecord {
    LibraryRecord {
        collections: vec![
            system_collection(
                DEFAULT_COLLECTION_ID,
                "General Library",
                CollectionIcon::Default,
                Vec::new(),
            ),
            system_collection(
                FAVORITES_COLLECTION_ID,
                "Favorites",
                CollectionIcon::Heart,
                Vec::new(),
            ),
        ],
        works_cache: BTreeMap::new(),
    }
}

/// Decodes either the current record or the legacy flat list of saved works.
fn parse_record(raw: &str) -> Result<LibraryRecord, serde_json::Error> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Array(items) => {
            let works: Vec<Work> = serde_json::from_value(Value::Array(items))?;
            let work_ids = works.iter().map(|w| w.id.clone()).collect();
            Ok(LibraryRecord {
                collections: vec![system_collection(
                    DEFAULT_COLLECTION_ID,
                    "General Library",
                    CollectionIcon::Default,
                    work_ids,
                )],
                works_cache: works.into_iter().map(|w| (w.id.clone(), w)).collect(),
            })
        }
        other => serde_json::from_value(other),
    }
}

pub struct Library<S> {
    store: S,
    record: LibraryRecord,
}

impl<S: KeyValueStore> Library<S> {
    /// Loads the library. Missing or corrupt data is replaced by the two
    /// system collections, which are written back immediately.
    pub fn load(store: S) -> Self {
        let stored = match store.get(LIBRARY_KEY) {
            Ok(Some(raw)) => match parse_record(&raw) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Library data corrupted, resetting: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to read library, resetting: {}", e);
                None
            }
        };

        let mut library = Self {
            store,
            record: LibraryRecord::default(),
        };
        match stored {
            Some(record) => library.record = record,
            None => {
                if let Err(e) = library.reset_to_default() {
                    warn!("Failed to persist default library: {}", e);
                }
            }
        }
        library
    }

    pub fn collections(&self) -> &[Collection] {
        &self.record.collections
    }

    pub fn collection(&self, id: &str) -> Option<&Collection> {
        self.record.collections.iter().find(|c| c.id == id)
    }

    pub fn reset_to_default(&mut self) -> StoreResult<()> {
        info!("Resetting library to default collections");
        self.record = default_record();
        self.save()
    }

    /// Creates an empty user collection and returns its id.
    pub fn create_collection(&mut self, title: &str, icon: CollectionIcon) -> StoreResult<String> {
        let id = Uuid::new_v4().to_string();
        self.record.collections.push(Collection {
            id: id.clone(),
            title: title.to_string(),
            icon,
            work_ids: Vec::new(),
            is_system: false,
            description: None,
        });
        self.save()?;
        Ok(id)
    }

    /// Renames or re-icons a user collection. System collections are left alone.
    pub fn update_collection(
        &mut self,
        id: &str,
        title: Option<&str>,
        icon: Option<CollectionIcon>,
    ) -> StoreResult<()> {
        let Some(col) = self
            .record
            .collections
            .iter_mut()
            .find(|c| c.id == id && !c.is_system)
        else {
            return Ok(());
        };
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            col.title = title.to_string();
        }
        if let Some(icon) = icon {
            col.icon = icon;
        }
        self.save()
    }

    /// Deletes a user collection. System collections can't be deleted.
    pub fn delete_collection(&mut self, id: &str) -> StoreResult<()> {
        let Some(index) = self
            .record
            .collections
            .iter()
            .position(|c| c.id == id && !c.is_system)
        else {
            return Ok(());
        };
        self.record.collections.remove(index);
        self.clean_up_cache();
        self.save()
    }

    pub fn add_work_to_collection(&mut self, work: &Work, collection_id: &str) -> StoreResult<()> {
        let Some(col) = self
            .record
            .collections
            .iter_mut()
            .find(|c| c.id == collection_id)
        else {
            return Ok(());
        };

        self.record
            .works_cache
            .entry(work.id.clone())
            .or_insert_with(|| work.clone());

        if !col.work_ids.contains(&work.id) {
            col.work_ids.insert(0, work.id.clone());
            self.save()?;
        }
        Ok(())
    }

    pub fn remove_work_from_collection(
        &mut self,
        work_id: &str,
        collection_id: &str,
    ) -> StoreResult<()> {
        let Some(col) = self
            .record
            .collections
            .iter_mut()
            .find(|c| c.id == collection_id)
        else {
            return Ok(());
        };
        col.work_ids.retain(|id| id != work_id);
        self.clean_up_cache();
        self.save()
    }

    pub fn toggle_work_in_collection(
        &mut self,
        work: &Work,
        collection_id: &str,
    ) -> StoreResult<()> {
        if self.is_saved_in_collection(&work.id, collection_id) {
            self.remove_work_from_collection(&work.id, collection_id)
        } else {
            self.add_work_to_collection(work, collection_id)
        }
    }

    pub fn is_saved_in_collection(&self, work_id: &str, collection_id: &str) -> bool {
        self.collection(collection_id)
            .is_some_and(|c| c.work_ids.iter().any(|id| id == work_id))
    }

    pub fn is_saved_anywhere(&self, work_id: &str) -> bool {
        self.record
            .collections
            .iter()
            .any(|c| c.work_ids.iter().any(|id| id == work_id))
    }

    /// Works of a collection, most recently added first.
    pub fn works_in_collection(&self, collection_id: &str) -> Vec<&Work> {
        let Some(col) = self.collection(collection_id) else {
            return Vec::new();
        };
        col.work_ids
            .iter()
            .filter_map(|id| self.record.works_cache.get(id))
            .collect()
    }

    /// Number of distinct works saved across all collections.
    pub fn saved_count(&self) -> usize {
        self.record.works_cache.len()
    }

    /// Drops cached works no collection references anymore.
    fn clean_up_cache(&mut self) {
        let used: HashSet<&String> = self
            .record
            .collections
            .iter()
            .flat_map(|c| c.work_ids.iter())
            .collect();
        self.record.works_cache.retain(|id, _| used.contains(id));
    }

    fn save(&self) -> StoreResult<()> {
        let raw = serde_json::to_string(&self.record)?;
        self.store.set(LIBRARY_KEY, &raw)?;
        Ok(())
    }
}
