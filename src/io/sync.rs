use std::path::PathBuf;

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::io::recovery::{RecoveryCategory, RecoveryEntry, log_recovery};
use crate::io::store::{Store, StoreError};
use crate::model::config::{DefaultCollection, DefaultsConfig};
use crate::model::group::{Collection, Group};
use crate::ops::group_ops;

/// Error type for sync operations
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("could not encode collection: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Where a loaded collection came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Read from the store
    Stored,
    /// Nothing stored under the key; the default collection was used
    Missing,
    /// The stored value was unreadable; the default collection was used
    Malformed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    pub collection: Collection,
    pub source: LoadSource,
}

/// Moves whole collections between the board and a [`Store`].
///
/// Every write replaces the full value under one key. Two writers editing
/// at once each overwrite the other's unseen changes: the last write wins.
pub struct SyncCoordinator<S: Store> {
    store: S,
    key: String,
    defaults: DefaultsConfig,
    recovery_dir: Option<PathBuf>,
    synced_revision: u64,
}

impl<S: Store> SyncCoordinator<S> {
    pub fn new(store: S, key: impl Into<String>, defaults: DefaultsConfig) -> Self {
        SyncCoordinator {
            store,
            key: key.into(),
            defaults,
            recovery_dir: None,
            synced_revision: 0,
        }
    }

    /// Log unreadable values and failed writes to the recovery log in `dir`.
    pub fn with_recovery_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.recovery_dir = Some(dir.into());
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The collection used when nothing usable is stored.
    pub fn default_collection(&self) -> Collection {
        match self.defaults.collection {
            DefaultCollection::Empty => Collection::default(),
            DefaultCollection::Seeded => match group_ops::clean_title(&self.defaults.seed_title) {
                Ok(title) => Collection::new(vec![Group::new(title)]),
                Err(_) => {
                    warn!("defaults.seed_title is blank, starting with no groups");
                    Collection::default()
                }
            },
        }
    }

    /// Read the stored collection. Never fails: a missing or unreadable value
    /// gives the default collection.
    pub fn load(&self) -> Loaded {
        match self.read_stored() {
            Ok(Some(collection)) => {
                debug!(key = %self.key, groups = collection.len(), "collection loaded");
                Loaded {
                    collection,
                    source: LoadSource::Stored,
                }
            }
            Ok(None) => {
                info!(key = %self.key, "nothing stored, starting from default");
                Loaded {
                    collection: self.default_collection(),
                    source: LoadSource::Missing,
                }
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "stored collection unreadable, starting from default");
                self.record_unreadable(&e);
                Loaded {
                    collection: self.default_collection(),
                    source: LoadSource::Malformed,
                }
            }
        }
    }

    /// Read the stored collection without falling back. `Ok(None)` when the
    /// key is absent. Nothing is logged; `load` records unreadable data.
    pub fn read_stored(&self) -> Result<Option<Collection>, StoreError> {
        let mut found = self.store.get(&[self.key.as_str()])?;
        let Some(value) = found.shift_remove(&self.key) else {
            return Ok(None);
        };
        serde_json::from_value::<Collection>(value.clone())
            .map(Some)
            .map_err(|e| StoreError::InvalidValue {
                key: self.key.clone(),
                reason: e.to_string(),
                raw: serde_json::to_string_pretty(&value).unwrap_or_default(),
            })
    }

    /// Copy unreadable stored text to the recovery log before a commit can
    /// replace it.
    fn record_unreadable(&self, error: &StoreError) {
        let Some(raw) = error.raw() else {
            return;
        };
        let description = match error {
            StoreError::InvalidValue { .. } => "value is not a collection",
            _ => "store unreadable",
        };
        self.record(
            RecoveryEntry::new(RecoveryCategory::Malformed, description)
                .field("key", self.key.as_str())
                .field("error", error.to_string())
                .body(raw),
        );
    }

    /// Write the whole collection under the key. A failed write is copied to
    /// the recovery log; the caller's in-memory collection stays as it is.
    pub fn commit(&mut self, collection: &Collection) -> Result<(), SyncError> {
        let value = serde_json::to_value(collection)?;
        let mut entries = IndexMap::new();
        entries.insert(self.key.clone(), value);
        match self.store.set(entries) {
            Ok(()) => {
                debug!(key = %self.key, groups = collection.len(), "collection committed");
                Ok(())
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "commit failed");
                let body = serde_json::to_string_pretty(collection).unwrap_or_default();
                self.record(
                    RecoveryEntry::new(RecoveryCategory::Write, "commit failed")
                        .field("key", self.key.as_str())
                        .field("error", e.to_string())
                        .body(body),
                );
                Err(e.into())
            }
        }
    }

    /// Commit when `revision` differs from the last revision seen. A failed
    /// write still counts as seen; it is not retried.
    pub fn commit_if_changed(
        &mut self,
        revision: u64,
        collection: &Collection,
    ) -> Result<bool, SyncError> {
        if revision == self.synced_revision {
            return Ok(false);
        }
        self.synced_revision = revision;
        self.commit(collection)?;
        Ok(true)
    }

    /// Record `revision` as already stored (after a load or reload).
    pub fn mark_synced(&mut self, revision: u64) {
        self.synced_revision = revision;
    }

    /// True when the store holds something other than `collection`: another
    /// writer changed it. Unreadable or missing values count as diverged only
    /// if `collection` is not empty.
    pub fn diverged(&self, collection: &Collection) -> bool {
        match self.read_stored() {
            Ok(Some(stored)) => &stored != collection,
            Ok(None) | Err(_) => !collection.is_empty(),
        }
    }

    fn record(&self, entry: RecoveryEntry) {
        if let Some(dir) = &self.recovery_dir {
            log_recovery(dir, entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::recovery::read_recovery_entries;
    use crate::io::store::{JsonFileStore, MemoryStore};
    use crate::model::link::Link;
    use crate::ops::LinkOrganizer;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    const KEY: &str = "navigationColumns";

    fn coordinator(store: MemoryStore) -> SyncCoordinator<MemoryStore> {
        SyncCoordinator::new(store, KEY, DefaultsConfig::default())
    }

    fn sample() -> Collection {
        Collection::new(vec![
            Group::with_links(
                "Work",
                vec![
                    Link::new("Docs", "https://docs.example.com"),
                    Link::new("CI", "https://ci.example.com"),
                ],
            ),
            Group::with_links("Fun", vec![Link::new("Comics", "https://xkcd.com")]),
        ])
    }

    #[test]
    fn missing_key_gives_empty_default() {
        let loaded = coordinator(MemoryStore::new()).load();
        assert_eq!(loaded.source, LoadSource::Missing);
        assert!(loaded.collection.is_empty());
    }

    #[test]
    fn seeded_default_has_one_titled_group() {
        let defaults = DefaultsConfig {
            collection: DefaultCollection::Seeded,
            ..DefaultsConfig::default()
        };
        let sync = SyncCoordinator::new(MemoryStore::new(), KEY, defaults);
        let loaded = sync.load();
        assert_eq!(loaded.collection, Collection::new(vec![Group::new("Links")]));
    }

    #[test]
    fn blank_seed_title_gives_empty_default() {
        let defaults = DefaultsConfig {
            collection: DefaultCollection::Seeded,
            seed_title: "   ".into(),
            ..DefaultsConfig::default()
        };
        let sync = SyncCoordinator::new(MemoryStore::new(), KEY, defaults);
        assert!(sync.load().collection.is_empty());
    }

    #[test]
    fn truncated_file_is_kept_in_recovery_log() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("links.json");
        let truncated = r#"{"navigationColumns":[{"title":"Work","links":[{"name":"Keep me","url":"https://keep.example"}]}],"#;
        std::fs::write(&path, truncated).unwrap();

        let mut sync = SyncCoordinator::new(JsonFileStore::new(&path), KEY, DefaultsConfig::default())
            .with_recovery_dir(tmp.path());
        let loaded = sync.load();
        assert_eq!(loaded.source, LoadSource::Malformed);

        let mut organizer = LinkOrganizer::new(loaded.collection);
        organizer.add_group("New").unwrap();
        sync.commit(organizer.collection()).unwrap();

        let entries = read_recovery_entries(tmp.path());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "store unreadable");
        assert_eq!(entries[0].body, truncated);
        assert_eq!(sync.load().collection, *organizer.collection());
    }

    #[test]
    fn diverged_does_not_log_malformed_values() {
        let tmp = TempDir::new().unwrap();
        let store = MemoryStore::with_entry(KEY, json!("oops"));
        let sync = coordinator(store).with_recovery_dir(tmp.path());

        assert_eq!(sync.load().source, LoadSource::Malformed);
        assert!(!sync.diverged(&Collection::default()));
        assert!(sync.diverged(&sample()));
        assert_eq!(read_recovery_entries(tmp.path()).len(), 1);
    }

    #[test]
    fn malformed_value_falls_back_and_is_recorded() {
        let tmp = TempDir::new().unwrap();
        let store = MemoryStore::with_entry(KEY, json!({"not": "a list"}));
        let sync = coordinator(store).with_recovery_dir(tmp.path());

        let loaded = sync.load();
        assert_eq!(loaded.source, LoadSource::Malformed);
        assert!(loaded.collection.is_empty());

        let entries = read_recovery_entries(tmp.path());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, RecoveryCategory::Malformed);
        assert!(entries[0].body.contains("\"not\""));
    }

    #[test]
    fn links_without_a_links_field_load_as_empty_groups() {
        let store = MemoryStore::with_entry(KEY, json!([{"title": "Bare"}]));
        let loaded = coordinator(store).load();
        assert_eq!(loaded.source, LoadSource::Stored);
        assert_eq!(loaded.collection, Collection::new(vec![Group::new("Bare")]));
    }

    #[test]
    fn commit_then_load_round_trips() {
        let mut sync = coordinator(MemoryStore::new());
        sync.commit(&sample()).unwrap();
        let loaded = sync.load();
        assert_eq!(loaded.source, LoadSource::Stored);
        assert_eq!(loaded.collection, sample());
    }

    #[test]
    fn stored_shape_matches_wire_format() {
        let mut organizer = LinkOrganizer::default();
        organizer.add_group("Work").unwrap();
        organizer
            .add_link(0, &Link::new("Docs", "https://docs.example.com"))
            .unwrap();

        let mut sync = coordinator(MemoryStore::new());
        sync.commit(organizer.collection()).unwrap();

        let stored = sync.store().get(&[KEY]).unwrap();
        assert_eq!(
            stored[KEY],
            json!([{"title": "Work", "links": [{"name": "Docs", "url": "https://docs.example.com"}]}])
        );
    }

    #[test]
    fn commit_if_changed_skips_unchanged_revisions() {
        let mut sync = coordinator(MemoryStore::new());
        assert!(!sync.commit_if_changed(0, &sample()).unwrap());
        assert!(sync.store().get(&[KEY]).unwrap().is_empty());

        assert!(sync.commit_if_changed(1, &sample()).unwrap());
        assert!(!sync.commit_if_changed(1, &sample()).unwrap());
    }

    #[test]
    fn last_writer_wins() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("links.json");
        let mut panel = SyncCoordinator::new(JsonFileStore::new(&path), KEY, DefaultsConfig::default());
        let mut quick = SyncCoordinator::new(JsonFileStore::new(&path), KEY, DefaultsConfig::default());

        let mut seen_by_panel = panel.load().collection;
        let mut seen_by_quick = quick.load().collection;

        seen_by_quick.groups.push(Group::with_links(
            "Quick",
            vec![Link::new("Page", "https://page.example")],
        ));
        quick.commit(&seen_by_quick).unwrap();

        seen_by_panel.groups.push(Group::new("Panel"));
        panel.commit(&seen_by_panel).unwrap();

        assert_eq!(panel.load().collection, seen_by_panel);
    }

    #[test]
    fn diverged_detects_other_writers() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("links.json");
        let mut sync = SyncCoordinator::new(JsonFileStore::new(&path), KEY, DefaultsConfig::default());
        assert!(!sync.diverged(&Collection::default()));

        sync.commit(&sample()).unwrap();
        assert!(!sync.diverged(&sample()));

        let mut other = SyncCoordinator::new(JsonFileStore::new(&path), KEY, DefaultsConfig::default());
        other.commit(&Collection::default()).unwrap();
        assert!(sync.diverged(&sample()));
    }

    #[test]
    fn failed_write_is_recorded() {
        let tmp = TempDir::new().unwrap();
        // A directory where the store file should be makes the write fail.
        let path = tmp.path().join("links.json");
        std::fs::create_dir(&path).unwrap();

        let mut sync = SyncCoordinator::new(JsonFileStore::new(&path), KEY, DefaultsConfig::default())
            .with_recovery_dir(tmp.path());
        assert!(sync.commit(&sample()).is_err());

        let entries = read_recovery_entries(tmp.path());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, RecoveryCategory::Write);
        assert!(entries[0].body.contains("https://docs.example.com"));
    }
}
