//! Work store for work item persistence.

use std::fs::{self, File, OpenOptions};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use fieldops_models::{ItemType, WorkItem, WorkItemId};
use fs2::FileExt;
use tracing::{debug, warn};

use crate::atomic::{read_json, write_json_atomic};
use crate::error::{PersistenceError, Result};

const LOCK_FILE: &str = ".lock";

/// File-backed store of work items.
///
/// Items are stored as individual JSON files organized by item type:
/// ```text
/// base_path/
/// └── work/
///     └── {item_type}/
///         ├── .lock
///         ├── wi-abc123.json
///         └── 1042.json
/// ```
///
/// Status updates are conditional on the item's `modified_on` stamp. The
/// read-compare-write, like the exists-then-write of `insert_work`, holds
/// an exclusive lock on the item type's `.lock` file, so the check holds
/// across every `WorkStore` and process sharing the directory.
#[derive(Debug, Clone)]
pub struct WorkStore {
    base_path: PathBuf,
}

impl WorkStore {
    /// Creates a new WorkStore with the given base path.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn type_dir(&self, item_type: ItemType) -> PathBuf {
        self.base_path.join("work").join(item_type.as_key())
    }

    fn item_path(&self, item_type: ItemType, id: &WorkItemId) -> Result<PathBuf> {
        let raw = id.as_str();
        if raw.is_empty() || raw.contains(['/', '\\']) || raw.starts_with('.') {
            return Err(PersistenceError::InvalidData(format!(
                "work item id '{}' cannot be used as a file name",
                raw
            )));
        }
        Ok(self.type_dir(item_type).join(format!("{}.json", raw)))
    }

    /// Takes the exclusive lock for `item_type`. Released when the file drops.
    fn lock_type(&self, item_type: ItemType) -> Result<File> {
        let dir = self.type_dir(item_type);
        fs::create_dir_all(&dir).map_err(|source| PersistenceError::DirectoryError {
            path: dir.clone(),
            source,
        })?;

        let path = dir.join(LOCK_FILE);
        let lock_file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| PersistenceError::LockError {
                path: path.clone(),
                source,
            })?;
        FileExt::lock_exclusive(&lock_file)
            .map_err(|source| PersistenceError::LockError { path, source })?;

        Ok(lock_file)
    }

    fn not_found(id: &WorkItemId) -> PersistenceError {
        PersistenceError::NotFound {
            kind: "work item".to_string(),
            id: id.to_string(),
        }
    }

    /// Saves a work item, replacing any previous version.
    pub fn save_work(&self, item: &WorkItem) -> Result<()> {
        let path = self.item_path(item.item_type, &item.id)?;
        write_json_atomic(&path, item)
    }

    /// Saves a new work item, failing if one with the same id exists.
    pub fn insert_work(&self, item: &WorkItem) -> Result<()> {
        let path = self.item_path(item.item_type, &item.id)?;
        let lock_file = self.lock_type(item.item_type)?;

        if path.exists() {
            return Err(PersistenceError::AlreadyExists {
                kind: "work item".to_string(),
                id: item.id.to_string(),
            });
        }
        write_json_atomic(&path, item)?;

        drop(lock_file);
        Ok(())
    }

    /// Loads a work item by id, returning `None` if it does not exist.
    pub fn find_work(&self, item_type: ItemType, id: &WorkItemId) -> Result<Option<WorkItem>> {
        let path = self.item_path(item_type, id)?;
        if !path.exists() {
            return Ok(None);
        }
        read_json(&path).map(Some)
    }

    /// Loads a work item by id.
    pub fn load_work(&self, item_type: ItemType, id: &WorkItemId) -> Result<WorkItem> {
        self.find_work(item_type, id)?
            .ok_or_else(|| Self::not_found(id))
    }

    /// Lists all work items of a type, oldest first.
    ///
    /// Unreadable files are skipped with a warning.
    pub fn list_work(&self, item_type: ItemType) -> Result<Vec<WorkItem>> {
        let dir = self.type_dir(item_type);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir).map_err(|source| PersistenceError::ReadError {
            path: dir.clone(),
            source,
        })?;

        let mut items = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| PersistenceError::ReadError {
                path: dir.clone(),
                source,
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                match read_json::<WorkItem>(&path) {
                    Ok(item) => items.push(item),
                    Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable work item"),
                }
            }
        }

        items.sort_by(|a, b| {
            a.created_on
                .cmp(&b.created_on)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(items)
    }

    /// Deletes a work item. Missing items are ignored.
    pub fn delete_work(&self, item_type: ItemType, id: &WorkItemId) -> Result<()> {
        let path = self.item_path(item_type, id)?;
        if path.exists() {
            fs::remove_file(&path).map_err(|source| PersistenceError::WriteError { path, source })?;
        }
        Ok(())
    }

    /// Writes a new status if the stored stamp still equals `expected_modified_on`.
    ///
    /// On success the item is stamped with the current time and `actor`.
    pub fn update_status(
        &self,
        item_type: ItemType,
        id: &WorkItemId,
        status_code: &str,
        actor: &str,
        expected_modified_on: Option<DateTime<Utc>>,
    ) -> Result<WorkItem> {
        self.item_path(item_type, id)?;
        let lock_file = self.lock_type(item_type)?;

        let mut item = self.load_work(item_type, id)?;
        if item.modified_on != expected_modified_on {
            return Err(PersistenceError::Conflict {
                id: id.to_string(),
                expected: expected_modified_on,
                actual: item.modified_on,
            });
        }

        item.record_status(status_code, actor);
        self.save_work(&item)?;
        drop(lock_file);

        debug!(item_type = %item_type, id = %id, status = %status_code, "Persisted status");

        Ok(item)
    }
}
