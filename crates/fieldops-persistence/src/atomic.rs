//! Crash-safe JSON file helpers.
//!
//! Records are written to a temp file in the target directory, flushed, and
//! renamed over the destination, so readers never observe a half-written
//! work item.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{PersistenceError, Result};

fn write_err(path: &Path) -> impl FnOnce(std::io::Error) -> PersistenceError + '_ {
    move |source| PersistenceError::WriteError {
        path: path.to_path_buf(),
        source,
    }
}

/// Serializes `value` as pretty JSON and atomically replaces `path`.
///
/// Missing parent directories are created.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value)?;

    let dir = path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(dir).map_err(|source| PersistenceError::DirectoryError {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(write_err(path))?;
    temp.write_all(&json).map_err(write_err(path))?;
    temp.as_file().sync_all().map_err(write_err(path))?;
    temp.persist(path).map_err(|e| write_err(path)(e.error))?;

    Ok(())
}

/// Reads and deserializes a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read(path).map_err(|source| PersistenceError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_slice(&data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldops_models::{ItemType, WorkItem};
    use tempfile::tempdir;

    #[test]
    fn test_write_creates_nested_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("work/unit_test/item.json");
        let item = WorkItem::new(ItemType::UnitTest, "Pending");

        write_json_atomic(&path, &item).unwrap();

        let loaded: WorkItem = read_json(&path).unwrap();
        assert_eq!(loaded, item);
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("item.json");

        let mut item = WorkItem::new(ItemType::UnitTest, "Pending");
        write_json_atomic(&path, &item).unwrap();
        item.status_code = "InTest".to_string();
        write_json_atomic(&path, &item).unwrap();

        let loaded: WorkItem = read_json(&path).unwrap();
        assert_eq!(loaded.status_code, "InTest");
        // No temp files left behind.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let result: Result<WorkItem> = read_json(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(PersistenceError::ReadError { .. })));
    }

    #[test]
    fn test_read_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corrupt.json");
        fs::write(&path, "{ truncated").unwrap();

        let result: Result<WorkItem> = read_json(&path);
        assert!(matches!(result, Err(PersistenceError::SerializeError(_))));
    }
}
