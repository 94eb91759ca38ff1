use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::io::lock::FileLock;
use crate::io::store::{Store, StoreError, format_id};
use crate::model::task::{NewTask, TaskPatch, TaskRecord};

/// File name of the task store inside the data directory.
pub const STORE_FILE: &str = "tasks.json";

/// On-disk layout of `tasks.json`
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    /// Last issued id number; ids are never reused
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    tasks: Vec<TaskRecord>,
}

/// A store backed by a single JSON file.
///
/// Every call reads the file fresh so changes made by other processes are
/// always visible. Writes take the data directory lock and replace the file
/// atomically.
#[derive(Debug, Clone)]
pub struct JsonStore {
    data_dir: PathBuf,
    path: PathBuf,
}

impl JsonStore {
    pub fn open(data_dir: &Path) -> Self {
        JsonStore {
            data_dir: data_dir.to_path_buf(),
            path: data_dir.join(STORE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create an empty store file if none exists.
    pub fn init(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            return Ok(());
        }
        self.write(&StoreFile::default())
    }

    /// Look up a task by id regardless of its date.
    pub fn find(&self, id: &str) -> Result<TaskRecord, StoreError> {
        self.read()?
            .tasks
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn read(&self) -> Result<StoreFile, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoreFile::default());
            }
            Err(e) => {
                return Err(StoreError::ReadError {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        if text.trim().is_empty() {
            return Ok(StoreFile::default());
        }
        serde_json::from_str(&text).map_err(|e| StoreError::ParseError {
            path: self.path.clone(),
            source: e,
        })
    }

    fn write(&self, file: &StoreFile) -> Result<(), StoreError> {
        let write_error = |e: std::io::Error| StoreError::WriteError {
            path: self.path.clone(),
            source: e,
        };
        let content = serde_json::to_string_pretty(file).map_err(|e| StoreError::ParseError {
            path: self.path.clone(),
            source: e,
        })?;
        atomic_write(&self.path, content.as_bytes()).map_err(write_error)
    }

    /// Read-modify-write under the data directory lock.
    fn modify<T>(
        &self,
        f: impl FnOnce(&mut StoreFile) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let _lock = FileLock::acquire_default(&self.data_dir)?;
        let mut file = self.read()?;
        let out = f(&mut file)?;
        self.write(&file)?;
        Ok(out)
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl Store for JsonStore {
    fn list_by_date(&self, date: NaiveDate) -> Result<Vec<TaskRecord>, StoreError> {
        let file = self.read()?;
        Ok(file.tasks.into_iter().filter(|t| t.date == date).collect())
    }

    fn create(&self, task: NewTask) -> Result<TaskRecord, StoreError> {
        let record = self.modify(|file| {
            // next_id may trail hand-edited ids; never hand out one in use
            let mut n = file.next_id + 1;
            while file.tasks.iter().any(|t| t.id == format_id(n)) {
                n += 1;
            }
            file.next_id = n;
            let record = task.into_record(format_id(n), Utc::now());
            file.tasks.push(record.clone());
            Ok(record)
        })?;
        info!(id = %record.id, date = %record.date, "task created");
        Ok(record)
    }

    fn update_by_id(&self, id: &str, patch: &TaskPatch) -> Result<TaskRecord, StoreError> {
        let record = self.modify(|file| {
            let record = file
                .tasks
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            if patch.apply(record) {
                record.updated_at = Some(Utc::now());
            }
            Ok(record.clone())
        })?;
        debug!(id, "task updated");
        Ok(record)
    }

    fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        self.modify(|file| {
            let idx = file
                .tasks
                .iter()
                .position(|t| t.id == id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            file.tasks.remove(idx);
            Ok(())
        })?;
        info!(id, "task deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn new_task(title: &str, d: u32) -> NewTask {
        NewTask::new(title, "", Some(day(d)), None).unwrap()
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStore::open(tmp.path());
        assert!(store.list_by_date(day(10)).unwrap().is_empty());
    }

    #[test]
    fn create_persists_across_handles() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStore::open(tmp.path());
        let created = store.create(new_task("Write report", 10)).unwrap();
        assert_eq!(created.id, "T-0001");

        let reopened = JsonStore::open(tmp.path());
        let tasks = reopened.list_by_date(day(10)).unwrap();
        assert_eq!(tasks, vec![created]);
        assert!(reopened.list_by_date(day(11)).unwrap().is_empty());
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStore::open(tmp.path());
        let first = store.create(new_task("a", 10)).unwrap();
        store.delete_by_id(&first.id).unwrap();
        let second = store.create(new_task("b", 10)).unwrap();
        assert_eq!(second.id, "T-0002");
    }

    #[test]
    fn update_merges_patch_and_stamps_updated_at() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStore::open(tmp.path());
        let created = store.create(new_task("a", 10)).unwrap();

        let updated = store
            .update_by_id(&created.id, &TaskPatch::notes("remember the milk").unwrap())
            .unwrap();
        assert_eq!(updated.notes, "remember the milk");
        assert_eq!(updated.title, "a");
        assert!(updated.updated_at.is_some());
        assert_eq!(store.find(&created.id).unwrap(), updated);
        assert!(matches!(store.find("T-0009"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn update_and_delete_report_not_found() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStore::open(tmp.path());
        store.init().unwrap();
        assert!(matches!(
            store.update_by_id("T-0042", &TaskPatch::priority(0)),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_by_id("T-0042"),
            Err(StoreError::NotFound(_))
        ));
        assert!(store.list_by_date(day(10)).unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_is_an_error_not_an_empty_day() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(STORE_FILE), "{ not json").unwrap();
        let store = JsonStore::open(tmp.path());
        assert!(matches!(
            store.list_by_date(day(10)),
            Err(StoreError::ParseError { .. })
        ));
    }

    #[test]
    fn hand_edited_ids_are_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(STORE_FILE),
            r#"{
  "next_id": 0,
  "tasks": [
    {
      "id": "T-0001",
      "title": "imported",
      "date": "2024-01-10",
      "createdAt": "2024-01-10T09:00:00Z"
    }
  ]
}"#,
        )
        .unwrap();
        let store = JsonStore::open(tmp.path());
        let created = store.create(new_task("fresh", 10)).unwrap();
        assert_eq!(created.id, "T-0002");
        assert_eq!(store.list_by_date(day(10)).unwrap().len(), 2);
    }
}
