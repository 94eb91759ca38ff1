use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::io::lock::LockError;
use crate::model::task::{NewTask, TaskPatch, TaskRecord};

/// Error type for persistence operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// The persistence collaborator: everything the engine needs from storage.
///
/// Implementations must be shareable across threads; the focus view polls
/// from a background timer while the UI thread writes.
pub trait Store: Send + Sync {
    /// All tasks whose date is `date`, in no particular order.
    fn list_by_date(&self, date: NaiveDate) -> Result<Vec<TaskRecord>, StoreError>;

    /// Persist a new task and return it with its assigned id.
    fn create(&self, task: NewTask) -> Result<TaskRecord, StoreError>;

    /// Merge `patch` onto the task with `id`. Never creates a task.
    fn update_by_id(&self, id: &str, patch: &TaskPatch) -> Result<TaskRecord, StoreError>;

    /// Remove the task with `id`.
    fn delete_by_id(&self, id: &str) -> Result<(), StoreError>;
}

/// A store handle shared between the UI and the focus timer.
pub type SharedStore = Arc<dyn Store>;

/// Format the n-th issued id (`T-0001`, `T-0002`, ...).
pub fn format_id(n: u64) -> String {
    format!("T-{:04}", n)
}
