use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::io::store::{Store, StoreError};
use crate::model::task::{NewTask, TaskPatch, TaskRecord, ValidationError};
use crate::ops::order::{next_priority, plan_reorder, sort_tasks};

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("task not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for TaskError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => TaskError::NotFound(id),
            other => TaskError::Store(other),
        }
    }
}

// ---------------------------------------------------------------------------
// Retrieval
// ---------------------------------------------------------------------------

/// Fetch one day's tasks in display order.
///
/// A missing date is rejected before the store is touched. Store failures
/// are returned as-is, never as an empty day.
pub fn load_day(store: &dyn Store, date: Option<NaiveDate>) -> Result<Vec<TaskRecord>, TaskError> {
    let date = date.ok_or(ValidationError::MissingDate)?;
    let tasks = store.list_by_date(date)?;
    let tasks: Vec<TaskRecord> = tasks.into_iter().filter(|t| t.date == date).collect();
    debug!(%date, count = tasks.len(), "day loaded");
    Ok(sort_tasks(tasks))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// Create a task at the end of `current` (the day's tasks as last loaded).
pub fn add_task(
    store: &dyn Store,
    date: Option<NaiveDate>,
    title: &str,
    notes: &str,
    current: &[TaskRecord],
) -> Result<TaskRecord, TaskError> {
    let task = NewTask::new(title, notes, date, Some(next_priority(current)))?;
    Ok(store.create(task)?)
}

/// Flip completion, keeping `completedAt` in step.
pub fn toggle_completion(store: &dyn Store, task: &TaskRecord) -> Result<TaskRecord, TaskError> {
    Ok(store.update_by_id(&task.id, &task.toggle_patch(Utc::now()))?)
}

pub fn set_completed(store: &dyn Store, id: &str, completed: bool) -> Result<TaskRecord, TaskError> {
    Ok(store.update_by_id(id, &TaskPatch::completion(completed, Utc::now()))?)
}

pub fn edit_title(store: &dyn Store, id: &str, title: &str) -> Result<TaskRecord, TaskError> {
    let patch = TaskPatch::title(title)?;
    Ok(store.update_by_id(id, &patch)?)
}

/// Replace a task's notes. Over-long notes are rejected, not truncated.
pub fn set_notes(store: &dyn Store, id: &str, notes: &str) -> Result<TaskRecord, TaskError> {
    let patch = TaskPatch::notes(notes)?;
    Ok(store.update_by_id(id, &patch)?)
}

pub fn delete_task(store: &dyn Store, id: &str) -> Result<(), TaskError> {
    Ok(store.delete_by_id(id)?)
}

// ---------------------------------------------------------------------------
// Reorder persistence
// ---------------------------------------------------------------------------

/// Result of a drag-reorder.
#[derive(Debug)]
pub struct ReorderOutcome {
    /// The reindexed order, regardless of which writes succeeded
    pub tasks: Vec<TaskRecord>,
    /// Ids whose priority write failed, with the error
    pub failed: Vec<(String, StoreError)>,
    /// False when the gesture was ignored
    pub moved: bool,
}

impl ReorderOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Move `dragged_id` into `target_id`'s slot and write the new priorities.
///
/// An ignored gesture makes no store calls. Otherwise only tasks whose
/// priority changed are written, one at a time and without rollback. The
/// returned order is the fully reindexed one even if some writes failed.
pub fn reorder_and_persist(
    store: &dyn Store,
    tasks: &[TaskRecord],
    dragged_id: &str,
    target_id: &str,
) -> ReorderOutcome {
    let Some(reordered) = plan_reorder(tasks, dragged_id, target_id) else {
        debug!(dragged_id, target_id, "reorder ignored");
        return ReorderOutcome {
            tasks: tasks.to_vec(),
            failed: Vec::new(),
            moved: false,
        };
    };

    let mut failed = Vec::new();
    let mut written = 0usize;
    for task in &reordered {
        let before = tasks.iter().find(|t| t.id == task.id).and_then(|t| t.priority);
        let Some(priority) = task.priority else {
            continue;
        };
        if before == Some(priority) {
            continue;
        }
        match store.update_by_id(&task.id, &TaskPatch::priority(priority)) {
            Ok(_) => written += 1,
            Err(e) => {
                warn!(id = %task.id, priority, error = %e, "priority write failed");
                failed.push((task.id.clone(), e));
            }
        }
    }
    info!(
        dragged_id,
        target_id,
        written,
        failed = failed.len(),
        "tasks reordered"
    );

    ReorderOutcome {
        tasks: reordered,
        failed,
        moved: true,
    }
}
