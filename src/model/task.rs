use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Hard cap on notes length, counted in characters.
pub const NOTES_MAX_CHARS: usize = 1000;

/// Input rejected before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("title is required")]
    MissingTitle,
    #[error("date is required")]
    MissingDate,
    #[error("notes are limited to {NOTES_MAX_CHARS} characters (got {0})")]
    NotesTooLong(usize),
}

/// A single task belonging to one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    /// Store-assigned id, e.g. `T-0007`
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub notes: String,
    /// The day this task belongs to
    pub date: NaiveDate,
    #[serde(default)]
    pub completed: bool,
    /// Non-null exactly when `completed` is true
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Manual order within the day (lower sorts first)
    #[serde(default)]
    pub priority: Option<i64>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TaskRecord {
    /// The patch that flips this task's completion state.
    pub fn toggle_patch(&self, now: DateTime<Utc>) -> TaskPatch {
        TaskPatch::completion(!self.completed, now)
    }
}

/// Fields for a task that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub notes: String,
    pub date: NaiveDate,
    pub priority: Option<i64>,
}

impl NewTask {
    /// Validate and normalize raw input. Title is trimmed and must be non-empty,
    /// date must be present, notes must fit the cap.
    pub fn new(
        title: &str,
        notes: &str,
        date: Option<NaiveDate>,
        priority: Option<i64>,
    ) -> Result<Self, ValidationError> {
        let title = normalize_title(title)?;
        let date = date.ok_or(ValidationError::MissingDate)?;
        check_notes(notes)?;
        Ok(NewTask {
            title,
            notes: notes.to_string(),
            date,
            priority,
        })
    }

    /// Materialize a stored record with the given id and creation time.
    pub fn into_record(self, id: String, now: DateTime<Utc>) -> TaskRecord {
        TaskRecord {
            id,
            title: self.title,
            notes: self.notes,
            date: self.date,
            completed: false,
            completed_at: None,
            priority: self.priority,
            created_at: now,
            updated_at: None,
        }
    }
}

/// A partial update merged onto a stored record.
///
/// `completed_at` is tri-state: `None` leaves it alone, `Some(None)` clears it,
/// `Some(Some(t))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub notes: Option<String>,
    pub completed: Option<bool>,
    pub completed_at: Option<Option<DateTime<Utc>>>,
    pub priority: Option<i64>,
}

impl TaskPatch {
    /// Set completion and keep `completed_at` in lockstep with it.
    pub fn completion(completed: bool, now: DateTime<Utc>) -> Self {
        TaskPatch {
            completed: Some(completed),
            completed_at: Some(completed.then_some(now)),
            ..Default::default()
        }
    }

    pub fn title(title: &str) -> Result<Self, ValidationError> {
        Ok(TaskPatch {
            title: Some(normalize_title(title)?),
            ..Default::default()
        })
    }

    pub fn notes(notes: &str) -> Result<Self, ValidationError> {
        check_notes(notes)?;
        Ok(TaskPatch {
            notes: Some(notes.to_string()),
            ..Default::default()
        })
    }

    pub fn priority(priority: i64) -> Self {
        TaskPatch {
            priority: Some(priority),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }

    /// Merge this patch onto `record`. Returns true if anything changed.
    pub fn apply(&self, record: &mut TaskRecord) -> bool {
        let before = record.clone();
        if let Some(title) = &self.title {
            record.title = title.clone();
        }
        if let Some(notes) = &self.notes {
            record.notes = notes.clone();
        }
        // A completion patch that matches the current state keeps the
        // original timestamp
        let completion_changes = self.completed.is_none_or(|c| c != record.completed);
        if let Some(completed) = self.completed {
            record.completed = completed;
        }
        if completion_changes && let Some(completed_at) = self.completed_at {
            record.completed_at = completed_at;
        }
        if let Some(priority) = self.priority {
            record.priority = Some(priority);
        }
        *record != before
    }
}

/// Trim a title and reject it if nothing is left.
pub fn normalize_title(title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    Ok(trimmed.to_string())
}

/// Reject notes over the character cap.
pub fn check_notes(notes: &str) -> Result<(), ValidationError> {
    let len = notes.chars().count();
    if len > NOTES_MAX_CHARS {
        return Err(ValidationError::NotesTooLong(len));
    }
    Ok(())
}
