use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};

use crate::io::store::{Store, StoreError, format_id};
use crate::model::task::{NewTask, TaskPatch, TaskRecord};

#[derive(Debug, Default)]
struct MemoryState {
    next_id: u64,
    tasks: Vec<TaskRecord>,
}

/// A process-local store. Used for tests and for running without a data
/// directory; it can also simulate outages and per-task write failures.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    unavailable: AtomicBool,
    failing_updates: Mutex<HashSet<String>>,
    writes: AtomicUsize,
    reads: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records (ids are kept as given).
    pub fn with_tasks(tasks: Vec<TaskRecord>) -> Self {
        let store = Self::default();
        {
            let mut state = store.lock_state();
            state.next_id = tasks.len() as u64;
            state.tasks = tasks;
        }
        store
    }

    /// Make every call fail with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make updates to `id` fail while leaving other calls working.
    pub fn fail_updates_for(&self, id: &str) {
        lock(&self.failing_updates).insert(id.to_string());
    }

    /// Number of successful or attempted create/update/delete calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of list calls.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Every stored record, in insertion order.
    pub fn all(&self) -> Vec<TaskRecord> {
        self.lock_state().tasks.clone()
    }

    fn lock_state(&self) -> MutexGuard<'_, MemoryState> {
        lock(&self.state)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".into()));
        }
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Store for MemoryStore {
    fn list_by_date(&self, date: NaiveDate) -> Result<Vec<TaskRecord>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self
            .lock_state()
            .tasks
            .iter()
            .filter(|t| t.date == date)
            .cloned()
            .collect())
    }

    fn create(&self, task: NewTask) -> Result<TaskRecord, StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        let mut state = self.lock_state();
        state.next_id += 1;
        let record = task.into_record(format_id(state.next_id), Utc::now());
        state.tasks.push(record.clone());
        Ok(record)
    }

    fn update_by_id(&self, id: &str, patch: &TaskPatch) -> Result<TaskRecord, StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        if lock(&self.failing_updates).contains(id) {
            return Err(StoreError::Unavailable(format!("write to {} rejected", id)));
        }
        let mut state = self.lock_state();
        let record = state
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if patch.apply(record) {
            record.updated_at = Some(Utc::now());
        }
        Ok(record.clone())
    }

    fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        let mut state = self.lock_state();
        let idx = state
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        state.tasks.remove(idx);
        Ok(())
    }
}
