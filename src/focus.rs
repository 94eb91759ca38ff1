//! Keeps the focus view's held task fresh.
//!
//! While a task is held, a background timer re-reads the task's day from the
//! store and reports over a channel that the UI drains each frame. Every
//! hand-off or stop bumps a generation counter; results tagged with an older
//! generation are dropped, so a fetch that finishes after teardown can never
//! overwrite the current snapshot.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::io::store::{SharedStore, StoreError};
use crate::model::task::TaskRecord;

/// One background fetch of the held task's day
#[derive(Debug)]
pub struct FocusRefresh {
    generation: u64,
    result: Result<Vec<TaskRecord>, StoreError>,
}

pub struct FocusSync {
    store: SharedStore,
    interval: Duration,
    generation: u64,
    tx: Sender<FocusRefresh>,
    rx: Receiver<FocusRefresh>,
    /// Dropping this sender stops the running timer
    timer: Option<Sender<()>>,
    held: Option<TaskRecord>,
}

impl FocusSync {
    pub fn new(store: SharedStore, interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        FocusSync {
            store,
            interval,
            generation: 0,
            tx,
            rx,
            timer: None,
            held: None,
        }
    }

    /// The task currently shown by the focus view.
    pub fn held(&self) -> Option<&TaskRecord> {
        self.held.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Start holding `task` and (re)start the timer.
    pub fn hand_off(&mut self, task: TaskRecord) {
        self.stop();
        debug!(id = %task.id, generation = self.generation, "focus hand-off");

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let store = self.store.clone();
        let tx = self.tx.clone();
        let interval = self.interval;
        let generation = self.generation;
        let date = task.date;
        thread::spawn(move || {
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {}
                    // Explicit stop or the owner went away
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
                let result = store.list_by_date(date);
                if tx.send(FocusRefresh { generation, result }).is_err() {
                    break;
                }
            }
        });

        self.timer = Some(stop_tx);
        self.held = Some(task);
    }

    /// Cancel the timer and release the held task. Any fetch still in flight
    /// is discarded when it arrives.
    pub fn stop(&mut self) {
        self.generation += 1;
        if self.timer.take().is_some() {
            debug!(generation = self.generation, "focus timer stopped");
        }
        self.held = None;
    }

    /// Apply background refreshes for the current generation. Returns true if
    /// the held snapshot changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(refresh) = self.rx.try_recv() {
            if refresh.generation != self.generation {
                continue;
            }
            match refresh.result {
                Ok(tasks) => {
                    if let Some(held) = self.held.as_mut() {
                        changed |= reconcile(held, &tasks);
                    }
                }
                Err(e) => warn!(error = %e, "focus refresh failed"),
            }
        }
        changed
    }

    /// Refresh immediately, on the caller's thread. Used after local edits.
    pub fn refresh_now(&mut self) -> Result<bool, StoreError> {
        let Some(held) = self.held.as_mut() else {
            return Ok(false);
        };
        let tasks = self.store.list_by_date(held.date)?;
        Ok(reconcile(held, &tasks))
    }
}

impl Drop for FocusSync {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Replace `held` with the record of the same id from `tasks`.
///
/// Looks the task up by id only; it never switches to a different task. A
/// miss (the task was deleted elsewhere) keeps the last snapshot.
pub fn reconcile(held: &mut TaskRecord, tasks: &[TaskRecord]) -> bool {
    match tasks.iter().find(|t| t.id == held.id) {
        Some(latest) if latest != held => {
            *held = latest.clone();
            true
        }
        _ => false,
    }
}
