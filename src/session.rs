use std::time::Duration;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::focus::FocusSync;
use crate::io::state::ViewMode;
use crate::io::store::SharedStore;
use crate::model::task::TaskRecord;
use crate::ops::day_nav;
use crate::ops::order::{can_minimize, select_active};
use crate::ops::task_ops::{self, ReorderOutcome, TaskError};

/// UI state for one open day: the date cursor, the ordered tasks, the
/// current surface, a pending drag and the focus sync loop.
///
/// Every mutation goes to the store first; local state is only replaced
/// once the store confirms, by reloading the day. The one exception is a
/// reorder, whose intended order is kept even if some writes failed.
pub struct Session {
    store: SharedStore,
    date: NaiveDate,
    tasks: Vec<TaskRecord>,
    mode: ViewMode,
    drag: Option<String>,
    focus: FocusSync,
}

impl Session {
    /// Open `date` and load its tasks.
    pub fn open(
        store: SharedStore,
        date: NaiveDate,
        poll_interval: Duration,
    ) -> Result<Self, TaskError> {
        let tasks = task_ops::load_day(store.as_ref(), Some(date))?;
        let focus = FocusSync::new(store.clone(), poll_interval);
        Ok(Session {
            store,
            date,
            tasks,
            mode: ViewMode::List,
            drag: None,
            focus,
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    pub fn task(&self, id: &str) -> Option<&TaskRecord> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn active(&self) -> Option<&TaskRecord> {
        select_active(&self.tasks)
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// The task held by the focus view, if it is showing.
    pub fn focus_task(&self) -> Option<&TaskRecord> {
        self.focus.held()
    }

    pub fn dragging(&self) -> Option<&str> {
        self.drag.as_deref()
    }

    pub fn can_minimize(&self) -> bool {
        can_minimize(&self.tasks)
    }

    // -----------------------------------------------------------------------
    // Loading and day navigation
    // -----------------------------------------------------------------------

    /// Re-read the current day. On failure the previous list is kept.
    pub fn reload(&mut self) -> Result<(), TaskError> {
        self.tasks = task_ops::load_day(self.store.as_ref(), Some(self.date))?;
        Ok(())
    }

    /// Switch to another day. On failure the session stays on the old day.
    pub fn go_to(&mut self, date: NaiveDate) -> Result<(), TaskError> {
        let tasks = task_ops::load_day(self.store.as_ref(), Some(date))?;
        self.date = date;
        self.tasks = tasks;
        self.drag = None;
        Ok(())
    }

    pub fn previous_day(&mut self) -> Result<(), TaskError> {
        self.go_to(day_nav::previous_day(self.date))
    }

    pub fn next_day(&mut self) -> Result<(), TaskError> {
        self.go_to(day_nav::next_day(self.date))
    }

    pub fn go_today(&mut self) -> Result<(), TaskError> {
        self.go_to(day_nav::today())
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    pub fn add(&mut self, title: &str, notes: &str) -> Result<TaskRecord, TaskError> {
        let created =
            task_ops::add_task(self.store.as_ref(), Some(self.date), title, notes, &self.tasks)?;
        self.after_mutation()?;
        Ok(created)
    }

    /// Toggle completion of a task in the list, or of the held focus task.
    pub fn toggle(&mut self, id: &str) -> Result<(), TaskError> {
        let task = self
            .task(id)
            .or_else(|| self.focus.held().filter(|t| t.id == id))
            .cloned()
            .ok_or_else(|| TaskError::NotFound(id.to_string()))?;
        task_ops::toggle_completion(self.store.as_ref(), &task)?;
        self.after_mutation()
    }

    pub fn edit_title(&mut self, id: &str, title: &str) -> Result<(), TaskError> {
        task_ops::edit_title(self.store.as_ref(), id, title)?;
        self.after_mutation()
    }

    pub fn set_notes(&mut self, id: &str, notes: &str) -> Result<(), TaskError> {
        task_ops::set_notes(self.store.as_ref(), id, notes)?;
        self.after_mutation()
    }

    pub fn delete(&mut self, id: &str) -> Result<(), TaskError> {
        task_ops::delete_task(self.store.as_ref(), id)?;
        if self.drag.as_deref() == Some(id) {
            self.drag = None;
        }
        self.after_mutation()
    }

    fn after_mutation(&mut self) -> Result<(), TaskError> {
        if let Err(e) = self.focus.refresh_now() {
            warn!(error = %e, "focus refresh after edit failed");
        }
        self.reload()
    }

    // -----------------------------------------------------------------------
    // Drag and drop
    // -----------------------------------------------------------------------

    /// Pick up a task. Ignored if the id is not in the list.
    pub fn grab(&mut self, id: &str) {
        if self.task(id).is_some() {
            self.drag = Some(id.to_string());
        }
    }

    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    /// Drop the grabbed task onto `target_id`. Without a grabbed task this is
    /// an ignored gesture.
    pub fn drop_on(&mut self, target_id: &str) -> ReorderOutcome {
        let dragged = self.drag.take().unwrap_or_default();
        self.reorder(&dragged, target_id)
    }

    /// Move `dragged_id` into `target_id`'s slot. The local order becomes the
    /// reindexed order whatever the outcome of the individual writes.
    pub fn reorder(&mut self, dragged_id: &str, target_id: &str) -> ReorderOutcome {
        let outcome =
            task_ops::reorder_and_persist(self.store.as_ref(), &self.tasks, dragged_id, target_id);
        if outcome.moved {
            self.tasks = outcome.tasks.clone();
            if let Err(e) = self.focus.refresh_now() {
                warn!(error = %e, "focus refresh after reorder failed");
            }
        }
        outcome
    }

    // -----------------------------------------------------------------------
    // List and focus surfaces
    // -----------------------------------------------------------------------

    /// Hand the active task to the focus view. Returns false, changing
    /// nothing, when there is no active task.
    pub fn minimize(&mut self) -> bool {
        let Some(active) = self.active().cloned() else {
            return false;
        };
        info!(id = %active.id, "focus view opened");
        self.focus.hand_off(active);
        self.mode = ViewMode::Focus;
        self.drag = None;
        true
    }

    /// Return to the list view, stopping the focus timer.
    pub fn maximize(&mut self) -> Result<(), TaskError> {
        self.focus.stop();
        self.mode = ViewMode::List;
        self.reload()
    }

    /// Re-enter the focus view holding `id`, if that task is in the loaded
    /// day. Used to restore the last session.
    pub fn resume_focus(&mut self, id: &str) -> bool {
        let Some(task) = self.task(id).cloned() else {
            return false;
        };
        self.focus.hand_off(task);
        self.mode = ViewMode::Focus;
        true
    }

    /// Apply pending background refreshes. Returns true if the focus view
    /// needs a redraw.
    pub fn poll(&mut self) -> bool {
        self.focus.poll()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::io::memory_store::MemoryStore;
    use crate::io::store::{Store, StoreError};
    use crate::model::task::TaskPatch;
    use crate::ops::order::tests::task;
    use pretty_assertions::assert_eq;

    fn jan(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn ids(session: &Session) -> Vec<&str> {
        session.tasks().iter().map(|t| t.id.as_str()).collect()
    }

    fn open(store: &Arc<MemoryStore>) -> Session {
        let shared: SharedStore = store.clone();
        Session::open(shared, jan(10), Duration::from_secs(60)).unwrap()
    }

    fn scenario() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::with_tasks(vec![
            task("A", 0, Some(0), false),
            task("B", 1, Some(1), false),
            task("C", 2, Some(2), true),
        ]))
    }

    #[test]
    fn opens_on_day_in_order() {
        let store = scenario();
        let session = open(&store);
        assert_eq!(ids(&session), vec!["A", "B", "C"]);
        assert_eq!(session.active().map(|t| t.id.as_str()), Some("A"));
        assert_eq!(session.mode(), ViewMode::List);
    }

    #[test]
    fn drag_and_drop_reorders() {
        let store = scenario();
        let mut session = open(&store);
        session.grab("C");
        assert_eq!(session.dragging(), Some("C"));

        let outcome = session.drop_on("A");
        assert!(outcome.moved);
        assert_eq!(session.dragging(), None);
        assert_eq!(ids(&session), vec!["C", "A", "B"]);
        assert_eq!(session.active().map(|t| t.id.as_str()), Some("A"));
    }

    #[test]
    fn drop_without_grab_is_ignored() {
        let store = scenario();
        let mut session = open(&store);
        session.grab("missing");
        let outcome = session.drop_on("A");
        assert!(!outcome.moved);
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn partial_reorder_keeps_intended_order() {
        let store = scenario();
        store.fail_updates_for("A");
        let mut session = open(&store);
        let outcome = session.reorder("C", "A");
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(ids(&session), vec!["C", "A", "B"]);
    }

    #[test]
    fn failed_mutation_leaves_list_untouched() {
        let store = scenario();
        let mut session = open(&store);
        let before = session.tasks().to_vec();
        store.set_unavailable(true);
        assert!(matches!(
            session.add("New", ""),
            Err(TaskError::Store(StoreError::Unavailable(_)))
        ));
        assert_eq!(session.tasks(), before.as_slice());
    }

    #[test]
    fn add_and_toggle_reload_the_day() {
        let store = scenario();
        let mut session = open(&store);
        let created = session.add("D", "").unwrap();
        assert_eq!(session.tasks().last().map(|t| &t.id), Some(&created.id));

        session.toggle("A").unwrap();
        assert_eq!(session.active().map(|t| t.id.as_str()), Some("B"));
        assert!(matches!(session.toggle("nope"), Err(TaskError::NotFound(_))));
    }

    #[test]
    fn navigation_failure_keeps_current_day() {
        let store = scenario();
        let mut session = open(&store);
        store.set_unavailable(true);
        assert!(session.next_day().is_err());
        assert_eq!(session.date(), jan(10));

        store.set_unavailable(false);
        session.next_day().unwrap();
        assert_eq!(session.date(), jan(11));
        assert!(session.tasks().is_empty());
        session.previous_day().unwrap();
        assert_eq!(ids(&session), vec!["A", "B", "C"]);
    }

    #[test]
    fn minimize_is_gated_on_active_task() {
        let store = Arc::new(MemoryStore::with_tasks(vec![task("A", 0, Some(0), true)]));
        let mut session = open(&store);
        assert!(!session.can_minimize());
        assert!(!session.minimize());
        assert_eq!(session.mode(), ViewMode::List);
        assert!(session.focus_task().is_none());
    }

    #[test]
    fn focus_holds_task_until_maximized() {
        let store = scenario();
        let mut session = open(&store);
        assert!(session.minimize());
        assert_eq!(session.mode(), ViewMode::Focus);

        // completing the held task keeps it in focus
        session.toggle("A").unwrap();
        let held = session.focus_task().unwrap();
        assert_eq!(held.id, "A");
        assert!(held.completed);

        session.maximize().unwrap();
        assert_eq!(session.mode(), ViewMode::List);
        assert!(session.focus_task().is_none());

        assert!(session.minimize());
        assert_eq!(session.focus_task().map(|t| t.id.as_str()), Some("B"));
    }

    #[test]
    fn local_edit_refreshes_focus_snapshot() {
        let store = scenario();
        let mut session = open(&store);
        session.minimize();
        session.set_notes("A", "call before noon").unwrap();
        assert_eq!(
            session.focus_task().map(|t| t.notes.as_str()),
            Some("call before noon")
        );

        // a remote delete keeps the last snapshot
        store.delete_by_id("A").unwrap();
        session.edit_title("B", "Other").unwrap();
        assert_eq!(session.focus_task().map(|t| t.id.as_str()), Some("A"));
    }

    #[test]
    fn resume_focus_requires_task_in_day() {
        let store = scenario();
        let mut session = open(&store);
        assert!(!session.resume_focus("Z"));
        assert!(session.resume_focus("B"));
        assert_eq!(session.focus_task().map(|t| t.id.as_str()), Some("B"));

        store
            .update_by_id("B", &TaskPatch::title("Renamed").unwrap())
            .unwrap();
        session.reload().unwrap();
        assert_eq!(session.task("B").map(|t| t.title.as_str()), Some("Renamed"));
    }
}
