use chrono::{DateTime, Utc};

use crate::model::task::TaskRecord;

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Sort a day's tasks into display order.
///
/// Tasks are ordered by priority, with creation order as the tie-break.
/// A task without a priority takes its creation-order position within the
/// day as its effective priority, so unprioritized tasks keep creation order
/// and the ordering stays total regardless of which records carry a value.
pub fn sort_tasks(tasks: Vec<TaskRecord>) -> Vec<TaskRecord> {
    let mut by_creation: Vec<usize> = (0..tasks.len()).collect();
    by_creation.sort_by(|&a, &b| creation_key(&tasks[a]).cmp(&creation_key(&tasks[b])));

    let mut creation_rank = vec![0i64; tasks.len()];
    for (rank, &idx) in by_creation.iter().enumerate() {
        creation_rank[idx] = rank as i64;
    }

    let mut keyed: Vec<(i64, TaskRecord)> = tasks
        .into_iter()
        .enumerate()
        .map(|(idx, task)| (task.priority.unwrap_or(creation_rank[idx]), task))
        .collect();
    keyed.sort_by(|(pa, a), (pb, b)| {
        pa.cmp(pb)
            .then_with(|| creation_key(a).cmp(&creation_key(b)))
    });
    keyed.into_iter().map(|(_, task)| task).collect()
}

fn creation_key(task: &TaskRecord) -> (DateTime<Utc>, &str) {
    (task.created_at, task.id.as_str())
}

/// The priority a newly created task should get so it lands after every
/// existing task of the day.
pub fn next_priority(tasks: &[TaskRecord]) -> i64 {
    let count = tasks.len() as i64;
    tasks
        .iter()
        .filter_map(|t| t.priority)
        .max()
        .map_or(count, |max| (max + 1).max(count))
}

// ---------------------------------------------------------------------------
// Reordering
// ---------------------------------------------------------------------------

/// Move `dragged_id` to the slot currently held by `target_id` and reindex.
///
/// Returns `None` when the gesture is ignored: the ids are equal or either one
/// is not in `tasks`. Otherwise the result has the dragged task at the
/// target's former index, every other task in its original relative order,
/// and priorities `0..N-1` matching position.
pub fn plan_reorder(
    tasks: &[TaskRecord],
    dragged_id: &str,
    target_id: &str,
) -> Option<Vec<TaskRecord>> {
    if dragged_id == target_id {
        return None;
    }
    let from = tasks.iter().position(|t| t.id == dragged_id)?;
    let to = tasks.iter().position(|t| t.id == target_id)?;

    let mut reordered = tasks.to_vec();
    let moved = reordered.remove(from);
    reordered.insert(to, moved);
    reindex(&mut reordered);
    Some(reordered)
}

/// Like [`plan_reorder`], but an ignored gesture returns `tasks` unchanged.
pub fn reorder(tasks: &[TaskRecord], dragged_id: &str, target_id: &str) -> Vec<TaskRecord> {
    plan_reorder(tasks, dragged_id, target_id).unwrap_or_else(|| tasks.to_vec())
}

/// Assign contiguous priorities matching list position.
pub fn reindex(tasks: &mut [TaskRecord]) {
    for (idx, task) in tasks.iter_mut().enumerate() {
        task.priority = Some(idx as i64);
    }
}

// ---------------------------------------------------------------------------
// Active task
// ---------------------------------------------------------------------------

/// The first incomplete task in display order.
pub fn select_active(tasks: &[TaskRecord]) -> Option<&TaskRecord> {
    tasks.iter().find(|t| !t.completed)
}

/// Whether the list can be handed off to the focus view.
pub fn can_minimize(tasks: &[TaskRecord]) -> bool {
    select_active(tasks).is_some()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
