use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

use crate::model::task::TaskRecord;
use crate::ops::day_nav::{self, MonthRef, month_grid};
use crate::util::wrap::{NOTE_LINES, wrap_to_lines};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
    pub date: NaiveDate,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub priority: Option<i64>,
    pub active: bool,
}

#[derive(Serialize)]
pub struct DayJson {
    pub date: NaiveDate,
    pub active: Option<String>,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct ActiveJson {
    pub date: NaiveDate,
    pub task: Option<TaskJson>,
    /// Notes wrapped for the focus card
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<[String; NOTE_LINES]>,
}

#[derive(Serialize)]
pub struct MoveJson {
    pub moved: bool,
    pub tasks: Vec<TaskJson>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<String>,
}

#[derive(Serialize)]
pub struct MonthJson {
    pub month: String,
    pub weeks: Vec<[Option<u32>; 7]>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &TaskRecord, active: bool) -> TaskJson {
    TaskJson {
        id: task.id.clone(),
        title: task.title.clone(),
        notes: task.notes.clone(),
        date: task.date,
        completed: task.completed,
        completed_at: task.completed_at,
        priority: task.priority,
        active,
    }
}

/// JSON for an ordered day, flagging the active task.
pub fn day_to_json(date: NaiveDate, tasks: &[TaskRecord], active: Option<&TaskRecord>) -> DayJson {
    let active_id = active.map(|t| t.id.clone());
    DayJson {
        date,
        tasks: tasks
            .iter()
            .map(|t| task_to_json(t, active_id.as_deref() == Some(t.id.as_str())))
            .collect(),
        active: active_id,
    }
}

pub fn month_to_json(month: MonthRef) -> MonthJson {
    MonthJson {
        month: format!("{:04}-{:02}", month.year(), month.month()),
        weeks: month_grid(month)
            .into_iter()
            .map(|week| week.map(|cell| cell.map(|d| d.day())))
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Format a single task as a one-line summary
pub fn format_task_line(task: &TaskRecord, active: bool) -> String {
    let marker = if active { "\u{25CF}" } else { " " };
    let check = if task.completed { 'x' } else { ' ' };
    format!("{} [{}] {} {}", marker, check, task.id, task.title)
}

/// Format a day listing: heading, then one line per task in display order
pub fn format_day(
    date: NaiveDate,
    tasks: &[TaskRecord],
    active: Option<&TaskRecord>,
    notes_width: Option<usize>,
) -> Vec<String> {
    let mut lines = vec![day_nav::heading(date)];
    if tasks.is_empty() {
        lines.push("  (no tasks)".to_string());
        return lines;
    }
    for task in tasks {
        let is_active = active.is_some_and(|a| a.id == task.id);
        lines.push(format_task_line(task, is_active));
        if let Some(width) = notes_width
            && !task.notes.is_empty()
        {
            lines.extend(format_note_lines(&task.notes, width));
        }
    }
    lines
}

/// Notes wrapped to the three display lines, indented under the title.
/// Trailing empty lines are left out.
pub fn format_note_lines(notes: &str, width: usize) -> Vec<String> {
    let wrapped = wrap_to_lines(notes, width);
    let used = wrapped
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    wrapped[..used]
        .iter()
        .map(|l| format!("      {}", l))
        .collect()
}

/// Format a month like `cal(1)`: centered label, weekday header, week rows
pub fn format_month(month: MonthRef) -> Vec<String> {
    let mut lines = vec![
        format!("{:^20}", month.label()).trim_end().to_string(),
        "Su Mo Tu We Th Fr Sa".to_string(),
    ];
    for week in month_grid(month) {
        let row = week
            .iter()
            .map(|cell| match cell {
                Some(d) => format!("{:>2}", d.day()),
                None => "  ".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(row.trim_end().to_string());
    }
    lines
}
