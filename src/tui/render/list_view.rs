use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::task::TaskRecord;
use crate::ops::day_nav;
use crate::tui::app::App;
use crate::util::unicode::{display_width, truncate_to_width};
use crate::util::wrap::wrap_to_lines;

/// Columns before the title: cursor, checkbox, active marker
const GUTTER: usize = 9;

/// Rows above the task list: heading and rule
const HEADER_ROWS: usize = 2;

/// Render the day heading and the ordered task list
pub fn render_list_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let mut lines: Vec<Line> = Vec::new();

    lines.push(heading_line(app, width));
    lines.push(Line::from(Span::styled(
        "\u{2500}".repeat(width),
        Style::default().fg(app.theme.rule).bg(bg),
    )));

    if app.session.tasks().is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  No tasks for this day. Press a to add one.",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
        frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
        return;
    }

    let visible_rows = (area.height as usize).saturating_sub(HEADER_ROWS);
    adjust_scroll(app, visible_rows);

    let active_id = app.session.active().map(|t| t.id.clone());
    let dragging = app.session.dragging().map(str::to_string);
    for (idx, task) in app.session.tasks().iter().enumerate().skip(app.scroll_offset) {
        let row = TaskRow {
            selected: idx == app.cursor,
            active: active_id.as_deref() == Some(task.id.as_str()),
            dragging: dragging.as_deref() == Some(task.id.as_str()),
            expanded: app.expanded.contains(&task.id),
        };
        lines.extend(task_lines(app, task, &row, width));
        if lines.len() >= HEADER_ROWS + visible_rows {
            break;
        }
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

fn heading_line(app: &App, width: usize) -> Line<'static> {
    let bg = app.theme.background;
    let tasks = app.session.tasks();
    let done = tasks.iter().filter(|t| t.completed).count();
    let title = format!(" {}", day_nav::heading(app.session.date()));
    let counts = if tasks.is_empty() {
        String::new()
    } else {
        format!("{}/{} done ", done, tasks.len())
    };
    let pad = width.saturating_sub(display_width(&title) + display_width(&counts));
    Line::from(vec![
        Span::styled(
            title,
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ".repeat(pad), Style::default().bg(bg)),
        Span::styled(counts, Style::default().fg(app.theme.dim).bg(bg)),
    ])
}

struct TaskRow {
    selected: bool,
    active: bool,
    dragging: bool,
    expanded: bool,
}

fn row_height(expanded: bool) -> usize {
    if expanded { 4 } else { 1 }
}

/// Keep the cursor's task (and its notes) on screen.
fn adjust_scroll(app: &mut App, visible_rows: usize) {
    app.clamp_cursor();
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    }
    let heights: Vec<usize> = app
        .session
        .tasks()
        .iter()
        .map(|t| row_height(app.expanded.contains(&t.id)))
        .collect();
    while app.scroll_offset < app.cursor
        && heights[app.scroll_offset..=app.cursor].iter().sum::<usize>() > visible_rows
    {
        app.scroll_offset += 1;
    }
}

fn task_lines(app: &App, task: &TaskRecord, row: &TaskRow, width: usize) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let row_bg = if row.dragging {
        theme.drag_bg
    } else if row.selected {
        theme.selection_bg
    } else {
        theme.background
    };
    let base = Style::default().bg(row_bg);

    let cursor = if row.selected { " \u{25B8} " } else { "   " };
    let check = if task.completed { "[x]" } else { "[ ]" };
    let marker = if row.active { "\u{25CF} " } else { "  " };

    let title_style = if task.completed {
        base.fg(theme.dim).add_modifier(Modifier::CROSSED_OUT)
    } else if row.active {
        base.fg(theme.text_bright).add_modifier(Modifier::BOLD)
    } else {
        base.fg(theme.text)
    };

    let suffix = if row.dragging {
        "  (moving)"
    } else if !row.expanded && !task.notes.is_empty() {
        "  \u{00B6}"
    } else {
        ""
    };
    let title_room = width.saturating_sub(GUTTER + display_width(suffix));
    let title = truncate_to_width(&task.title, title_room);
    let used = GUTTER + display_width(&title) + display_width(suffix);

    let mut lines = vec![Line::from(vec![
        Span::styled(cursor, base.fg(theme.highlight)),
        Span::styled(
            check,
            base.fg(if task.completed { theme.done } else { theme.text }),
        ),
        Span::styled(" ", base),
        Span::styled(marker, base.fg(theme.highlight)),
        Span::styled(title, title_style),
        Span::styled(suffix, base.fg(theme.dim)),
        Span::styled(" ".repeat(width.saturating_sub(used)), base),
    ])];

    if row.expanded {
        let indent = " ".repeat(GUTTER);
        let note_room = width.saturating_sub(GUTTER);
        let wrapped = wrap_to_lines(&task.notes, app.config.wrap.list_width);
        let empty = wrapped.iter().all(String::is_empty);
        for (i, text) in wrapped.iter().enumerate() {
            let (text, style) = if empty && i == 0 {
                ("No notes yet".to_string(), Style::default().fg(theme.dim))
            } else {
                (
                    truncate_to_width(text, note_room),
                    Style::default().fg(theme.text),
                )
            };
            lines.push(Line::from(vec![
                Span::styled(indent.clone(), Style::default().bg(theme.background)),
                Span::styled(
                    text,
                    style
                        .bg(theme.background)
                        .add_modifier(Modifier::UNDERLINED),
                ),
            ]));
        }
    }
    lines
}
