use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, EditTarget, Mode};
use crate::util::unicode::{display_width, truncate_to_width};

/// Shown in place of a newline inside the one-row editor
const NEWLINE_GLYPH: &str = "\u{21B5}";
const CURSOR_GLYPH: &str = "\u{258C}";

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let line = match &app.mode {
        Mode::Edit(target) => edit_line(app, target, width),
        Mode::ConfirmDelete(id) => {
            let title = app.session.task(id).map_or(id.as_str(), |t| t.title.as_str());
            let prompt = format!("Delete '{}'? y/n", title);
            Line::from(Span::styled(
                truncate_to_width(&prompt, width),
                Style::default().fg(app.theme.red).bg(bg),
            ))
        }
        _ => {
            if let Some(status) = &app.status {
                let fg = if status.is_error {
                    app.theme.red
                } else {
                    app.theme.text
                };
                Line::from(Span::styled(
                    truncate_to_width(&status.text, width),
                    Style::default().fg(fg).bg(bg),
                ))
            } else if let Some(id) = app.session.dragging() {
                let title = app.session.task(id).map_or(id, |t| t.title.as_str());
                with_hint(
                    app,
                    vec![Span::styled(
                        format!("Moving '{}'", title),
                        Style::default().fg(app.theme.highlight).bg(bg),
                    )],
                    "j/k target  m drop  Esc cancel",
                    width,
                )
            } else {
                // Empty in navigate mode (clean, like vim normal mode)
                Line::from("")
            }
        }
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn edit_line(app: &App, target: &EditTarget, width: usize) -> Line<'static> {
    let bg = app.theme.background;
    let prompt = match target {
        EditTarget::NewTask => "New task: ".to_string(),
        EditTarget::Title(_) => "Title: ".to_string(),
        EditTarget::Notes(_) => format!(
            "Notes ({}/{}): ",
            app.field.char_count(),
            app.field.max_chars().unwrap_or_default()
        ),
    };
    let text = app.field.text();
    let (before, after) = text.split_at(app.field.cursor());
    let mut before = before.replace('\n', NEWLINE_GLYPH);
    let after = after.replace('\n', NEWLINE_GLYPH);

    let (hint, hint_style) = match &app.status {
        Some(status) if status.is_error => (status.text.clone(), app.theme.red),
        _ => ("Enter save  Esc cancel".to_string(), app.theme.dim),
    };

    // Scroll so the cursor stays visible
    let room = width
        .saturating_sub(display_width(&prompt) + display_width(CURSOR_GLYPH))
        .max(1);
    while display_width(&before) > room {
        before.remove(0);
    }
    let after = truncate_to_width(&after, room - display_width(&before));

    let spans = vec![
        Span::styled(prompt, Style::default().fg(app.theme.dim).bg(bg)),
        Span::styled(before, Style::default().fg(app.theme.text_bright).bg(bg)),
        Span::styled(
            CURSOR_GLYPH,
            Style::default().fg(app.theme.highlight).bg(bg),
        ),
        Span::styled(after, Style::default().fg(app.theme.text_bright).bg(bg)),
    ];
    with_hint_styled(bg, spans, &hint, hint_style, width)
}

fn with_hint(app: &App, spans: Vec<Span<'static>>, hint: &str, width: usize) -> Line<'static> {
    with_hint_styled(app.theme.background, spans, hint, app.theme.dim, width)
}

/// Right-align `hint` after `spans` when there is room for it
fn with_hint_styled(
    bg: Color,
    mut spans: Vec<Span<'static>>,
    hint: &str,
    hint_fg: Color,
    width: usize,
) -> Line<'static> {
    let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let hint_width = display_width(hint);
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(
            hint.to_string(),
            Style::default().fg(hint_fg).bg(bg),
        ));
    }
    Line::from(spans)
}
