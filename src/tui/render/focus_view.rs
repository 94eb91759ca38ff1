use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::tui::app::App;
use crate::util::unicode::{display_width, truncate_to_width};
use crate::util::wrap::{NOTE_LINES, wrap_to_lines};

use super::centered_rect;

const HINT: &str = "Enter: full view  space: done";

/// Render the compact card for the held task
pub fn render_focus_view(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let bg = theme.background;
    frame.render_widget(Block::default().style(Style::default().bg(bg)), area);

    let Some(task) = app.session.focus_task() else {
        let msg = Paragraph::new(Span::styled(
            " Nothing to focus on",
            Style::default().fg(theme.dim).bg(bg),
        ));
        frame.render_widget(msg, area);
        return;
    };

    let inner_width = app.config.wrap.focus_width.max(display_width(HINT));
    // border + one column of padding on each side
    let card_width = (inner_width + 4) as u16;
    // title, gap, note lines, gap, hint
    let card_height = (NOTE_LINES + 4 + 2) as u16;
    let card = centered_rect(card_width, card_height, area);
    frame.render_widget(Clear, card);

    let room = (card.width as usize).saturating_sub(4);
    let paper = Style::default().bg(theme.paper);

    let check = if task.completed { "[x] " } else { "[ ] " };
    let title_style = if task.completed {
        paper.fg(theme.dim).add_modifier(Modifier::CROSSED_OUT)
    } else {
        paper.fg(theme.text_bright).add_modifier(Modifier::BOLD)
    };
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                check,
                paper.fg(if task.completed { theme.done } else { theme.text }),
            ),
            Span::styled(
                truncate_to_width(&task.title, room.saturating_sub(display_width(check))),
                title_style,
            ),
        ]),
        Line::from(""),
    ];

    let wrapped = wrap_to_lines(&task.notes, app.config.wrap.focus_width);
    let empty = wrapped.iter().all(String::is_empty);
    for (i, text) in wrapped.iter().enumerate() {
        let (text, style) = if empty && i == 0 {
            ("No notes yet".to_string(), paper.fg(theme.dim))
        } else {
            (truncate_to_width(text, room), paper.fg(theme.text))
        };
        let pad = room.saturating_sub(display_width(&text));
        lines.push(Line::from(vec![
            Span::styled(text, style.add_modifier(Modifier::UNDERLINED)),
            Span::styled(
                " ".repeat(pad),
                paper.fg(theme.rule).add_modifier(Modifier::UNDERLINED),
            ),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        truncate_to_width(HINT, room),
        paper.fg(theme.dim),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(paper.fg(theme.rule))
        .padding(Padding::horizontal(1))
        .style(paper);
    frame.render_widget(Paragraph::new(lines).block(block).style(paper), card);
}
