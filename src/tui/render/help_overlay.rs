use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::io::state::ViewMode;
use crate::tui::app::App;

const KEY_WIDTH: usize = 14;

const LIST_KEYS: &[(&str, &str)] = &[
    (" \u{2191}\u{2193}/jk", "Move cursor"),
    (" g/G", "Jump to top/bottom"),
    (" \u{2190}\u{2192}/hl", "Previous/next day"),
    (" t", "Today"),
    (" c", "Calendar"),
    (" a", "Add task"),
    (" e", "Edit title"),
    (" n", "Edit notes"),
    (" space/x", "Toggle done"),
    (" d", "Delete"),
    (" Enter", "Show/hide notes"),
    (" m", "Move task (m again to drop)"),
    (" f", "Focus on active task"),
    (" r", "Reload"),
];

const FOCUS_KEYS: &[(&str, &str)] = &[
    (" space/x", "Toggle done"),
    (" Enter/f", "Back to the full list"),
];

const GLOBAL_KEYS: &[(&str, &str)] = &[
    (" ?", "Toggle this help"),
    (" q", "Quit"),
    (" Ctrl+Q", "Quit (immediate)"),
];

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let (title, keys) = match app.session.mode() {
        ViewMode::List => (" Task List", LIST_KEYS),
        ViewMode::Focus => (" Focus", FOCUS_KEYS),
    };

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(" Key Bindings", header_style)),
        Line::from(""),
        Line::from(Span::styled(title, header_style)),
    ];
    add_bindings(&mut lines, keys, key_style, desc_style);
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" Global", header_style)));
    add_bindings(&mut lines, GLOBAL_KEYS, key_style, desc_style);

    let overlay_area = super::centered_rect(46, lines.len() as u16 + 2, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, overlay_area);
}

fn add_bindings(
    lines: &mut Vec<Line<'static>>,
    bindings: &[(&'static str, &'static str)],
    key_style: Style,
    desc_style: Style,
) {
    for (key, desc) in bindings {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<width$}", key, width = KEY_WIDTH), key_style),
            Span::styled(*desc, desc_style),
        ]));
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use crate::tui::app::tests::scenario_app;
    use crate::tui::input::tests::press;
    use crate::tui::render::test_helpers::render_app;

    #[test]
    fn list_help() {
        let (_store, mut app) = scenario_app();
        press(&mut app, KeyCode::Char('?'));
        let out = render_app(&mut app, 80, 30);
        assert!(out.contains("Key Bindings"));
        assert!(out.contains("Previous/next day"));
        assert!(!out.contains("Back to the full list"));
    }

    #[test]
    fn focus_help() {
        let (_store, mut app) = scenario_app();
        press(&mut app, KeyCode::Char('f'));
        press(&mut app, KeyCode::Char('?'));
        let out = render_app(&mut app, 80, 30);
        assert!(out.contains("Back to the full list"));
        assert!(!out.contains("Previous/next day"));

        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
    }
}
