pub mod calendar;
pub mod focus_view;
pub mod help_overlay;
pub mod list_view;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::Block;

use crate::io::state::ViewMode;
use crate::tui::app::{App, Mode};

/// Main render function; dispatches to the list or focus surface and any
/// overlay on top.
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    match app.session.mode() {
        ViewMode::Focus => focus_view::render_focus_view(frame, app, chunks[0]),
        ViewMode::List => list_view::render_list_view(frame, app, chunks[0]),
    }

    if app.mode == Mode::Calendar && app.session.mode() == ViewMode::List {
        calendar::render_calendar(frame, app, area);
    }

    // Help overlay (rendered on top of everything)
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, area);
    }

    status_row::render_status_row(frame, app, chunks[1]);
}

/// Create a centered rectangle of at most `width` x `height` inside `area`
pub(super) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
