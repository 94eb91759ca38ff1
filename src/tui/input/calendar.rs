use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::day_nav::{self, CalendarState};
use crate::tui::app::{App, Mode};

pub(super) fn handle_calendar(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.mode = Mode::Navigate,
        KeyCode::Left | KeyCode::Char('h') => app.calendar.move_days(-1),
        KeyCode::Right | KeyCode::Char('l') => app.calendar.move_days(1),
        KeyCode::Up | KeyCode::Char('k') => app.calendar.move_days(-7),
        KeyCode::Down | KeyCode::Char('j') => app.calendar.move_days(7),
        KeyCode::PageUp | KeyCode::Char('[') => app.calendar.page(-1),
        KeyCode::PageDown | KeyCode::Char(']') => app.calendar.page(1),
        KeyCode::Char('t') => {
            let today = day_nav::today();
            app.calendar = CalendarState::open(today, today);
        }
        KeyCode::Enter => {
            let result = app.session.go_to(app.calendar.cursor);
            if app.report(result) {
                app.mode = Mode::Navigate;
                app.cursor = 0;
                app.scroll_offset = 0;
            }
        }
        _ => {}
    }
}
