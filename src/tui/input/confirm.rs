use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};

pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    let Mode::ConfirmDelete(id) = app.mode.clone() else {
        return;
    };
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('y')) => {
            app.mode = Mode::Navigate;
            let result = app.session.delete(&id);
            if app.report(result) {
                app.expanded.remove(&id);
                app.clamp_cursor();
            }
        }
        // Cancel: n or Esc
        (KeyModifiers::NONE, KeyCode::Char('n')) | (_, KeyCode::Esc) => {
            app.mode = Mode::Navigate;
        }
        _ => {}
    }
}
