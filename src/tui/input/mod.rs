mod calendar;
mod confirm;
mod edit;
mod focus;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::io::state::ViewMode;

use super::app::{App, Mode};

use calendar::handle_calendar;
use confirm::handle_confirm;
use edit::handle_edit;
use focus::handle_focus;
use navigate::handle_navigate;

pub use edit::begin_edit;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    let key = normalize_key(key);

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('q') {
        app.should_quit = true;
        return;
    }

    // Help overlay intercepts everything until closed
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return;
    }

    if app.session.mode() == ViewMode::Focus {
        handle_focus(app, key);
        return;
    }

    match &app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Edit(_) => handle_edit(app, key),
        Mode::ConfirmDelete(_) => handle_confirm(app, key),
        Mode::Calendar => handle_calendar(app, key),
    }
}

/// Normalize key events from terminals using the kitty keyboard protocol,
/// which sends `Char(lowercase) + SHIFT` instead of `Char(UPPERCASE)`.
fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
    {
        if c.is_ascii_lowercase() {
            key.code = KeyCode::Char(c.to_ascii_uppercase());
        } else if c == '/' {
            key.code = KeyCode::Char('?');
            key.modifiers.remove(KeyModifiers::SHIFT);
        }
    }
    key
}
