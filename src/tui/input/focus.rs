use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::App;

/// Keys while the focus view holds a task.
pub(super) fn handle_focus(app: &mut App, key: KeyEvent) {
    app.status = None;
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char(' ') | KeyCode::Char('x') => {
            if let Some(id) = app.session.focus_task().map(|t| t.id.clone()) {
                let result = app.session.toggle(&id);
                app.report(result);
            }
        }
        // Back to the full list
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char('f') => {
            let held = app.session.focus_task().map(|t| t.id.clone());
            let result = app.session.maximize();
            if app.report(result)
                && let Some(id) = held
            {
                app.cursor_to(&id);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use crate::io::state::ViewMode;
    use crate::tui::app::tests::scenario_app;
    use crate::tui::input::tests::press;

    #[test]
    fn focus_round_trip() {
        let (_store, mut app) = scenario_app();
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.session.mode(), ViewMode::Focus);
        // the active task is held, not the one under the cursor
        assert_eq!(app.session.focus_task().map(|t| t.id.as_str()), Some("A"));

        press(&mut app, KeyCode::Char(' '));
        let held = app.session.focus_task().unwrap();
        assert!(held.completed);
        assert_eq!(held.id, "A");

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.mode(), ViewMode::List);
        assert_eq!(app.selected_id().as_deref(), Some("A"));
    }

    #[test]
    fn list_keys_are_inert_in_focus() {
        let (store, mut app) = scenario_app();
        press(&mut app, KeyCode::Char('f'));
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(store.write_count(), 0);
        assert_eq!(app.session.mode(), ViewMode::Focus);
    }
}
