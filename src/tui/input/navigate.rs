use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::day_nav::{self, CalendarState};
use crate::tui::app::{App, EditTarget, Mode};

use super::begin_edit;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    app.status = None;
    let dragging = app.session.dragging().is_some();

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,

        // Cursor
        KeyCode::Up | KeyCode::Char('k') => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.cursor += 1;
            app.clamp_cursor();
        }
        KeyCode::Char('g') | KeyCode::Home => app.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => {
            app.cursor = usize::MAX;
            app.clamp_cursor();
        }

        // Drag and drop
        KeyCode::Char('m') if !dragging => {
            if let Some(id) = app.selected_id() {
                app.session.grab(&id);
            }
        }
        KeyCode::Char('m') | KeyCode::Enter if dragging => drop_on_cursor(app),
        KeyCode::Esc if dragging => app.session.cancel_drag(),

        // Day navigation
        KeyCode::Left | KeyCode::Char('h') => {
            let result = app.session.previous_day();
            after_day_change(app, result);
        }
        KeyCode::Right | KeyCode::Char('l') => {
            let result = app.session.next_day();
            after_day_change(app, result);
        }
        KeyCode::Char('t') => {
            let result = app.session.go_today();
            after_day_change(app, result);
        }
        KeyCode::Char('c') => {
            app.calendar = CalendarState::open(app.session.date(), day_nav::today());
            app.mode = Mode::Calendar;
        }

        // Task edits
        KeyCode::Char('a') => begin_edit(app, EditTarget::NewTask),
        KeyCode::Char('e') => {
            if let Some(id) = app.selected_id() {
                begin_edit(app, EditTarget::Title(id));
            }
        }
        KeyCode::Char('n') => {
            if let Some(id) = app.selected_id() {
                app.expanded.insert(id.clone());
                begin_edit(app, EditTarget::Notes(id));
            }
        }
        KeyCode::Char(' ') | KeyCode::Char('x') => {
            if let Some(id) = app.selected_id() {
                let result = app.session.toggle(&id);
                if app.report(result) {
                    app.cursor_to(&id);
                }
            }
        }
        KeyCode::Char('d') => {
            if let Some(id) = app.selected_id() {
                app.mode = Mode::ConfirmDelete(id);
            }
        }
        KeyCode::Enter | KeyCode::Tab => {
            if let Some(id) = app.selected_id()
                && !app.expanded.remove(&id)
            {
                app.expanded.insert(id);
            }
        }
        KeyCode::Char('r') => app.on_store_changed(),

        // Hand the active task to the focus view
        KeyCode::Char('f') => {
            if !app.session.minimize() {
                app.set_info("nothing left to focus on today");
            }
        }
        _ => {}
    }
}

fn drop_on_cursor(app: &mut App) {
    let Some(target) = app.selected_id() else {
        app.session.cancel_drag();
        return;
    };
    let dragged = app.session.dragging().map(str::to_string);
    let outcome = app.session.drop_on(&target);
    if let Some(id) = dragged {
        app.cursor_to(&id);
    }
    if !outcome.failed.is_empty() {
        let ids: Vec<&str> = outcome.failed.iter().map(|(id, _)| id.as_str()).collect();
        app.set_error(format!(
            "order saved partially; could not update {}",
            ids.join(", ")
        ));
    }
}

fn after_day_change<E: std::fmt::Display>(app: &mut App, result: Result<(), E>) {
    if app.report(result) {
        app.cursor = 0;
        app.scroll_offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;
    use pretty_assertions::assert_eq;

    use crate::io::state::ViewMode;
    use crate::io::store::Store;
    use crate::tui::app::Mode;
    use crate::tui::app::tests::scenario_app;
    use crate::tui::input::tests::press;

    fn order(app: &crate::tui::app::App) -> Vec<String> {
        app.session.tasks().iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let (_store, mut app) = scenario_app();
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.cursor, 0);
        for _ in 0..5 {
            press(&mut app, KeyCode::Char('j'));
        }
        assert_eq!(app.cursor, 2);
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.cursor, 0);
        press(&mut app, KeyCode::Char('G'));
        assert_eq!(app.cursor, 2);
    }

    #[test]
    fn grab_and_drop_reorders_and_follows_task() {
        let (_store, mut app) = scenario_app();
        press(&mut app, KeyCode::Char('G'));
        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.session.dragging(), Some("C"));
        press(&mut app, KeyCode::Char('g'));
        press(&mut app, KeyCode::Char('m'));
        assert_eq!(order(&app), vec!["C", "A", "B"]);
        assert_eq!(app.selected_id().as_deref(), Some("C"));
        assert_eq!(app.session.dragging(), None);
    }

    #[test]
    fn esc_cancels_drag() {
        let (store, mut app) = scenario_app();
        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.session.dragging(), None);
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn partial_drop_shows_error() {
        let (store, mut app) = scenario_app();
        store.fail_updates_for("B");
        press(&mut app, KeyCode::Char('G'));
        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Char('g'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(order(&app), vec!["C", "A", "B"]);
        let status = app.status.clone().unwrap();
        assert!(status.is_error);
        assert!(status.text.contains('B'));
    }

    #[test]
    fn toggle_keeps_cursor_on_task() {
        let (store, mut app) = scenario_app();
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.selected_id().as_deref(), Some("A"));
        let a = store.all().into_iter().find(|t| t.id == "A").unwrap();
        assert!(a.completed);
    }

    #[test]
    fn day_navigation_moves_date() {
        let (_store, mut app) = scenario_app();
        let start = app.session.date();
        press(&mut app, KeyCode::Right);
        assert_eq!(app.session.date(), start.succ_opt().unwrap());
        assert!(app.session.tasks().is_empty());
        press(&mut app, KeyCode::Left);
        assert_eq!(app.session.date(), start);
    }

    #[test]
    fn delete_asks_first() {
        let (store, mut app) = scenario_app();
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.mode, Mode::ConfirmDelete("A".into()));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(store.list_by_date(app.session.date()).unwrap().len(), 3);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(order(&app), vec!["B", "C"]);
    }

    #[test]
    fn focus_is_gated_on_active_task() {
        let (_store, mut app) = scenario_app();
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char(' '));
        // A and B done, C already done
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.session.mode(), ViewMode::List);
        assert!(app.status.is_some());
    }

    #[test]
    fn enter_toggles_notes_expansion() {
        let (_store, mut app) = scenario_app();
        press(&mut app, KeyCode::Enter);
        assert!(app.expanded.contains("A"));
        press(&mut app, KeyCode::Enter);
        assert!(!app.expanded.contains("A"));
    }
}
