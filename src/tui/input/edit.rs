use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::task::NOTES_MAX_CHARS;
use crate::tui::app::{App, EditTarget, Mode};
use crate::tui::text_field::TextField;

/// Enter edit mode for `target`, pre-filled with the current value.
pub fn begin_edit(app: &mut App, target: EditTarget) {
    let field = match &target {
        EditTarget::NewTask => TextField::new("", None),
        EditTarget::Title(id) => {
            let title = app.session.task(id).map_or("", |t| t.title.as_str());
            TextField::new(title, None)
        }
        EditTarget::Notes(id) => {
            let notes = app.session.task(id).map_or("", |t| t.notes.as_str());
            TextField::new(notes, Some(NOTES_MAX_CHARS))
        }
    };
    app.field = field;
    app.mode = Mode::Edit(target);
}

pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    let Mode::Edit(target) = app.mode.clone() else {
        return;
    };
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Esc => {
            app.mode = Mode::Navigate;
            app.field.clear();
        }
        // Alt+Enter starts a new paragraph in notes
        KeyCode::Enter if alt && matches!(target, EditTarget::Notes(_)) => {
            insert_checked(app, '\n');
        }
        KeyCode::Enter => submit(app, target),
        KeyCode::Backspace if ctrl || alt => app.field.delete_word(),
        KeyCode::Backspace => app.field.backspace(),
        KeyCode::Delete => app.field.delete(),
        KeyCode::Left => app.field.left(),
        KeyCode::Right => app.field.right(),
        KeyCode::Home => app.field.home(),
        KeyCode::End => app.field.end(),
        KeyCode::Char('a') if ctrl => app.field.home(),
        KeyCode::Char('e') if ctrl => app.field.end(),
        KeyCode::Char('w') if ctrl => app.field.delete_word(),
        KeyCode::Char('u') if ctrl => app.field.clear(),
        KeyCode::Char(c) if !ctrl => insert_checked(app, c),
        _ => {}
    }
}

fn insert_checked(app: &mut App, c: char) {
    if !app.field.insert(c) {
        app.set_error(format!("notes are limited to {} characters", NOTES_MAX_CHARS));
    }
}

fn submit(app: &mut App, target: EditTarget) {
    let text = app.field.text().to_string();
    let result = match &target {
        EditTarget::NewTask => app.session.add(&text, "").map(|t| t.id),
        EditTarget::Title(id) => app.session.edit_title(id, &text).map(|_| id.clone()),
        EditTarget::Notes(id) => app.session.set_notes(id, &text).map(|_| id.clone()),
    };
    match result {
        Ok(id) => {
            app.mode = Mode::Navigate;
            app.field.clear();
            app.cursor_to(&id);
            app.status = None;
        }
        // Stay in edit mode so the input is not lost
        Err(e) => app.set_error(e),
    }
}
