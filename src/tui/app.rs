use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{info, warn};

use crate::io::data_dir;
use crate::io::state::{UiState, ViewMode, read_ui_state, write_ui_state};
use crate::io::store::SharedStore;
use crate::io::watcher::StoreWatcher;
use crate::model::Config;
use crate::model::task::TaskRecord;
use crate::ops::day_nav::{self, CalendarState};
use crate::session::Session;

use super::input;
use super::render;
use super::text_field::TextField;
use super::theme::Theme;

/// What a text entry will be saved as
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    NewTask,
    Title(String),
    Notes(String),
}

/// Current interaction mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Edit(EditTarget),
    /// Waiting for y/n before deleting the task with this id
    ConfirmDelete(String),
    Calendar,
}

/// A one-line message for the status row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// Main application state
pub struct App {
    pub session: Session,
    pub config: Config,
    pub theme: Theme,
    /// `.sticky/` directory, when running against a file store
    pub data_dir: Option<PathBuf>,
    pub mode: Mode,
    /// Index into the session's ordered tasks
    pub cursor: usize,
    pub scroll_offset: usize,
    /// Tasks whose notes are shown in the list view
    pub expanded: HashSet<String>,
    pub field: TextField,
    pub calendar: CalendarState,
    pub status: Option<StatusMessage>,
    pub show_help: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(session: Session, config: Config, data_dir: Option<PathBuf>) -> Self {
        let theme = Theme::from_config(&config.ui);
        let calendar = CalendarState::open(session.date(), day_nav::today());
        App {
            session,
            config,
            theme,
            data_dir,
            mode: Mode::Navigate,
            cursor: 0,
            scroll_offset: 0,
            expanded: HashSet::new(),
            field: TextField::default(),
            calendar,
            status: None,
            show_help: false,
            should_quit: false,
        }
    }

    pub fn selected_task(&self) -> Option<&TaskRecord> {
        self.session.tasks().get(self.cursor)
    }

    pub fn selected_id(&self) -> Option<String> {
        self.selected_task().map(|t| t.id.clone())
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.session.tasks().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Put the cursor on `id` if it is in the list.
    pub fn cursor_to(&mut self, id: &str) {
        if let Some(idx) = self.session.tasks().iter().position(|t| t.id == id) {
            self.cursor = idx;
        }
    }

    pub fn set_info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
    }

    pub fn set_error(&mut self, err: impl std::fmt::Display) {
        warn!(error = %err, "operation failed");
        self.status = Some(StatusMessage {
            text: err.to_string(),
            is_error: true,
        });
    }

    /// Report a failed result in the status row. Returns true on success.
    pub fn report<T, E: std::fmt::Display>(&mut self, result: Result<T, E>) -> bool {
        match result {
            Ok(_) => true,
            Err(e) => {
                self.set_error(e);
                false
            }
        }
    }

    /// Reload after the store file changed on disk, keeping the cursor on
    /// the same task where possible.
    pub fn on_store_changed(&mut self) {
        let keep = self.selected_id();
        let reloaded = self.session.reload();
        if self.report(reloaded) {
            if let Some(id) = keep {
                self.cursor_to(&id);
            }
            self.clamp_cursor();
        }
    }

    /// Snapshot of what should survive a restart
    pub fn ui_state(&self) -> UiState {
        UiState {
            mode: self.session.mode(),
            focus_task: self.session.focus_task().map(|t| t.id.clone()),
            cursor: self.cursor,
            expanded: self.expanded.clone(),
        }
    }

    /// Restore cursor, expansions and, if its task is still in the loaded
    /// day, the focus view.
    pub fn restore(&mut self, state: UiState) {
        self.cursor = state.cursor;
        self.clamp_cursor();
        self.expanded = state.expanded;
        if state.mode == ViewMode::Focus
            && let Some(id) = state.focus_task
        {
            self.session.resume_focus(&id);
        }
    }
}

fn save_ui_state(app: &App) {
    if let Some(dir) = &app.data_dir
        && let Err(e) = write_ui_state(dir, &app.ui_state())
    {
        warn!(error = %e, "could not save UI state");
    }
}

/// Run the TUI against the data directory found from `start`.
pub fn run(start: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let workspace = data_dir::discover_and_open(start)?;
    crate::logging::init_file(&workspace.data_dir)?;

    let store: SharedStore = Arc::new(workspace.store);
    let session = Session::open(
        store,
        day_nav::today(),
        workspace.config.focus.poll_interval(),
    )?;
    let mut app = App::new(session, workspace.config, Some(workspace.data_dir.clone()));
    if let Some(state) = read_ui_state(&workspace.data_dir) {
        app.restore(state);
    }
    let watcher = match StoreWatcher::start(&workspace.data_dir) {
        Ok(w) => Some(w),
        Err(e) => {
            warn!(error = %e, "file watcher unavailable; external edits need a manual reload");
            None
        }
    };
    info!(data_dir = %workspace.data_dir.display(), "tui started");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    save_ui_state(&app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&StoreWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut save_counter = 0u32;
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
            // Debounced state save: every ~5 key presses
            save_counter += 1;
            if save_counter >= 5 {
                save_ui_state(app);
                save_counter = 0;
            }
        }

        if watcher.is_some_and(StoreWatcher::poll) {
            app.on_store_changed();
        }
        app.session.poll();

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::io::memory_store::MemoryStore;
    use crate::io::store::Store;
    use crate::model::task::TaskPatch;
    use crate::ops::order::tests::task;

    /// An app over the 2024-01-10 scenario day: A, B, C (C completed).
    pub(crate) fn scenario_app() -> (Arc<MemoryStore>, App) {
        let store = Arc::new(MemoryStore::with_tasks(vec![
            task("A", 0, Some(0), false),
            task("B", 1, Some(1), false),
            task("C", 2, Some(2), true),
        ]));
        let shared: SharedStore = store.clone();
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let session = Session::open(shared, date, Duration::from_secs(60)).unwrap();
        (store, App::new(session, Config::default(), None))
    }

    #[test]
    fn store_change_keeps_cursor_on_task() {
        let (store, mut app) = scenario_app();
        app.cursor = 1;
        // another process moves B to the top
        store.update_by_id("B", &TaskPatch::priority(-1)).unwrap();
        app.on_store_changed();
        assert_eq!(app.selected_id().as_deref(), Some("B"));
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn failed_reload_reports_error() {
        let (store, mut app) = scenario_app();
        store.set_unavailable(true);
        app.on_store_changed();
        assert!(app.status.as_ref().is_some_and(|s| s.is_error));
        assert_eq!(app.session.tasks().len(), 3);
    }

    #[test]
    fn ui_state_round_trips_focus() {
        let (_store, mut app) = scenario_app();
        app.expanded.insert("B".into());
        assert!(app.session.minimize());
        let state = app.ui_state();
        assert_eq!(state.mode, ViewMode::Focus);
        assert_eq!(state.focus_task.as_deref(), Some("A"));

        let (_store, mut fresh) = scenario_app();
        fresh.restore(state);
        assert_eq!(fresh.session.mode(), ViewMode::Focus);
        assert_eq!(fresh.session.focus_task().map(|t| t.id.as_str()), Some("A"));
        assert!(fresh.expanded.contains("B"));
    }

    #[test]
    fn restore_ignores_task_from_another_day() {
        let (_store, mut app) = scenario_app();
        app.restore(UiState {
            mode: ViewMode::Focus,
            focus_task: Some("gone".into()),
            cursor: 99,
            expanded: HashSet::new(),
        });
        assert_eq!(app.session.mode(), ViewMode::List);
        assert_eq!(app.cursor, 2);
    }
}
