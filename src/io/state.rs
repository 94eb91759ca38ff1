use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// File name of the UI state inside the data directory.
pub const STATE_FILE: &str = ".state.json";

/// Which surface the TUI was showing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    List,
    Focus,
}

/// Persisted TUI state (written to .state.json)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    #[serde(default)]
    pub mode: ViewMode,
    /// Id of the task held by the focus view
    #[serde(default)]
    pub focus_task: Option<String>,
    /// Cursor position in the list view
    #[serde(default)]
    pub cursor: usize,
    /// Tasks whose notes are expanded in the list view
    #[serde(default)]
    pub expanded: HashSet<String>,
}

/// Read .state.json from the data directory. Missing or malformed state is
/// treated as no state.
pub fn read_ui_state(data_dir: &Path) -> Option<UiState> {
    let content = fs::read_to_string(data_dir.join(STATE_FILE)).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write .state.json to the data directory
pub fn write_ui_state(data_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let content = serde_json::to_string_pretty(state)?;
    fs::write(data_dir.join(STATE_FILE), content)
}
