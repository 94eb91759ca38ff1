use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Configuration from `.sticky/config.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub focus: FocusConfig,
    #[serde(default)]
    pub wrap: WrapConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusConfig {
    /// Seconds between focus view refreshes
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for FocusConfig {
    fn default() -> Self {
        FocusConfig {
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl FocusConfig {
    /// The refresh interval, never shorter than one second.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

fn default_poll_interval_secs() -> u64 {
    5
}

/// Characters per line when notes are wrapped to three lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrapConfig {
    #[serde(default = "default_list_width")]
    pub list_width: usize,
    #[serde(default = "default_focus_width")]
    pub focus_width: usize,
}

impl Default for WrapConfig {
    fn default() -> Self {
        WrapConfig {
            list_width: default_list_width(),
            focus_width: default_focus_width(),
        }
    }
}

fn default_list_width() -> usize {
    120
}

fn default_focus_width() -> usize {
    50
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Color overrides keyed by theme slot (e.g. `background = "#1E1A00"`)
    #[serde(default)]
    pub colors: HashMap<String, String>,
}
