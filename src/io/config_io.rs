use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// File name of the config inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Written by `sk init`; every value shown is also the built-in default.
pub const DEFAULT_CONFIG: &str = r##"# sticky configuration

[focus]
# Seconds between refreshes of the focus view
poll_interval_secs = 5

[wrap]
# Characters per note line in the list view and the focus view
list_width = 120
focus_width = 50

[ui.colors]
# Override theme colors with hex values, e.g.
# background = "#1E1A00"
"##;

/// Error type for config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {CONFIG_FILE}: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Read the config from the data directory. A missing file yields defaults.
pub fn load_config(data_dir: &Path) -> Result<Config, ConfigError> {
    let config_path = data_dir.join(CONFIG_FILE);
    let config_text = match fs::read_to_string(&config_path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: config_path,
                source: e,
            });
        }
    };
    Ok(toml::from_str(&config_text)?)
}

/// Write [`DEFAULT_CONFIG`] unless a config exists and `overwrite` is false.
pub fn write_default_config(data_dir: &Path, overwrite: bool) -> Result<(), ConfigError> {
    let config_path = data_dir.join(CONFIG_FILE);
    if config_path.exists() && !overwrite {
        return Ok(());
    }
    fs::write(&config_path, DEFAULT_CONFIG).map_err(|e| ConfigError::WriteError {
        path: config_path,
        source: e,
    })
}
