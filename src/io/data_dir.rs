use std::fs;
use std::path::{Path, PathBuf};

use crate::io::config_io::{self, ConfigError};
use crate::io::json_store::JsonStore;
use crate::io::store::StoreError;
use crate::model::config::Config;

/// Name of the per-workspace data directory.
pub const DATA_DIR_NAME: &str = ".sticky";

/// Error type for locating or creating the data directory
#[derive(Debug, thiserror::Error)]
pub enum DataDirError {
    #[error("no {DATA_DIR_NAME}/ directory found (run `sk init`)")]
    NotFound,
    #[error("{0} already exists (use --force to reinitialize)")]
    AlreadyExists(PathBuf),
    #[error("could not create {path}: {source}")]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A located data directory with its parsed config and store handle
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Path to the `.sticky/` directory
    pub data_dir: PathBuf,
    pub config: Config,
    pub store: JsonStore,
}

/// Walk up from `start` looking for a `.sticky/` directory.
pub fn discover(start: &Path) -> Result<PathBuf, DataDirError> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(DATA_DIR_NAME);
        if candidate.is_dir() {
            return Ok(candidate);
        }
        if !current.pop() {
            return Err(DataDirError::NotFound);
        }
    }
}

/// Load config and open the store for an existing data directory.
pub fn open(data_dir: &Path) -> Result<Workspace, DataDirError> {
    let config = config_io::load_config(data_dir)?;
    Ok(Workspace {
        data_dir: data_dir.to_path_buf(),
        config,
        store: JsonStore::open(data_dir),
    })
}

/// Discover from `start` and open.
pub fn discover_and_open(start: &Path) -> Result<Workspace, DataDirError> {
    let data_dir = discover(start)?;
    open(&data_dir)
}

/// Create `.sticky/` under `root` with a default config and an empty store.
pub fn init(root: &Path, force: bool) -> Result<PathBuf, DataDirError> {
    let data_dir = root.join(DATA_DIR_NAME);
    if data_dir.exists() && !force {
        return Err(DataDirError::AlreadyExists(data_dir));
    }
    fs::create_dir_all(&data_dir).map_err(|e| DataDirError::CreateError {
        path: data_dir.clone(),
        source: e,
    })?;
    config_io::write_default_config(&data_dir, force)?;
    JsonStore::open(&data_dir).init()?;
    Ok(data_dir)
}
