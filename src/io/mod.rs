pub mod config_io;
pub mod data_dir;
pub mod json_store;
pub mod lock;
pub mod memory_store;
pub mod state;
pub mod store;
pub mod watcher;
