use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::io::json_store::STORE_FILE;

/// Events sent from the file watcher to the TUI event loop.
#[derive(Debug)]
pub enum StoreEvent {
    /// The store file was written by some process (possibly this one).
    Changed(PathBuf),
}

/// Watches the data directory for writes to the store file.
pub struct StoreWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<StoreEvent>,
}

impl StoreWatcher {
    /// Start watching `data_dir`. Call [`StoreWatcher::poll`] each tick.
    pub fn start(data_dir: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let store_path = data_dir.join(STORE_FILE);

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let Ok(event) = result else {
                    return;
                };
                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }
                // Atomic writes land as a rename onto tasks.json
                if event.paths.iter().any(|p| is_store_file(p, &store_path)) {
                    let _ = tx.send(StoreEvent::Changed(store_path.clone()));
                }
            },
            Config::default(),
        )?;

        watcher.watch(data_dir, RecursiveMode::NonRecursive)?;
        Ok(StoreWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Drain pending events. Returns true if the store changed since the
    /// last poll.
    pub fn poll(&self) -> bool {
        let mut changed = false;
        while let Ok(StoreEvent::Changed(_)) = self.rx.try_recv() {
            changed = true;
        }
        changed
    }
}

fn is_store_file(path: &Path, store_path: &Path) -> bool {
    path == store_path || path.file_name() == store_path.file_name()
}
