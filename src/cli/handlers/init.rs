use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::data_dir::{self, DATA_DIR_NAME};

pub fn cmd_init(args: InitArgs, root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    // An enclosing workspace would otherwise be picked up by discovery
    if let Some(parent) = root.parent()
        && let Ok(outer) = data_dir::discover(parent)
    {
        eprintln!("Note: enclosing data directory found at {}", outer.display());
        eprintln!("Creating a new one in ./{}/", DATA_DIR_NAME);
    }

    let created = data_dir::init(root, args.force)?;
    println!("Initialized {}", created.display());
    Ok(())
}
