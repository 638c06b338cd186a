//! # MKKS - Facility Status Board
//!
//! A terminal status board for a facility: rooms and the equipment inside
//! them, each carrying an assignee (PJ), a specification, and a status.
//! Click an item (or navigate with the keyboard) to open its details in a
//! modal, edit them, and save; edits persist across sessions as per-item
//! JSON records.
//!
//! ## Key Features
//!
//! - **Mouse-driven TUI**: click a room block or an equipment row to open
//!   its modal; clicks on equipment always win over the surrounding room.
//! - **View/edit modal**: view mode shows the current fields with a colored
//!   status badge; edit mode offers two text inputs and a closed status
//!   selector.
//! - **Per-item persistence**: each identified item is stored as
//!   `mkks_item_<id>.json` in the store directory; corrupt records are
//!   ignored, never fatal.
//! - **Declarative layout**: the floor plan comes from `layout.json` (or a
//!   built-in default), so the board is data, not code.
//! - **CLI mirror**: `list`, `view`, and `set` cover scripted use; `backup`
//!   snapshots the records.
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the board
//! mkks ui
//!
//! # Inspect from a script
//! mkks list
//! mkks view srv-ac
//!
//! # Scripted edit (same rules as the modal's save)
//! mkks set srv-ac --pj "Bu Rina" --status Perbaikan
//! ```
//!
//! Data is stored locally in `~/.mkks` unless `--store` says otherwise.

use std::path::PathBuf;

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod item;
pub mod registry;
pub mod status;
pub mod store;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod form;
    pub mod input;
    pub mod router;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use registry::Registry;
use store::RecordStore;

fn main() {
    let cli = Cli::parse();

    // Completions need no store at all.
    if let Commands::Completions { shell } = &cli.command {
        cmd_completions(*shell);
        return;
    }

    // Determine the store directory.
    let store_dir = if let Some(dir) = cli.store.as_ref() {
        dir.clone()
    } else {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".mkks")
    };
    if let Err(e) = std::fs::create_dir_all(&store_dir) {
        eprintln!("Failed to create store directory {}: {}", store_dir.display(), e);
        std::process::exit(1);
    }

    let layout_path = cli
        .layout
        .unwrap_or_else(|| store_dir.join("layout.json"));
    let store = RecordStore::new(&store_dir);
    let mut registry = Registry::load(&layout_path);

    match cli.command {
        Commands::Ui => {
            // App runs the overlay sweep itself.
            cmd_ui(registry, store);
        }
        Commands::List => {
            registry.overlay_store(&store);
            cmd_list(&registry);
        }
        Commands::View { id } => {
            registry.overlay_store(&store);
            cmd_view(&registry, &id);
        }
        Commands::Set { id, pj, spek, status } => {
            registry.overlay_store(&store);
            cmd_set(&mut registry, &store, &id, pj, spek, status);
        }
        Commands::Backup => cmd_backup(&store),
        Commands::Completions { .. } => unreachable!("completions handled above"),
    }
}
