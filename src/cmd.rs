//! Command definitions and handlers.
//!
//! The `Commands` enum is the CLI surface; each variant has a matching
//! `cmd_*` handler. `cmd_ui` owns terminal setup and teardown for the TUI;
//! the rest are plain stdout/stderr commands for scripting.

use std::fs;
use std::path::Path;

use chrono::Local;
use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::item::{display_or_unset, trim_or_unset};
use crate::registry::Registry;
use crate::status::{classify, format_category, STATUS_OPTIONS};
use crate::store::{ItemRecord, RecordStore};
use crate::tui::app::App;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive board UI.
    Ui,

    /// Print all items with their current (overlaid) fields.
    List,

    /// Print one item by identifier.
    View {
        /// Item identifier.
        id: String,
    },

    /// Update an item's record from the command line.
    Set {
        /// Item identifier.
        id: String,
        /// New assignee; empty string clears it back to "-".
        #[arg(long)]
        pj: Option<String>,
        /// New specification; empty string clears it back to "-".
        #[arg(long)]
        spek: Option<String>,
        /// New status; must be one of the selectable statuses.
        #[arg(long)]
        status: Option<String>,
    },

    /// Copy all record files into a timestamped backup directory.
    Backup,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the terminal user interface.
pub fn cmd_ui(registry: Registry, store: RecordStore) {
    if let Err(e) = run_tui(registry, store) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

fn run_tui(registry: Registry, store: RecordStore) -> std::io::Result<()> {
    use crossterm::{
        event::{DisableMouseCapture, EnableMouseCapture},
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    };
    use ratatui::{backend::CrosstermBackend, Terminal};
    use std::io;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(registry, store);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

/// Print all items in a formatted table.
pub fn cmd_list(registry: &Registry) {
    println!(
        "{:<12} {:<22} {:<16} {:<12} {}",
        "ID", "Label", "PJ", "Status", "Category"
    );
    for room in &registry.rooms {
        print_row(&room.item, "");
        for item in &room.gear {
            print_row(item, "  ");
        }
    }
}

fn print_row(item: &crate::item::Item, indent: &str) {
    let Some(label) = item.label.as_deref() else {
        return;
    };
    let id = item.persist_id().unwrap_or("-");
    println!(
        "{:<12} {:<22} {:<16} {:<12} {}",
        truncate(id, 12),
        format!("{}{}", indent, truncate(label, 20)),
        truncate(display_or_unset(&item.pj), 16),
        truncate(display_or_unset(&item.status), 12),
        format_category(classify(&item.status))
    );
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

/// Print one item's overlaid fields.
pub fn cmd_view(registry: &Registry, id: &str) {
    let Some(key) = registry.find_by_id(id) else {
        eprintln!("No item with id '{}'", id);
        std::process::exit(1);
    };
    let item = registry.get(key).expect("key from find_by_id");
    println!("Label:  {}", item.label.as_deref().unwrap_or("-"));
    println!("PJ:     {}", display_or_unset(&item.pj));
    println!("Spek:   {}", display_or_unset(&item.spek));
    println!(
        "Status: {} ({})",
        display_or_unset(&item.status),
        format_category(classify(&item.status))
    );
}

/// Scripted edit: apply the same trim/sentinel rules as the modal save path
/// and persist the full record.
pub fn cmd_set(
    registry: &mut Registry,
    store: &RecordStore,
    id: &str,
    pj: Option<String>,
    spek: Option<String>,
    status: Option<String>,
) {
    let Some(key) = registry.find_by_id(id) else {
        eprintln!("No item with id '{}'", id);
        std::process::exit(1);
    };

    if let Some(ref s) = status {
        if !STATUS_OPTIONS.contains(&s.as_str()) {
            eprintln!(
                "Status '{}' is not selectable; choose one of: {}",
                s,
                STATUS_OPTIONS.join(", ")
            );
            std::process::exit(1);
        }
    }

    let item = registry.get_mut(key).expect("key from find_by_id");
    if let Some(pj) = pj {
        item.pj = trim_or_unset(&pj);
    }
    if let Some(spek) = spek {
        item.spek = trim_or_unset(&spek);
    }
    if let Some(status) = status {
        item.status = status;
    }

    let record = ItemRecord {
        pj: Some(item.pj.clone()),
        spek: Some(item.spek.clone()),
        status: Some(item.status.clone()),
    };
    if let Err(e) = store.save(id, &record) {
        eprintln!("Failed to save record for '{}': {e}", id);
        std::process::exit(1);
    }
    println!("Updated {}", id);
}

/// Copy all record files into `backup_<timestamp>` under the store.
pub fn cmd_backup(store: &RecordStore) {
    let files = match store.record_files() {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Failed to list records: {e}");
            std::process::exit(1);
        }
    };
    if files.is_empty() {
        println!("Nothing to back up");
        return;
    }

    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let backup_dir = store.dir().join(format!("backup_{}", timestamp));
    if let Err(e) = copy_records(&files, &backup_dir) {
        eprintln!("Failed to create backup: {e}");
        std::process::exit(1);
    }
    println!("Backed up {} records to {}", files.len(), backup_dir.display());
}

fn copy_records(files: &[std::path::PathBuf], backup_dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(backup_dir)?;
    for file in files {
        if let Some(name) = file.file_name() {
            fs::copy(file, backup_dir.join(name))?;
        }
    }
    Ok(())
}

/// Generate shell completion scripts for the given shell.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
