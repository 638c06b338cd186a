use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Facility status board with a mouse-driven TUI.
/// Records default to ~/.mkks or a directory passed via --store.
#[derive(Parser)]
#[command(name = "mkks", version, about = "Facility status board")]
pub struct Cli {
    /// Directory holding record files and layout.json.
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Layout file describing rooms and equipment (defaults to
    /// layout.json inside the store directory).
    #[arg(long, global = true)]
    pub layout: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
