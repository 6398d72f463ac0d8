//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};

/// Adjutant CLI - Extract action items from agendas and merge them into one store.
#[derive(Debug, Parser)]
#[command(name = "adjutant")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Merge-store database path (overrides configuration)
    #[arg(long, global = true)]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract action items from a local agenda document
    Extract(ExtractArgs),

    /// Extract action items from free-form notes
    Notes(NotesArgs),

    /// Walk a folder tree and import every agenda found
    Import(ImportArgs),

    /// List all merged action items
    List,

    /// Mark an action item done
    Done(IdArgs),

    /// Reopen a completed action item
    Reopen(IdArgs),

    /// Show the stats of the last folder import
    LastImport,

    /// Mirror the store into the configured workspace
    Sync,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Path to the agenda document (.md or .txt)
    pub path: String,

    /// Also mirror the merged items into the configured workspace
    #[arg(long)]
    pub sync: bool,
}

/// Arguments for the notes command.
#[derive(Debug, Parser)]
pub struct NotesArgs {
    /// Notes text; reads stdin when omitted
    pub text: Option<String>,
}

/// Arguments for the import command.
#[derive(Debug, Parser)]
pub struct ImportArgs {
    /// Root directory of the category/person folder tree
    pub root: String,

    /// Only documents whose name contains this string
    #[arg(long)]
    pub name_contains: Option<String>,

    /// Also mirror the merged items into the configured workspace
    #[arg(long)]
    pub sync: bool,
}

/// Arguments for commands addressing one item.
#[derive(Debug, Parser)]
pub struct IdArgs {
    /// External id of the item (prefix accepted)
    pub id: String,
}
