//! Adjutant CLI - extract action items from agendas, merge, and sync.

use adjutant_cli::commands;
use adjutant_cli::{Cli, Command, Config, Formatter};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load or create config
    let config = Config::load().unwrap_or_else(|_| {
        let cfg = Config::default();
        cfg.save().ok();
        cfg
    });

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);
    let db = cli.db.as_deref();

    match cli.command {
        Command::Extract(args) => commands::execute_extract(args, &config, db, &formatter)?,
        Command::Notes(args) => commands::execute_notes(args, &config, db, &formatter)?,
        Command::Import(args) => commands::execute_import(args, &config, db, &formatter)?,
        Command::List => commands::execute_list(&config, db, &formatter)?,
        Command::Done(args) => commands::execute_done(args, &config, db, &formatter)?,
        Command::Reopen(args) => commands::execute_reopen(args, &config, db, &formatter)?,
        Command::LastImport => commands::execute_last_import(&config, db, &formatter)?,
        Command::Sync => commands::execute_sync(&config, db, &formatter)?,
    }

    Ok(())
}
