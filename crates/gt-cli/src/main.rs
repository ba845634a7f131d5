use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use gt_core::BatchRestoreError;
use gt_store::JsonStore;
use tracing_subscriber::EnvFilter;

use gt_cli::{Cli, Config, commands};

/// Resolve the tracker document from `--store`, falling back to config.
fn open_store(config_path: Option<&Path>, store_override: Option<&Path>) -> Result<JsonStore> {
    if let Some(path) = store_override {
        return Ok(JsonStore::new(path));
    }
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(JsonStore::new(config.store_path))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let store = open_store(cli.config.as_deref(), cli.store.as_deref())?;
    let mut tracker = store
        .load()
        .with_context(|| format!("failed to load {}", store.path().display()))?;

    let mut stdout = std::io::stdout().lock();
    let outcome = commands::execute(&mut stdout, &mut tracker, command, Utc::now());

    // A partially applied batch undo keeps the records it restored.
    let partial = outcome
        .as_ref()
        .err()
        .and_then(|e| e.downcast_ref::<BatchRestoreError>())
        .is_some_and(|e| !e.restored.is_empty());

    if command.mutates() && (outcome.is_ok() || partial) {
        store
            .save(&tracker)
            .with_context(|| format!("failed to save {}", store.path().display()))?;
    }
    outcome
}
