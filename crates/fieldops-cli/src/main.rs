//! Field-ops CLI entry point.

use std::sync::Arc;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use fieldops_cli::cli::Cli;
use fieldops_cli::commands;
use fieldops_core::CatalogConfig;
use fieldops_lifecycle::StatusCatalog;
use fieldops_persistence::WorkStore;
use fieldops_tracker::Tracker;

fn main() {
    // Load .env.local if it exists (FIELDOPS_ACTOR, FIELDOPS_CATALOG etc.)
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_path(fieldops_core::env_file());

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));

    fmt().with_env_filter(filter).with_target(false).init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> commands::Result<()> {
    let (config, source) = CatalogConfig::resolve(cli.catalog.as_deref())?;
    let catalog = Arc::new(StatusCatalog::from_config(&config)?);
    debug!(source = %source, "Status catalog loaded");

    let data_dir = cli.data_dir();
    debug!(data_dir = %data_dir.display(), "Opening work store");
    let tracker = Tracker::new(catalog, WorkStore::new(data_dir));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(commands::execute(cli.command, &tracker))
}
