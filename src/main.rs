//! Quote Keeper - manage a quote collection with remote sync.
//!
//! The collection lives in a local key-value store and is
//! periodically reconciled against a remote mock API: the remote
//! snapshot replaces the local collection wholesale and is echoed
//! back best-effort.
//!
//! QUICK START:
//!   quote-keeper show                 # Display a random quote
//!   quote-keeper add "..." -c Wisdom  # Add a quote
//!   quote-keeper list -c Wisdom       # List a category
//!   quote-keeper sync                 # One reconciliation cycle
//!   quote-keeper daemon               # Periodic sync loop

mod application;
mod cli;
mod domain;
mod infrastructure;

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use application::{
    export_quotes, format_bytes, format_quote, format_quotes_json, format_quotes_table,
    format_quotes_text, format_stats, format_sync_outcome, format_sync_state, import_quotes,
    OutputFormat, QuoteService, SyncService,
};
use cli::{Cli, Commands, ServiceAction};
use domain::AppConfig;
use infrastructure::{
    ensure_config_exists, load_config, HttpRemote, QuoteStore, SyncDaemonService,
};

fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Main application logic.
fn run(cli: Cli) -> domain::Result<()> {
    let format = cli
        .output_format()
        .map_err(|e| domain::AppError::Config { message: e })?;

    let config = load_config()?;

    match cli.command {
        Commands::Show { category, all } => {
            cmd_show(&config, category.as_deref(), all)?;
        }
        Commands::List { category, all } => {
            cmd_list(&config, category.as_deref(), all, format)?;
        }
        Commands::Add { text, category } => {
            cmd_add(&config, &text, &category)?;
        }
        Commands::Categories => {
            cmd_categories(&config)?;
        }
        Commands::Export { output } => {
            cmd_export(&config, output.as_deref())?;
        }
        Commands::Import { file } => {
            cmd_import(&config, &file)?;
        }
        Commands::Sync => {
            cmd_sync(&config)?;
        }
        Commands::Daemon { interval } => {
            cmd_daemon(config, interval)?;
        }
        Commands::Status => {
            cmd_status(&config)?;
        }
        Commands::Service { action } => {
            cmd_service(config, &action)?;
        }
        Commands::Paths => {
            cmd_paths(&config);
        }
    }

    Ok(())
}

fn open_service(config: &AppConfig) -> domain::Result<QuoteService> {
    let store = QuoteStore::open(&config.store_db_path())?;
    Ok(QuoteService::new(store))
}

/// Show a random quote.
fn cmd_show(config: &AppConfig, category: Option<&str>, all: bool) -> domain::Result<()> {
    let service = open_service(config)?;
    let filter = service.resolve_filter(category, all)?;

    match service.random_quote(filter.as_deref()) {
        Some(quote) => println!("{}", format_quote(&quote)),
        None => println!(
            "{}",
            match filter {
                Some(cat) => format!("No quotes in category '{cat}'").yellow(),
                None => "No quotes in the collection".yellow(),
            }
        ),
    }

    Ok(())
}

/// List quotes command.
fn cmd_list(
    config: &AppConfig,
    category: Option<&str>,
    all: bool,
    format: OutputFormat,
) -> domain::Result<()> {
    let service = open_service(config)?;
    let filter = service.resolve_filter(category, all)?;
    let quotes = service.filtered_quotes(filter.as_deref());

    let output = match format {
        OutputFormat::Text => format_quotes_text(&quotes),
        OutputFormat::Json => format_quotes_json(&quotes).map_err(domain::AppError::json_parse)?,
        OutputFormat::Table => format_quotes_table(&quotes),
    };

    println!("{output}");
    println!();
    println!("{}", format_stats(&service.stats()));

    Ok(())
}

/// Add a quote.
fn cmd_add(config: &AppConfig, text: &str, category: &str) -> domain::Result<()> {
    let service = open_service(config)?;
    let quote = service.add_quote(text, category)?;

    println!(
        "{} Quote added to {}",
        "✓".green().bold(),
        quote.category.cyan()
    );

    Ok(())
}

/// List distinct categories.
fn cmd_categories(config: &AppConfig) -> domain::Result<()> {
    let service = open_service(config)?;

    for category in service.categories() {
        println!("{category}");
    }

    Ok(())
}

/// Export the collection to file or stdout.
fn cmd_export(config: &AppConfig, output_path: Option<&str>) -> domain::Result<()> {
    let service = open_service(config)?;
    let content = export_quotes(service.store())?;
    let count = service.stats().quote_count;

    match output_path {
        Some(path) => {
            let mut file = std::fs::File::create(path)
                .map_err(|e| domain::AppError::io(format!("Failed to create {path}"), e))?;
            file.write_all(content.as_bytes())
                .map_err(|e| domain::AppError::io("Failed to write file", e))?;
            println!("{} Exported {} quotes to {}", "✓".green().bold(), count, path);
        }
        None => {
            println!("{content}");
        }
    }

    Ok(())
}

/// Import quotes from a JSON file.
fn cmd_import(config: &AppConfig, file: &str) -> domain::Result<()> {
    let service = open_service(config)?;
    let report = import_quotes(service.store(), Path::new(file))?;

    println!(
        "{} Imported {} quotes (collection now {})",
        "✓".green().bold(),
        report.imported,
        report.total
    );

    Ok(())
}

fn build_sync_service(config: &AppConfig) -> domain::Result<SyncService<HttpRemote>> {
    let store = QuoteStore::open(&config.store_db_path())?;
    let remote = HttpRemote::new(config.remote.clone())?;
    Ok(SyncService::new(config.clone(), store, remote))
}

/// Run one sync cycle.
fn cmd_sync(config: &AppConfig) -> domain::Result<()> {
    let service = build_sync_service(config)?;
    let outcome = service.sync()?;

    println!("{}", format_sync_outcome(&outcome));

    Ok(())
}

/// Run the periodic sync loop in the foreground.
fn cmd_daemon(mut config: AppConfig, interval: Option<u64>) -> domain::Result<()> {
    ensure_config_exists()?;

    if let Some(secs) = interval {
        config.sync.interval_secs = secs;
    }

    if !config.sync.enabled {
        println!("{} Sync is disabled in config.toml", "!".yellow().bold());
        return Ok(());
    }

    let interval = Duration::from_secs(config.sync.interval_secs);
    let service = build_sync_service(&config)?;

    service.run_forever(interval)
}

/// Show sync state and collection statistics.
fn cmd_status(config: &AppConfig) -> domain::Result<()> {
    let service = open_service(config)?;
    let state = service.store().get_sync_state()?;

    println!("{}", format_sync_state(&state));
    println!();
    println!("{}", format_stats(&service.stats()));
    println!("  Store size: {}", format_bytes(service.store().storage_size()?));

    Ok(())
}

/// Manage the systemd user service.
fn cmd_service(config: AppConfig, action: &ServiceAction) -> domain::Result<()> {
    let daemon = SyncDaemonService::new(config);

    match action {
        ServiceAction::Install => {
            let path = daemon.install()?;
            println!(
                "{} Service installed and started ({})",
                "✓".green().bold(),
                path.display()
            );
        }
        ServiceAction::Uninstall => {
            daemon.uninstall()?;
            println!("{} Service uninstalled", "✓".green().bold());
        }
        ServiceAction::Status => {
            println!("Service: {}", daemon.status()?);
        }
        ServiceAction::Logs { lines } => {
            println!("{}", daemon.logs(*lines)?);
        }
    }

    Ok(())
}

/// Show data paths command.
fn cmd_paths(config: &AppConfig) {
    println!("{}", "📂 Quote Keeper Paths".bold());
    println!();
    println!("  data dir: {}", config.data_dir().display());
    println!("  store:    {}", config.store_db_path().display());
    println!("  config:   {}", config.config_file_path().display());
}

/// Setup tracing/logging based on verbosity level.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
