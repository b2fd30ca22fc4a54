//! CLI interface using clap.
//!
//! Provides command-line arguments and subcommands for the tool.

use clap::{Parser, Subcommand};

use crate::application::OutputFormat;

/// Quote Keeper - manage a quote collection with remote sync.
#[derive(Parser, Debug)]
#[command(name = "quote-keeper")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format: text, json, or table.
    #[arg(short, long, default_value = "text")]
    pub format: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show one random quote.
    Show {
        /// Filter to a category (becomes the persisted selection).
        #[arg(short, long)]
        category: Option<String>,

        /// Ignore and clear the persisted category selection.
        #[arg(long)]
        all: bool,
    },

    /// List the quote collection.
    List {
        /// Filter to a category (becomes the persisted selection).
        #[arg(short, long)]
        category: Option<String>,

        /// Ignore and clear the persisted category selection.
        #[arg(long)]
        all: bool,
    },

    /// Add a quote to the collection.
    Add {
        /// The quote text.
        text: String,

        /// Category to file the quote under.
        #[arg(short, long)]
        category: String,
    },

    /// List distinct categories.
    Categories,

    /// Export the collection as JSON.
    Export {
        /// Output file path (stdout if not specified).
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Import quotes from a JSON file (appends to the collection).
    Import {
        /// Path to a JSON file holding an array of quotes.
        file: String,
    },

    /// Run one sync cycle against the remote endpoints.
    Sync,

    /// Run the periodic sync loop in the foreground.
    Daemon {
        /// Seconds between sync cycles (overrides config).
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Show sync state and collection statistics.
    Status,

    /// Manage the systemd user service for the sync daemon.
    Service {
        #[command(subcommand)]
        action: ServiceAction,
    },

    /// Show data paths being used.
    Paths,
}

#[derive(Subcommand, Debug)]
pub enum ServiceAction {
    /// Install, enable, and start the service.
    Install,
    /// Stop, disable, and remove the service.
    Uninstall,
    /// Show service status.
    Status,
    /// Show recent service logs.
    Logs {
        /// Number of log lines to show.
        #[arg(short, long, default_value = "50")]
        lines: usize,
    },
}

impl Cli {
    /// Parse the output format argument.
    pub fn output_format(&self) -> Result<OutputFormat, String> {
        self.format.parse()
    }
}
