//! Output formatting for the quote collection.
//!
//! Supports plain text, JSON, and table views.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::domain::{CollectionStats, Quote, SyncOutcome, SyncState};

/// Output format options.
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Human-readable plain text.
    #[default]
    Text,
    /// JSON format for programmatic use.
    Json,
    /// Compact table listing.
    Table,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "table" => Ok(Self::Table),
            _ => Err(format!("Unknown format: {s}. Use: text, json, table")),
        }
    }
}

/// Formats a single quote for display.
pub fn format_quote(quote: &Quote) -> String {
    format!(
        "{}\n  {} {}",
        format!("\u{201c}{}\u{201d}", quote.text).italic(),
        "Category:".dimmed(),
        quote.category.cyan()
    )
}

/// Formats the collection as plain text, one quote per block.
pub fn format_quotes_text(quotes: &[Quote]) -> String {
    quotes
        .iter()
        .map(format_quote)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Formats the collection as JSON.
///
/// # Errors
/// Returns error if serialization fails.
pub fn format_quotes_json(quotes: &[Quote]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(quotes)
}

/// Formats a table listing of quotes.
pub fn format_quotes_table(quotes: &[Quote]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Quote", "Category"]);

    for (i, quote) in quotes.iter().enumerate() {
        table.add_row(vec![
            &(i + 1).to_string(),
            &truncate(&quote.text, 60),
            &quote.category,
        ]);
    }

    table.to_string()
}

/// Formats collection statistics for display.
pub fn format_stats(stats: &CollectionStats) -> String {
    format!(
        "{}\n  Quotes: {}\n  Categories: {}",
        "📊 Collection".bold(),
        stats.quote_count.to_string().cyan(),
        stats.category_count.to_string().green(),
    )
}

/// Formats the outcome of a sync cycle as a status line.
pub fn format_sync_outcome(outcome: &SyncOutcome) -> String {
    match outcome {
        SyncOutcome::Replaced {
            fetched,
            push_error,
        } => {
            let mut line = format!(
                "{} Quotes synced with server ({fetched} fetched)",
                "✓".green().bold()
            );
            if let Some(err) = push_error {
                line.push_str(&format!(
                    "\n{} Error posting quotes to server: {err}",
                    "!".yellow().bold()
                ));
            }
            line
        }
        SyncOutcome::NoData => format!("{} No server data available", "·".dimmed()),
        SyncOutcome::FetchFailed { message } => {
            format!("{} Sync failed: {message}", "✗".red().bold())
        }
        SyncOutcome::Skipped => {
            format!("{} Sync already in progress, skipped", "·".dimmed())
        }
    }
}

/// Formats the persisted sync state for the status command.
pub fn format_sync_state(state: &SyncState) -> String {
    let last_sync = state.last_sync.map_or_else(
        || "never".to_string(),
        |dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    );

    let mut out = format!(
        "{}\n  Last sync: {}\n  Quotes at last sync: {}",
        "🔄 Sync".bold(),
        last_sync.cyan(),
        state.quote_count.to_string().cyan(),
    );

    if state.is_syncing {
        out.push_str(&format!("\n  {}", "sync in progress".yellow()));
    }

    if let Some(ref err) = state.last_error {
        out.push_str(&format!("\n  Last error: {}", err.red()));
    }

    out
}

/// Format bytes as human readable string.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Truncates a string to max length with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    let s = s.lines().next().unwrap_or(s);
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world!", 8), "hello...");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(500), "500 B");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1024 * 1024), "1.00 MB");
    }

    #[test]
    fn test_output_format_from_str() {
        assert!(matches!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text)));
        assert!(matches!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json)));
        assert!(matches!(
            "table".parse::<OutputFormat>(),
            Ok(OutputFormat::Table)
        ));
        assert!("invalid".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_outcome_lines() {
        let replaced = SyncOutcome::Replaced {
            fetched: 3,
            push_error: None,
        };
        assert!(format_sync_outcome(&replaced).contains("3 fetched"));

        let failed = SyncOutcome::FetchFailed {
            message: "timeout".into(),
        };
        assert!(format_sync_outcome(&failed).contains("timeout"));
    }

    #[test]
    fn test_table_lists_every_quote() {
        let quotes = vec![Quote::new("a", "One"), Quote::new("b", "Two")];
        let table = format_quotes_table(&quotes);
        assert!(table.contains("One"));
        assert!(table.contains("Two"));
    }
}
