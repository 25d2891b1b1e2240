use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use libquotecast::history::{HistoryStore, JsonFileStore, UsageHistory, HISTORY_LIMIT};
use libquotecast::rotation::unused_quotes;
use libquotecast::{Config, ContentCatalog};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "quote-history")]
#[command(version, about = "Inspect or reset the quote rotation history")]
#[command(long_about = r#"Inspect or reset the record of recently posted quotes.

quote-post never repeats a quote that is still in this history. Once every
catalog quote has been used, the rotation resets itself; use `clear` to start
over early.

EXAMPLES:
    # Show the recorded quotes, oldest first
    quote-history list

    # JSON output for scripting
    quote-history list --format json | jq '.[-1]'

    # How far through the catalog are we?
    quote-history stats
    quote-history stats --format json

    # Forget everything and start a fresh rotation
    quote-history clear

EXIT CODES:
    0 - Success (including an empty history)
    1 - Error (unreadable config, history could not be written, etc.)
"#)]
struct Args {
    /// Path to config file (overrides QUOTECAST_CONFIG)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List recorded quotes, oldest first
    List {
        #[arg(short, long, default_value = "text", value_name = "FORMAT")]
        #[arg(value_parser = ["text", "json"])]
        format: String,
    },
    /// Summarize rotation progress against the catalog
    Stats {
        #[arg(short, long, default_value = "text", value_name = "FORMAT")]
        #[arg(value_parser = ["text", "json"])]
        format: String,
    },
    /// Erase the history so every quote becomes available again
    Clear,
}

#[derive(Debug, Serialize)]
struct RotationStats {
    catalog_quotes: usize,
    history_len: usize,
    history_limit: usize,
    available: usize,
    last_posted: Option<String>,
}

impl RotationStats {
    fn collect(catalog: &ContentCatalog, history: &UsageHistory) -> Self {
        Self {
            catalog_quotes: catalog.quotes.len(),
            history_len: history.len(),
            history_limit: HISTORY_LIMIT,
            available: unused_quotes(&catalog.quotes, history).len(),
            last_posted: history.last().map(str::to_string),
        }
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    libquotecast::logging::init_default(false, None);
    tracing::debug!("quote-history started with args: {:?}", args);

    let config = match &args.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    let history_path = config
        .history_path()
        .context("Failed to resolve history path")?;
    let store = JsonFileStore::new(history_path);

    match args.command {
        Command::List { format } => {
            let history = store.load();
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(history.entries())?);
            } else {
                // Empty history: output nothing and exit 0
                for (i, quote) in history.entries().iter().enumerate() {
                    println!("{:>3}. {}", i + 1, quote);
                }
            }
        }
        Command::Stats { format } => {
            let catalog_path = config
                .catalog_path()
                .context("Failed to resolve catalog path")?;
            let catalog = ContentCatalog::load(&catalog_path);
            let stats = RotationStats::collect(&catalog, &store.load());

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Catalog quotes:  {}", stats.catalog_quotes);
                println!(
                    "History:         {} (keeps at most {})",
                    stats.history_len, stats.history_limit
                );
                println!("Available:       {}", stats.available);
                if let Some(last) = &stats.last_posted {
                    println!("Last posted:     {}", last);
                }
            }
        }
        Command::Clear => {
            store
                .save(&UsageHistory::new())
                .context("Failed to clear history")?;
            println!("✅ Cleared quote history at {}", store.path().display());
        }
    }

    Ok(())
}
