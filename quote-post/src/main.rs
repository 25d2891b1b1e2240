//! quote-post - Publish one motivational quote or poll to Twitter/X

use clap::Parser;
use libquotecast::platforms::dry_run::DryRunPublisher;
use libquotecast::platforms::twitter::TwitterPublisher;
use libquotecast::platforms::Publisher;
use libquotecast::{
    Config, ContentCatalog, ContentKind, Credentials, JsonFileStore, QuoteBot, QuotecastError,
    Result, RunReport,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "quote-post")]
#[command(version)]
#[command(about = "Post a motivational quote or poll to Twitter/X")]
#[command(long_about = "\
quote-post - Post a motivational quote or poll to Twitter/X

DESCRIPTION:
    quote-post performs a single run and exits; schedule it with cron.
    Each run posts a quote from the catalog (never repeating one until the
    catalog is used up) or, now and then, a poll.

USAGE:
    # Post according to the configured poll probability
    quote-post

    # Preview without posting or touching the history
    quote-post --dry-run

    # Force the content type
    quote-post --kind poll

    # JSON report for scripting
    quote-post --format json | jq '.post_id'

    # Daily at 09:00 via cron
    0 9 * * * /usr/local/bin/quote-post >> ~/quote-post.log 2>&1

CONFIGURATION:
    Configuration file: ~/.config/quotecast/config.toml (or $QUOTECAST_CONFIG)

    [content]
    catalog = \"~/.config/quotecast/quotes.json\"
    history = \"~/.local/share/quotecast/used_quotes.json\"
    poll_probability = 0.2

    Credentials are read from the environment (a .env file is honored):
    TWITTER_API_KEY, TWITTER_API_SECRET, TWITTER_ACCESS_TOKEN,
    TWITTER_ACCESS_TOKEN_SECRET

EXIT CODES:
    0 - Posted successfully
    1 - Posting failed
    2 - Configuration error (including missing credentials)
    3 - Invalid input
")]
struct Cli {
    /// Select and format content but do not post it
    #[arg(long)]
    #[arg(help = "Print what would be posted; nothing is sent and the history is not updated")]
    dry_run: bool,

    /// Force the content type instead of drawing it
    #[arg(short, long, value_name = "KIND")]
    #[arg(help = "Content type to post: quote or poll (default: random)")]
    kind: Option<String>,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    #[arg(value_parser = ["text", "json"])]
    format: String,

    /// Path to config file (overrides QUOTECAST_CONFIG)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

/// Returns whether the post went out
async fn run(cli: Cli) -> Result<bool> {
    let kind = cli
        .kind
        .as_deref()
        .map(str::parse::<ContentKind>)
        .transpose()
        .map_err(QuotecastError::InvalidInput)?;

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    libquotecast::logging::init_default(cli.verbose, config.log_file_path()?);

    // Credentials are checked before anything is selected or saved
    let report = if cli.dry_run {
        run_with(&config, DryRunPublisher::new(), kind, true).await?
    } else {
        let credentials = Credentials::from_env()?;
        let publisher = TwitterPublisher::new(&config.twitter, credentials)?;
        run_with(&config, publisher, kind, false).await?
    };

    print_report(&report, &cli.format)?;
    Ok(report.success)
}

async fn run_with<P: Publisher>(
    config: &Config,
    publisher: P,
    kind: Option<ContentKind>,
    dry_run: bool,
) -> Result<RunReport> {
    let catalog = ContentCatalog::load(&config.catalog_path()?);
    let store = JsonFileStore::new(config.history_path()?);

    tracing::debug!(
        quotes = catalog.quotes.len(),
        polls = catalog.polls.len(),
        publisher = publisher.name(),
        "Starting run"
    );

    let report = QuoteBot::new(catalog, store, publisher)
        .with_poll_probability(config.content.poll_probability)
        .with_dry_run(dry_run)
        .run_once(kind)
        .await;
    Ok(report)
}

fn print_report(report: &RunReport, format: &str) -> Result<()> {
    if format == "json" {
        let json = serde_json::to_string_pretty(report)
            .map_err(|e| QuotecastError::InvalidInput(format!("Failed to encode report: {}", e)))?;
        println!("{}", json);
        return Ok(());
    }

    if report.dry_run {
        println!("🔎 Dry run, would post {}:", report.kind());
        println!("{}", report.message);
        if let libquotecast::Content::Poll(poll) = &report.content {
            for option in &poll.options {
                println!("  - {}", option);
            }
        }
    } else if report.success {
        if let Some(error) = &report.history_error {
            eprintln!("⚠️  Quote history not saved: {}", error);
        }
        println!(
            "✅ Posted {} {}: {}",
            report.kind(),
            report.post_id.as_deref().unwrap_or("-"),
            report.message
        );
    } else {
        println!(
            "❌ Failed to post {}: {}",
            report.kind(),
            report.error.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}
