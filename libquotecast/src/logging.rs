//! Centralized logging configuration for Quotecast binaries
//!
//! Provides consistent logging setup with support for:
//! - Text, JSON, and pretty-printed output
//! - Environment variable configuration
//! - An optional append-only log file alongside stderr
//!
//! # Examples
//!
//! ```no_run
//! use libquotecast::logging::{LoggingConfig, LogFormat};
//!
//! let config = LoggingConfig::new(LogFormat::Json, "info".to_string(), false);
//! config.init();
//!
//! // Or use default settings (respects env vars)
//! libquotecast::logging::init_default(false, None);
//! ```

use std::path::PathBuf;
use std::str::FromStr;

use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable text output (no colors, for piping)
    Text,
    /// Machine-parseable JSON (one JSON object per line)
    Json,
    /// Pretty-printed with colors (for development)
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(format!(
                "Invalid log format: '{}'. Valid options: text, json, pretty",
                s
            )),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
            LogFormat::Pretty => write!(f, "pretty"),
        }
    }
}

/// Configuration for logging initialization
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: String,
    pub verbose: bool,
    /// Append log lines here as well as to stderr
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    /// Create a new logging configuration
    ///
    /// # Arguments
    ///
    /// * `format` - Log output format (text, json, or pretty)
    /// * `level` - Minimum log level (error, warn, info, debug, trace)
    /// * `verbose` - If true, defaults to debug level
    pub fn new(format: LogFormat, level: String, verbose: bool) -> Self {
        Self {
            format,
            level,
            verbose,
            file: None,
        }
    }

    pub fn with_file(mut self, file: Option<PathBuf>) -> Self {
        self.file = file;
        self
    }

    /// Build the stderr writer, teeing into the log file when one is set
    ///
    /// A log file that cannot be opened is reported on stderr and skipped.
    fn writer(&self) -> BoxMakeWriter {
        let Some(path) = self.file.as_ref() else {
            return BoxMakeWriter::new(std::io::stderr);
        };

        let directory = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let Some(file_name) = path.file_name() else {
            eprintln!("Log file path has no file name: {}", path.display());
            return BoxMakeWriter::new(std::io::stderr);
        };

        if let Err(e) = std::fs::create_dir_all(&directory) {
            eprintln!(
                "Cannot create log directory {}: {}",
                directory.display(),
                e
            );
            return BoxMakeWriter::new(std::io::stderr);
        }

        let appender = tracing_appender::rolling::never(directory, file_name);
        BoxMakeWriter::new(std::io::stderr.and(appender))
    }

    /// Initialize logging with the configured settings
    ///
    /// This should be called once at the start of your program.
    ///
    /// # Panics
    ///
    /// Panics if the logging subscriber has already been initialized
    pub fn init(&self) {
        use tracing_subscriber::EnvFilter;

        let filter = if self.verbose {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
        };

        let writer = self.writer();
        // Escape codes would end up in the log file
        let ansi = self.file.is_none();

        match self.format {
            LogFormat::Json => {
                tracing_subscriber::fmt()
                    .json()
                    .with_env_filter(filter)
                    .with_writer(writer)
                    .with_current_span(true)
                    .with_span_list(true)
                    .flatten_event(true)
                    .with_target(true)
                    .with_line_number(true)
                    .with_file(true)
                    .init();
            }
            LogFormat::Pretty => {
                tracing_subscriber::fmt()
                    .pretty()
                    .with_env_filter(filter)
                    .with_writer(writer)
                    .with_ansi(ansi)
                    .with_target(true)
                    .with_line_number(true)
                    .with_file(true)
                    .init();
            }
            LogFormat::Text => {
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(false)
                    .with_level(true)
                    .init();
            }
        }
    }
}

/// Initialize logging with default settings
///
/// Respects `QUOTECAST_LOG_FORMAT` and `QUOTECAST_LOG_LEVEL` environment variables.
/// Falls back to text format with info level if not set.
///
/// # Examples
///
/// ```bash
/// export QUOTECAST_LOG_FORMAT=json
/// export QUOTECAST_LOG_LEVEL=debug
/// quote-post
/// ```
pub fn init_default(verbose: bool, file: Option<PathBuf>) {
    let format = std::env::var("QUOTECAST_LOG_FORMAT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(LogFormat::Text);

    let level = std::env::var("QUOTECAST_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    LoggingConfig::new(format, level, verbose)
        .with_file(file)
        .init();
}
