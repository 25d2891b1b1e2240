//! Quotecast - scheduled motivational quotes and polls for Twitter/X
//!
//! This library holds everything a single cron-driven run needs: the content
//! catalog, the de-duplicating quote rotation, the post formatter, and the
//! publisher that talks to the platform.

pub mod bot;
pub mod catalog;
pub mod config;
pub mod error;
pub mod formatter;
pub mod history;
pub mod logging;
pub mod platforms;
pub mod rotation;
pub mod types;

// Re-export commonly used types
pub use bot::QuoteBot;
pub use catalog::ContentCatalog;
pub use config::{Config, Credentials};
pub use error::{QuotecastError, Result};
pub use history::{HistoryStore, JsonFileStore, UsageHistory};
pub use types::{Content, ContentKind, Poll, PostReceipt, RunReport};
