//! Publisher abstraction and implementations
//!
//! The bot only needs two capabilities from a platform: post a text status
//! and post a poll. Failures come back as [`PublishError`]; nothing here
//! retries.
//!
//! # Examples
//!
//! ```no_run
//! use libquotecast::platforms::{Publisher, twitter::TwitterPublisher};
//! use libquotecast::config::{Credentials, TwitterConfig};
//!
//! # async fn example() -> libquotecast::Result<()> {
//! let credentials = Credentials::from_env()?;
//! let publisher = TwitterPublisher::new(&TwitterConfig::default(), credentials)?;
//!
//! let receipt = publisher.post_text("Keep going.").await?;
//! println!("Posted {}", receipt.post_id);
//! # Ok(())
//! # }
//! ```
//!
//! [`PublishError`]: crate::error::PublishError

use async_trait::async_trait;

use crate::error::Result;
use crate::types::PostReceipt;

pub mod dry_run;
pub mod mock;
pub mod oauth;
pub mod twitter;

/// Voting window used for every poll (24 hours)
pub const POLL_DURATION_MINUTES: u32 = 1440;

/// A social platform the bot can post to
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Lowercase platform identifier (e.g. "twitter")
    fn name(&self) -> &str;

    /// Post a plain text status
    ///
    /// # Errors
    ///
    /// Returns a `PublishError` variant describing why the platform refused
    /// or could not be reached.
    async fn post_text(&self, message: &str) -> Result<PostReceipt>;

    /// Post a poll with `options` open for `duration_minutes`
    async fn post_poll(
        &self,
        question: &str,
        options: &[String],
        duration_minutes: u32,
    ) -> Result<PostReceipt>;
}
