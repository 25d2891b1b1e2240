//! Core types for Quotecast

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Maximum number of options Twitter accepts on a poll
pub const MAX_POLL_OPTIONS: usize = 4;

/// Minimum number of options on a poll
pub const MIN_POLL_OPTIONS: usize = 2;

/// Maximum length of a single poll option
pub const MAX_POLL_OPTION_CHARS: usize = 25;

/// A static poll: a question with 2-4 ordered options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    pub question: String,
    pub options: Vec<String>,
}

impl Poll {
    pub fn new(question: impl Into<String>, options: &[&str]) -> Self {
        Self {
            question: question.into(),
            options: options.iter().map(|o| o.to_string()).collect(),
        }
    }

    /// Check the option count and option length constraints
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.question.trim().is_empty() {
            return Err("poll question cannot be empty".to_string());
        }

        let count = self.options.len();
        if !(MIN_POLL_OPTIONS..=MAX_POLL_OPTIONS).contains(&count) {
            return Err(format!(
                "poll must have {}-{} options (got {})",
                MIN_POLL_OPTIONS, MAX_POLL_OPTIONS, count
            ));
        }

        if let Some(option) = self
            .options
            .iter()
            .find(|o| o.trim().is_empty() || o.chars().count() > MAX_POLL_OPTION_CHARS)
        {
            return Err(format!(
                "poll option '{}' must be 1-{} characters",
                option, MAX_POLL_OPTION_CHARS
            ));
        }

        Ok(())
    }
}

/// What a single run posts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Content {
    Quote { text: String },
    Poll(Poll),
}

impl Content {
    pub fn kind(&self) -> ContentKind {
        match self {
            Content::Quote { .. } => ContentKind::Quote,
            Content::Poll(_) => ContentKind::Poll,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Quote,
    Poll,
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quote" => Ok(ContentKind::Quote),
            "poll" => Ok(ContentKind::Poll),
            _ => Err(format!(
                "Invalid content kind: '{}'. Valid options: quote, poll",
                s
            )),
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentKind::Quote => write!(f, "quote"),
            ContentKind::Poll => write!(f, "poll"),
        }
    }
}

/// Publisher acknowledgement for a successful post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostReceipt {
    pub post_id: String,
    pub platform: String,
}

/// Outcome of one bot run, printed by `quote-post`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub content: Content,
    /// The exact text sent to the publisher (formatted quote or poll question)
    pub message: String,
    pub success: bool,
    pub post_id: Option<String>,
    pub error: Option<String>,
    /// Set when the usage history could not be saved (the post still went ahead)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_error: Option<String>,
    pub dry_run: bool,
    pub ran_at: i64,
}

impl RunReport {
    pub fn kind(&self) -> ContentKind {
        self.content.kind()
    }
}
