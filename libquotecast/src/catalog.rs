//! Read-only content catalog: quotes and polls
//!
//! The catalog file is JSON of the form
//! `{"quotes": ["..."], "polls": [{"question": "...", "options": ["..."]}]}`.
//! `polls` is optional; without it the built-in poll set is used. Loading
//! never fails: a missing or malformed file yields an empty quote list and
//! the rotation selector falls back to its sentinel message.

use serde::Deserialize;
use std::path::Path;
use tracing::{debug, error, warn};

use crate::types::Poll;

#[derive(Debug, Clone, Default)]
pub struct ContentCatalog {
    pub quotes: Vec<String>,
    pub polls: Vec<Poll>,
}

#[derive(Deserialize)]
struct CatalogFile {
    quotes: Vec<String>,
    #[serde(default)]
    polls: Option<Vec<Poll>>,
}

impl ContentCatalog {
    pub fn new(quotes: Vec<String>, polls: Vec<Poll>) -> Self {
        Self { quotes, polls }
    }

    /// Load the catalog at `path`
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                error!("Quotes file not found: {}", path.display());
                return Self::new(Vec::new(), builtin_polls());
            }
            Err(e) => {
                error!("Failed to read quotes file {}: {}", path.display(), e);
                return Self::new(Vec::new(), builtin_polls());
            }
        };

        match Self::parse(&content) {
            Ok(catalog) => {
                debug!(
                    quotes = catalog.quotes.len(),
                    polls = catalog.polls.len(),
                    "Loaded content catalog from {}",
                    path.display()
                );
                catalog
            }
            Err(e) => {
                error!("Error parsing quotes file {}: {}", path.display(), e);
                Self::new(Vec::new(), builtin_polls())
            }
        }
    }

    /// Parse catalog JSON
    ///
    /// Blank quotes and exact duplicates are dropped (identity is the full
    /// text), as are polls that break the option rules.
    pub fn parse(content: &str) -> serde_json::Result<Self> {
        let file: CatalogFile = serde_json::from_str(content)?;

        let mut quotes: Vec<String> = Vec::with_capacity(file.quotes.len());
        for quote in file.quotes {
            if quote.trim().is_empty() || quotes.contains(&quote) {
                continue;
            }
            quotes.push(quote);
        }

        let polls = match file.polls {
            Some(polls) => polls
                .into_iter()
                .filter(|poll| match poll.validate() {
                    Ok(()) => true,
                    Err(reason) => {
                        warn!("Skipping poll '{}': {}", poll.question, reason);
                        false
                    }
                })
                .collect(),
            None => builtin_polls(),
        };

        Ok(Self { quotes, polls })
    }
}

/// The hand-authored poll set used when the catalog file has none
pub fn builtin_polls() -> Vec<Poll> {
    vec![
        Poll::new(
            "What keeps you motivated on tough days?",
            &["My goals", "My family", "Proving doubters wrong", "Small wins"],
        ),
        Poll::new(
            "When do you do your best work?",
            &["Early morning", "Afternoon", "Late night"],
        ),
        Poll::new(
            "What's your biggest productivity killer?",
            &["Social media", "Meetings", "Procrastination", "Lack of sleep"],
        ),
        Poll::new(
            "How do you recharge after a setback?",
            &["Exercise", "Talk to friends", "Rest and reflect", "Dive back in"],
        ),
        Poll::new(
            "Which habit would change your life most?",
            &["Daily reading", "Regular exercise", "Waking up early", "Journaling"],
        ),
        Poll::new(
            "How do you set your goals?",
            &["Yearly", "Monthly", "Weekly", "I don't set goals"],
        ),
        Poll::new(
            "What matters most for success?",
            &["Hard work", "Consistency", "Talent", "Luck"],
        ),
        Poll::new(
            "Are you a planner or a go-with-the-flow person?",
            &["Planner", "Go with the flow", "A bit of both"],
        ),
    ]
}
