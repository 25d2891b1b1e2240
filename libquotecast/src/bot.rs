//! One scheduled run: choose content, shape it, publish it, report it
//!
//! ```no_run
//! use libquotecast::bot::QuoteBot;
//! use libquotecast::catalog::ContentCatalog;
//! use libquotecast::history::MemoryStore;
//! use libquotecast::platforms::mock::MockPublisher;
//!
//! # async fn example() {
//! let catalog = ContentCatalog::new(vec!["Keep going.".to_string()], vec![]);
//! let bot = QuoteBot::new(catalog, MemoryStore::new(), MockPublisher::success());
//! let report = bot.run_once(None).await;
//! assert!(report.success);
//! # }
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Mutex;
use tracing::{error, info, warn};

use crate::catalog::ContentCatalog;
use crate::config::DEFAULT_POLL_PROBABILITY;
use crate::formatter::format_quote;
use crate::history::HistoryStore;
use crate::platforms::{Publisher, POLL_DURATION_MINUTES};
use crate::rotation::{choose_poll, decide_content_type, RotationSelector};
use crate::types::{Content, ContentKind, Poll, RunReport};

pub struct QuoteBot<S: HistoryStore, P: Publisher> {
    catalog: ContentCatalog,
    selector: RotationSelector<S>,
    publisher: P,
    poll_probability: f64,
    dry_run: bool,
    rng: Mutex<StdRng>,
}

impl<S: HistoryStore, P: Publisher> QuoteBot<S, P> {
    pub fn new(catalog: ContentCatalog, store: S, publisher: P) -> Self {
        Self {
            catalog,
            selector: RotationSelector::new(store),
            publisher,
            poll_probability: DEFAULT_POLL_PROBABILITY,
            dry_run: false,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_poll_probability(mut self, poll_probability: f64) -> Self {
        self.poll_probability = poll_probability;
        self
    }

    /// Select and format as usual but leave the history untouched
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Fix the random seed (reproducible runs in tests)
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    pub fn store(&self) -> &S {
        self.selector.store()
    }

    /// Run once: post a quote or poll
    ///
    /// `kind` forces the content type; otherwise it is drawn with the
    /// configured poll probability. Nothing here is fatal: publishing
    /// failures and a usage history that could not be saved are both
    /// reported in the returned `RunReport`.
    pub async fn run_once(&self, kind: Option<ContentKind>) -> RunReport {
        let (content, history_error) = self.choose_content(kind);

        let (message, result) = match &content {
            Content::Quote { text } => {
                let message = format_quote(text, &mut *self.rng());
                info!(kind = "quote", chars = message.chars().count(), "Posting quote");
                let result = self.publisher.post_text(&message).await;
                (message, result)
            }
            Content::Poll(poll) => {
                info!(kind = "poll", options = poll.options.len(), "Posting poll");
                let result = self
                    .publisher
                    .post_poll(&poll.question, &poll.options, POLL_DURATION_MINUTES)
                    .await;
                (poll.question.clone(), result)
            }
        };

        let report = match result {
            Ok(receipt) => {
                info!(
                    post_id = %receipt.post_id,
                    platform = %receipt.platform,
                    "Daily {} posted successfully",
                    content.kind()
                );
                RunReport {
                    content,
                    message,
                    success: true,
                    post_id: Some(receipt.post_id),
                    error: None,
                    history_error,
                    dry_run: self.dry_run,
                    ran_at: chrono::Utc::now().timestamp(),
                }
            }
            Err(e) => {
                error!(error = %e, "Failed to post daily {}", content.kind());
                RunReport {
                    content,
                    message,
                    success: false,
                    post_id: None,
                    error: Some(e.to_string()),
                    history_error,
                    dry_run: self.dry_run,
                    ran_at: chrono::Utc::now().timestamp(),
                }
            }
        };

        report
    }

    /// The content to post, plus the history save error if there was one
    fn choose_content(&self, kind: Option<ContentKind>) -> (Content, Option<String>) {
        let kind = match kind {
            Some(kind) => kind,
            None => decide_content_type(self.poll_probability, &mut *self.rng()),
        };

        if kind == ContentKind::Poll {
            if let Some(poll) = self.pick_poll() {
                return (Content::Poll(poll), None);
            }
            warn!("No polls available, posting a quote instead");
        }

        let selection =
            self.selector
                .next_quote(&self.catalog.quotes, &mut *self.rng(), !self.dry_run);
        if selection.reset {
            info!("Quote rotation was reset after exhausting the catalog");
        }

        (
            Content::Quote {
                text: selection.quote,
            },
            selection.save_error,
        )
    }

    fn pick_poll(&self) -> Option<Poll> {
        choose_poll(&self.catalog.polls, &mut *self.rng()).cloned()
    }

    fn rng(&self) -> std::sync::MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PublishError;
    use crate::history::MemoryStore;
    use crate::platforms::mock::MockPublisher;

    fn catalog() -> ContentCatalog {
        ContentCatalog::new(
            vec!["A".to_string(), "B".to_string()],
            vec![Poll::new("Tea or coffee?", &["Tea", "Coffee"])],
        )
    }

    #[tokio::test]
    async fn test_quote_run_posts_and_records() {
        let store = MemoryStore::with_history(&["A"]);
        let bot = QuoteBot::new(catalog(), store.clone(), MockPublisher::success()).with_seed(1);

        let report = bot.run_once(Some(ContentKind::Quote)).await;

        assert!(report.success);
        assert_eq!(report.content, Content::Quote { text: "B".to_string() });
        assert!(report.message.starts_with('B'));
        assert_eq!(bot.publisher().posted_texts(), vec![report.message.clone()]);
        assert_eq!(store.snapshot().last(), Some("B"));
    }

    #[tokio::test]
    async fn test_poll_run_uses_fixed_duration_and_skips_history() {
        let store = MemoryStore::new();
        let bot = QuoteBot::new(catalog(), store.clone(), MockPublisher::success()).with_seed(2);

        let report = bot.run_once(Some(ContentKind::Poll)).await;

        assert!(report.success);
        assert_eq!(report.kind(), ContentKind::Poll);
        assert_eq!(report.message, "Tea or coffee?");

        let polls = bot.publisher().posted_polls();
        assert_eq!(polls.len(), 1);
        assert_eq!(polls[0].1, POLL_DURATION_MINUTES);
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_publish_still_marks_quote_used() {
        let store = MemoryStore::new();
        let publisher = MockPublisher::failing(PublishError::Forbidden("duplicate".to_string()));
        let bot = QuoteBot::new(catalog(), store.clone(), publisher).with_seed(3);

        let report = bot.run_once(Some(ContentKind::Quote)).await;

        assert!(!report.success);
        assert!(report.error.unwrap().contains("duplicate"));
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_poll_without_polls_falls_back_to_quote() {
        let catalog = ContentCatalog::new(vec!["Only".to_string()], vec![]);
        let bot = QuoteBot::new(catalog, MemoryStore::new(), MockPublisher::success());

        let report = bot.run_once(Some(ContentKind::Poll)).await;
        assert_eq!(report.kind(), ContentKind::Quote);
    }

    #[tokio::test]
    async fn test_dry_run_leaves_history_alone() {
        let store = MemoryStore::new();
        let bot = QuoteBot::new(catalog(), store.clone(), MockPublisher::success())
            .with_dry_run(true)
            .with_seed(4);

        let report = bot.run_once(Some(ContentKind::Quote)).await;
        assert!(report.dry_run);
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_probability_zero_never_polls() {
        let bot = QuoteBot::new(catalog(), MemoryStore::new(), MockPublisher::success())
            .with_poll_probability(0.0)
            .with_seed(5);

        for _ in 0..10 {
            let report = bot.run_once(None).await;
            assert_eq!(report.kind(), ContentKind::Quote);
        }
        assert!(bot.publisher().posted_polls().is_empty());
    }

    struct UnwritableStore;

    impl HistoryStore for UnwritableStore {
        fn load(&self) -> crate::history::UsageHistory {
            crate::history::UsageHistory::new()
        }

        fn save(&self, _history: &crate::history::UsageHistory) -> crate::error::Result<()> {
            Err(crate::error::StoreError::Io {
                path: "used_quotes.json".to_string(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            }
            .into())
        }
    }

    #[tokio::test]
    async fn test_history_save_failure_still_posts() {
        let bot = QuoteBot::new(catalog(), UnwritableStore, MockPublisher::success()).with_seed(6);

        let report = bot.run_once(Some(ContentKind::Quote)).await;

        assert!(report.success);
        assert_eq!(bot.publisher().posted_texts(), vec![report.message.clone()]);
        assert!(report.history_error.unwrap().contains("used_quotes.json"));
    }

    #[tokio::test]
    async fn test_successful_save_leaves_history_error_empty() {
        let bot = QuoteBot::new(catalog(), MemoryStore::new(), MockPublisher::success()).with_seed(7);

        let report = bot.run_once(Some(ContentKind::Quote)).await;
        assert!(report.history_error.is_none());
    }
}
