//! Mock publisher for testing
//!
//! Configurable to succeed or fail with a chosen `PublishError`, and records
//! every text and poll it receives so tests can assert on what the bot sent
//! without network access.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::error::{PublishError, Result};
use crate::platforms::Publisher;
use crate::types::{Poll, PostReceipt};

/// Configuration for mock publisher behavior
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Platform name reported in receipts
    pub name: String,

    /// Error to return instead of posting
    pub failure: Option<PublishError>,

    /// Texts that have been posted (for verification)
    pub posted_texts: Arc<Mutex<Vec<String>>>,

    /// Polls that have been posted, with their duration
    pub posted_polls: Arc<Mutex<Vec<(Poll, u32)>>>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            failure: None,
            posted_texts: Arc::new(Mutex::new(Vec::new())),
            posted_polls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

/// Mock publisher for testing
#[derive(Debug, Clone)]
pub struct MockPublisher {
    config: MockConfig,
}

impl MockPublisher {
    pub fn new(config: MockConfig) -> Self {
        Self { config }
    }

    /// Create a mock publisher that always succeeds
    pub fn success() -> Self {
        Self::new(MockConfig::default())
    }

    /// Create a mock publisher that fails every post with `error`
    pub fn failing(error: PublishError) -> Self {
        Self::new(MockConfig {
            failure: Some(error),
            ..Default::default()
        })
    }

    /// Get all texts that were posted
    pub fn posted_texts(&self) -> Vec<String> {
        self.config.posted_texts.lock().unwrap().clone()
    }

    /// Get all polls that were posted
    pub fn posted_polls(&self) -> Vec<(Poll, u32)> {
        self.config.posted_polls.lock().unwrap().clone()
    }

    /// Total number of successful posts of either kind
    pub fn post_count(&self) -> usize {
        self.posted_texts().len() + self.posted_polls().len()
    }

    fn receipt(&self) -> PostReceipt {
        PostReceipt {
            post_id: format!("{}:mock-{}", self.config.name, self.post_count()),
            platform: self.config.name.clone(),
        }
    }
}

#[async_trait]
impl Publisher for MockPublisher {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn post_text(&self, message: &str) -> Result<PostReceipt> {
        if let Some(error) = self.config.failure.clone() {
            return Err(error.into());
        }

        self.config
            .posted_texts
            .lock()
            .unwrap()
            .push(message.to_string());
        Ok(self.receipt())
    }

    async fn post_poll(
        &self,
        question: &str,
        options: &[String],
        duration_minutes: u32,
    ) -> Result<PostReceipt> {
        if let Some(error) = self.config.failure.clone() {
            return Err(error.into());
        }

        let poll = Poll {
            question: question.to_string(),
            options: options.to_vec(),
        };
        self.config
            .posted_polls
            .lock()
            .unwrap()
            .push((poll, duration_minutes));
        Ok(self.receipt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_success() {
        let publisher = MockPublisher::success();
        assert_eq!(publisher.name(), "mock");

        let receipt = publisher.post_text("Test content").await.unwrap();
        assert_eq!(receipt.post_id, "mock:mock-1");
        assert_eq!(publisher.posted_texts(), vec!["Test content"]);
    }

    #[tokio::test]
    async fn test_mock_records_polls() {
        let publisher = MockPublisher::success();
        let options = vec!["Yes".to_string(), "No".to_string()];

        publisher.post_poll("Ready?", &options, 1440).await.unwrap();

        let polls = publisher.posted_polls();
        assert_eq!(polls.len(), 1);
        assert_eq!(polls[0].0.question, "Ready?");
        assert_eq!(polls[0].1, 1440);
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let publisher = MockPublisher::failing(PublishError::RateLimit("slow down".to_string()));

        let err = publisher.post_text("Test").await.unwrap_err();
        assert!(err.to_string().contains("slow down"));
        assert_eq!(publisher.post_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_clones_share_records() {
        let publisher = MockPublisher::success();
        let observer = publisher.clone();

        publisher.post_text("shared").await.unwrap();
        assert_eq!(observer.posted_texts(), vec!["shared"]);
    }
}
