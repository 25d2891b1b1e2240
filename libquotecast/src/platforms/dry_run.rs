//! Publisher that logs instead of posting

use async_trait::async_trait;
use tracing::info;

use crate::error::Result;
use crate::platforms::Publisher;
use crate::types::PostReceipt;

#[derive(Debug, Clone, Default)]
pub struct DryRunPublisher;

impl DryRunPublisher {
    pub fn new() -> Self {
        Self
    }

    fn receipt(&self) -> PostReceipt {
        PostReceipt {
            post_id: "dry-run".to_string(),
            platform: self.name().to_string(),
        }
    }
}

#[async_trait]
impl Publisher for DryRunPublisher {
    fn name(&self) -> &str {
        "dry-run"
    }

    async fn post_text(&self, message: &str) -> Result<PostReceipt> {
        info!(chars = message.chars().count(), "Dry run, not posting text");
        Ok(self.receipt())
    }

    async fn post_poll(
        &self,
        question: &str,
        options: &[String],
        duration_minutes: u32,
    ) -> Result<PostReceipt> {
        info!(
            options = options.len(),
            duration_minutes, "Dry run, not posting poll: {}", question
        );
        Ok(self.receipt())
    }
}
