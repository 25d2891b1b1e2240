//! Twitter/X publisher using the v2 `POST /2/tweets` endpoint
//!
//! Requests are signed with OAuth 1.0a user-context credentials. There is no
//! retry loop: a failed request is reported once and the run ends.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::{Credentials, TwitterConfig};
use crate::error::{PublishError, Result};
use crate::platforms::oauth::OAuthSigner;
use crate::platforms::Publisher;
use crate::types::PostReceipt;

const TWEETS_ENDPOINT: &str = "/2/tweets";

#[derive(Debug, Serialize)]
struct CreateTweetRequest<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    poll: Option<TweetPoll<'a>>,
}

#[derive(Debug, Serialize)]
struct TweetPoll<'a> {
    options: &'a [String],
    duration_minutes: u32,
}

#[derive(Debug, Deserialize)]
struct CreateTweetResponse {
    data: CreatedTweet,
}

#[derive(Debug, Deserialize)]
struct CreatedTweet {
    id: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

pub struct TwitterPublisher {
    client: Client,
    tweets_url: String,
    signer: OAuthSigner,
}

impl TwitterPublisher {
    pub fn new(config: &TwitterConfig, credentials: Credentials) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(format!("quotecast/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PublishError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            tweets_url: format!("{}{}", config.api_url.trim_end_matches('/'), TWEETS_ENDPOINT),
            signer: OAuthSigner::new(credentials),
        })
    }

    async fn create_tweet(&self, request: &CreateTweetRequest<'_>) -> Result<PostReceipt> {
        let auth_header = self.signer.sign("POST", &self.tweets_url, &[])?;

        let response = self
            .client
            .post(&self.tweets_url)
            .header(reqwest::header::AUTHORIZATION, auth_header)
            .json(request)
            .send()
            .await
            .map_err(|e| PublishError::Network(format!("Error posting tweet: {}", e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| PublishError::Network(format!("Error reading response: {}", e)))?;

        if !status.is_success() {
            return Err(map_status_error(status, &body).into());
        }

        let created: CreateTweetResponse = serde_json::from_slice(&body).map_err(|e| {
            PublishError::Rejected(format!("Unexpected response from Twitter: {}", e))
        })?;
        debug!(tweet_id = %created.data.id, "Tweet created");

        Ok(PostReceipt {
            post_id: created.data.id,
            platform: self.name().to_string(),
        })
    }
}

/// Map a non-2xx response to the matching `PublishError`
fn map_status_error(status: StatusCode, body: &[u8]) -> PublishError {
    let parsed: ErrorResponse = serde_json::from_slice(body).unwrap_or_default();
    let message = parsed
        .detail
        .or(parsed.title)
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string());
    let message = format!("HTTP {}: {}", status.as_u16(), message);

    match status {
        StatusCode::UNAUTHORIZED => PublishError::Authentication(message),
        StatusCode::FORBIDDEN => PublishError::Forbidden(message),
        StatusCode::TOO_MANY_REQUESTS => PublishError::RateLimit(message),
        _ => PublishError::Rejected(message),
    }
}

#[async_trait]
impl Publisher for TwitterPublisher {
    fn name(&self) -> &str {
        "twitter"
    }

    #[instrument(skip(self, message), fields(chars = message.chars().count()))]
    async fn post_text(&self, message: &str) -> Result<PostReceipt> {
        self.create_tweet(&CreateTweetRequest {
            text: message,
            poll: None,
        })
        .await
    }

    #[instrument(skip(self, question, options), fields(options = options.len()))]
    async fn post_poll(
        &self,
        question: &str,
        options: &[String],
        duration_minutes: u32,
    ) -> Result<PostReceipt> {
        self.create_tweet(&CreateTweetRequest {
            text: question,
            poll: Some(TweetPoll {
                options,
                duration_minutes,
            }),
        })
        .await
    }
}
