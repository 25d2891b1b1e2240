//! Error types for Quotecast

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuotecastError>;

#[derive(Error, Debug)]
pub enum QuotecastError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl QuotecastError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            QuotecastError::InvalidInput(_) => 3,
            QuotecastError::Config(_) => 2,
            QuotecastError::Publish(_) => 1,
            QuotecastError::Store(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Missing Twitter API credential: {0} is not set")]
    MissingCredential(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode {path}: {source}")]
    Encode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug, Clone)]
pub enum PublishError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Post rejected: {0}")]
    Rejected(String),
}
