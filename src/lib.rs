//! Wikisift: a secrets scanner for Confluence-style wikis
//!
//! This crate crawls every space and page of a remote wiki through its REST
//! API, optionally walking historical page versions, and scans the retrieved
//! bodies for accidentally committed secrets, aggregating findings into a
//! report.

pub mod client;
pub mod config;
pub mod crawler;
pub mod detect;
pub mod report;
pub mod scan;

use thiserror::Error;

/// Main error type for wikisift operations
#[derive(Debug, Error)]
pub enum SiftError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised by individual requests against the remote wiki API.
///
/// The taxonomy matters for crawl behavior: [`ClientError::Auth`] is the only
/// fatal class (it halts scheduling of new work), everything else is recorded
/// against the smallest affected unit and does not abort siblings or parents.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("request timeout for {url}")]
    Timeout { url: String },

    #[error("authentication rejected for {url} (HTTP {status})")]
    Auth { url: String, status: u16 },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },
}

impl ClientError {
    /// Whether this error should halt scheduling of new crawl work.
    ///
    /// Only credential rejection qualifies: retrying other spaces or pages
    /// with the same bad credentials repeats the failure on every request
    /// without producing new information.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ClientError::Auth { .. })
    }

    /// Short label for the error class, used in failure records.
    pub fn class(&self) -> &'static str {
        match self {
            ClientError::Transport { .. } => "transport",
            ClientError::Timeout { .. } => "timeout",
            ClientError::Auth { .. } => "auth",
            ClientError::Status { .. } => "status",
            ClientError::Decode { .. } => "decode",
        }
    }
}

/// Result type alias for wikisift operations
pub type Result<T> = std::result::Result<T, SiftError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use client::{ConfluenceClient, Page, Space};
pub use config::Config;
pub use crawler::{ContentItem, Coordinator, CrawlFailure, CrawlOutcome, FailureScope};
pub use detect::{Detector, Finding, RegexDetector};
pub use report::Report;
pub use scan::run_scan;
