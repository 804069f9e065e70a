//! Gossamer: a small, pattern-driven web crawler
//!
//! Gossamer walks a site's hyperlink graph starting from a seed URL,
//! deduplicating and prioritizing discovered links in a crawl frontier,
//! fetching pages with a bounded pool of concurrent workers, and routing
//! matched pages to user-supplied handlers.

pub mod classify;
pub mod config;
pub mod crawler;
pub mod frontier;
pub mod handler;
pub mod url;

use thiserror::Error;

/// Main error type for Gossamer operations
#[derive(Debug, Error)]
pub enum GossamerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Frontier error: {0}")]
    Frontier(#[from] frontier::FrontierError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Unknown handler id in callback patterns: {0}")]
    UnknownHandler(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid link pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Gossamer operations
pub type Result<T> = std::result::Result<T, GossamerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use classify::{Classification, LinkClassifier};
pub use config::Settings;
pub use crawler::{CrawlStats, Crawler, Transport};
pub use frontier::{Frontier, FrontierStore, LinkPriority, RecordState, UrlRecord};
pub use handler::{CallbackRouter, HandlerRegistry, Page, PageHandler};
