//! Site-Scout: an interactive site crawler for content migrations
//!
//! This crate implements a sequential, frontier-driven crawler: given a seed
//! URL it discovers and visits same-site pages through a same-origin proxy,
//! harvests their outbound links, and produces a structured report of pages
//! visited, links found, and failures encountered.

pub mod config;
pub mod crawler;
pub mod report;
pub mod session;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Seed URL is empty")]
    EmptySeed,

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

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

/// Result type alias for Site-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use report::{CrawlObserver, CrawlRow, PageStatus, Report};
pub use session::{CrawlSession, Frontier};
pub use url::{proxy_setup, CrawlTarget, ProxySetup};
