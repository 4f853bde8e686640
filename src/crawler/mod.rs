//! Crawl engine
//!
//! This module contains the core crawl subsystem:
//! - Page rendering through the same-origin proxy
//! - Link extraction and scope classification
//! - Failure probing and classification
//! - The controller state machine driving the frontier loop

mod classifier;
mod controller;
mod extractor;
mod renderer;

pub use classifier::FailureClassifier;
pub use controller::{Controller, Phase};
pub use extractor::extract_links;
pub use renderer::{AccessDenied, PageRenderer, RenderSurface};

use crate::config::Config;
use crate::report::{CrawlObserver, Report};
use crate::Result;

/// Runs a complete crawl from the given seeds
///
/// This is the main entry point: it builds a controller, resets a session,
/// drives the frontier to exhaustion, and returns the finished report. The
/// observer receives one notification per visited URL.
///
/// # Example
///
/// ```no_run
/// use site_scout::config::load_config;
/// use site_scout::crawler::run_crawl;
/// use site_scout::report::NoopObserver;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let seeds = vec!["https://example.com/".to_string()];
/// let report = run_crawl(&config, &seeds, NoopObserver).await?;
/// println!("Visited {} pages", report.crawled());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl<O: CrawlObserver>(
    config: &Config,
    seeds: &[String],
    observer: O,
) -> Result<Report> {
    let controller = Controller::new(config, observer)?;
    controller.run(seeds).await
}
