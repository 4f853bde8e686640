//! Crawl controller
//!
//! Drives the frontier loop as an explicit state machine: pop a target,
//! render it, extract links or classify the failure, record the row, repeat
//! until the frontier is empty. Exactly one page is ever in flight; the
//! session is owned by the controller for the run's duration and handed
//! back as the report when the run ends.

use crate::config::Config;
use crate::crawler::classifier::FailureClassifier;
use crate::crawler::extractor::extract_links;
use crate::crawler::renderer::PageRenderer;
use crate::report::{CrawlObserver, CrawlRow, PageStatus, Report};
use crate::session::CrawlSession;
use crate::url::{proxy_setup, CrawlTarget};
use crate::{Result, ScoutError};
use std::fmt;
use std::time::Instant;

/// Where the controller currently is in the crawl state machine
///
/// `Idle -> Running -> (Rendering -> Extracting | Classifying -> Recorded)*
/// -> Idle`, one cycle per target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No run in progress (also the terminal state when the frontier empties)
    Idle,
    /// A run is active and the next target is about to be dequeued
    Running,
    /// The current target is loading into the rendering surface
    Rendering,
    /// The rendered document is being link-audited
    Extracting,
    /// The render failed and the failure probe is in flight
    Classifying,
    /// The current target's row has been appended
    Recorded,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Rendering => "rendering",
            Self::Extracting => "extracting",
            Self::Classifying => "classifying",
            Self::Recorded => "recorded",
        };
        f.write_str(name)
    }
}

/// Sequential crawl driver
pub struct Controller<O: CrawlObserver> {
    proxy_origin: String,
    renderer: PageRenderer,
    classifier: FailureClassifier,
    session: CrawlSession,
    phase: Phase,
    observer: O,
}

impl<O: CrawlObserver> Controller<O> {
    /// Builds a controller in the `Idle` phase
    pub fn new(config: &Config, observer: O) -> Result<Self> {
        let renderer = PageRenderer::new(&config.crawl)?;
        let classifier = FailureClassifier::new(config.crawl.render_timeout_ms)?;

        Ok(Self {
            proxy_origin: config.proxy.origin.clone(),
            renderer,
            classifier,
            session: CrawlSession::new(),
            phase: Phase::Idle,
            observer,
        })
    }

    /// The controller's current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The session's rows so far, consumable at any time
    pub fn rows(&self) -> &[CrawlRow] {
        self.session.rows()
    }

    /// Running visited count
    pub fn crawled(&self) -> usize {
        self.session.crawled()
    }

    /// Starts a run: resets the session, enqueues the seeds, enters `Running`
    ///
    /// An empty seed list (or one of only blank strings) is rejected before
    /// anything is touched.
    pub fn start(&mut self, seeds: &[String]) -> Result<()> {
        let seeds: Vec<&str> = seeds
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        if seeds.is_empty() {
            return Err(ScoutError::EmptySeed);
        }

        self.session = CrawlSession::new();
        for seed in seeds {
            let target = CrawlTarget::new(seed)?;
            self.session.enqueue(target.as_str().to_string());
        }

        tracing::info!("Starting crawl with {} seed URL(s)", self.session.frontier_len());
        self.phase = Phase::Running;
        Ok(())
    }

    /// Processes one target: dequeue, render, extract or classify, record
    ///
    /// Returns true while the run continues; false once the frontier is
    /// empty (or no run was started), after which the controller is `Idle`.
    pub async fn step(&mut self) -> Result<bool> {
        if self.phase == Phase::Idle {
            return Ok(false);
        }

        let current = match self.session.dequeue() {
            Some(url) => url,
            None => {
                tracing::info!("Frontier is empty, crawl complete");
                self.phase = Phase::Idle;
                return Ok(false);
            }
        };

        let row = self.visit(&current).await;
        self.phase = Phase::Recorded;
        self.session.record(row.clone());
        self.observer.page_crawled(&row, self.session.crawled());

        self.phase = Phase::Running;
        Ok(true)
    }

    /// Renders one target and produces its row; failures never escape, they
    /// become failure rows so the run always moves on.
    async fn visit(&mut self, current: &str) -> CrawlRow {
        self.phase = Phase::Rendering;

        let target = match CrawlTarget::new(current) {
            Ok(target) => target,
            Err(e) => {
                tracing::error!("Cannot crawl {} - bad target URL: {}", current, e);
                return CrawlRow::failure(
                    current.to_string(),
                    PageStatus::ProbeFailed(e.to_string()),
                );
            }
        };

        let setup = match proxy_setup(target.url(), &self.proxy_origin) {
            Ok(setup) => setup,
            Err(e) => {
                tracing::error!("Cannot crawl {} - proxy rewrite failed: {}", current, e);
                return CrawlRow::failure(
                    current.to_string(),
                    PageStatus::ProbeFailed(e.to_string()),
                );
            }
        };

        let surface = self.renderer.attach(&setup).await;

        let row = match surface.document() {
            Ok(body) => {
                self.phase = Phase::Extracting;
                let audit = extract_links(body, current, &setup, &mut self.session);
                tracing::debug!(
                    "{}: {} links, {} to follow",
                    current,
                    audit.nb_links,
                    audit.nb_links_to_follow()
                );
                CrawlRow::success(current.to_string(), audit)
            }
            Err(denied) => {
                self.phase = Phase::Classifying;
                tracing::warn!("Cannot introspect {}: {}", current, denied);
                let status = self
                    .classifier
                    .classify(surface.original_url(), surface.proxied_url())
                    .await;
                CrawlRow::failure(current.to_string(), status)
            }
        };

        surface.detach();
        row
    }

    /// Runs a crawl to completion and hands back the report
    pub async fn run(mut self, seeds: &[String]) -> Result<Report> {
        self.start(seeds)?;
        let started = Instant::now();

        while self.step().await? {
            let crawled = self.session.crawled();
            if crawled % 10 == 0 {
                let rate = crawled as f64 / started.elapsed().as_secs_f64();
                tracing::info!(
                    "Progress: {} pages crawled, {} in frontier, {:.2} pages/sec",
                    crawled,
                    self.session.frontier_len(),
                    rate
                );
            }
        }

        tracing::info!(
            "Crawl completed: {} pages crawled in {:?}",
            self.session.crawled(),
            started.elapsed()
        );
        Ok(self.session.into_report())
    }
}
