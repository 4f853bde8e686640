//! Crawl session state
//!
//! One `CrawlSession` holds everything a single run owns: the frontier of
//! URLs awaiting a visit, the set of URLs whose processing is complete, and
//! the accumulated report rows. The session is created when a run starts,
//! owned exclusively by the controller for the run's duration, and discarded
//! (or handed back as a report) when the frontier empties. Nothing persists
//! across runs.

mod frontier;

pub use frontier::Frontier;

use crate::report::{CrawlRow, Report};
use std::collections::HashSet;

/// Per-run crawl state: frontier, visited set, and report rows
#[derive(Debug)]
pub struct CrawlSession {
    frontier: Frontier,
    visited: HashSet<String>,
    report: Report,
}

impl CrawlSession {
    /// Creates an empty session
    pub fn new() -> Self {
        Self {
            frontier: Frontier::new(),
            visited: HashSet::new(),
            report: Report::new(),
        }
    }

    /// Enqueues a URL for a future visit
    ///
    /// Returns false (and does nothing) if the URL is already in the
    /// frontier or has already been visited, so no URL is ever queued or
    /// visited twice in one run.
    pub fn enqueue(&mut self, url: String) -> bool {
        if self.visited.contains(&url) {
            return false;
        }
        self.frontier.push(url)
    }

    /// Removes and returns the most recently enqueued URL (LIFO)
    ///
    /// LIFO makes the traversal depth-first in practice: a page's newly
    /// discovered links are visited before siblings already queued.
    pub fn dequeue(&mut self) -> Option<String> {
        self.frontier.pop()
    }

    /// Records the outcome of one visited URL
    ///
    /// The visited set is updated together with the row append, so no reader
    /// ever observes a URL as visited before its row exists.
    pub fn record(&mut self, row: CrawlRow) {
        self.visited.insert(row.url.clone());
        self.report.push(row);
    }

    /// Number of URLs visited so far
    pub fn crawled(&self) -> usize {
        self.report.crawled()
    }

    /// Number of URLs still awaiting a visit
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// The rows recorded so far, in visitation order
    pub fn rows(&self) -> &[CrawlRow] {
        self.report.rows()
    }

    /// Stamps the report finished and hands it back, consuming the session
    pub fn into_report(mut self) -> Report {
        self.report.finish();
        self.report
    }
}

impl Default for CrawlSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::LinkAudit;

    fn success_row(url: &str) -> CrawlRow {
        CrawlRow::success(url.to_string(), LinkAudit::default())
    }

    #[test]
    fn test_enqueue_dedups_against_frontier() {
        let mut session = CrawlSession::new();
        assert!(session.enqueue("https://example.com/a".to_string()));
        assert!(!session.enqueue("https://example.com/a".to_string()));
        assert_eq!(session.frontier_len(), 1);
    }

    #[test]
    fn test_enqueue_dedups_against_visited() {
        let mut session = CrawlSession::new();
        session.record(success_row("https://example.com/a"));
        assert!(!session.enqueue("https://example.com/a".to_string()));
        assert_eq!(session.frontier_len(), 0);
    }

    #[test]
    fn test_dequeue_is_lifo() {
        let mut session = CrawlSession::new();
        session.enqueue("https://example.com/a".to_string());
        session.enqueue("https://example.com/b".to_string());
        session.enqueue("https://example.com/c".to_string());

        assert_eq!(session.dequeue().as_deref(), Some("https://example.com/c"));
        assert_eq!(session.dequeue().as_deref(), Some("https://example.com/b"));
        assert_eq!(session.dequeue().as_deref(), Some("https://example.com/a"));
        assert_eq!(session.dequeue(), None);
    }

    #[test]
    fn test_record_updates_count_with_row() {
        let mut session = CrawlSession::new();
        assert_eq!(session.crawled(), 0);
        session.record(success_row("https://example.com/a"));
        assert_eq!(session.crawled(), 1);
        assert_eq!(session.rows().len(), 1);
    }

    #[test]
    fn test_into_report_stamps_finish() {
        let mut session = CrawlSession::new();
        session.record(success_row("https://example.com/a"));
        let report = session.into_report();
        assert!(report.finished_at().is_some());
        assert_eq!(report.crawled(), 1);
    }
}
