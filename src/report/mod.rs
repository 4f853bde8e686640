//! Crawl report model
//!
//! This module holds the per-URL outcome taxonomy, the report row shape, the
//! accumulator the controller appends to, and the observer hook a
//! collaborator can use to render progress incrementally.

mod summary;

pub use summary::{format_markdown_summary, generate_markdown_summary};

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

/// Outcome of one visited URL, mutually exclusive per row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStatus {
    /// Page rendered and introspected normally
    Success,

    /// The failure probe showed the request was redirected
    Redirect {
        /// Final resolved location
        target: String,
    },

    /// The failure probe returned a non-2xx response
    CodeError(u16),

    /// Access failed for an unexplained reason even though the probe succeeded
    Invalid(u16),

    /// The failure probe itself could not complete
    ProbeFailed(String),
}

impl PageStatus {
    /// The redirect target, if this status carries one
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::Redirect { target } => Some(target),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "Success"),
            Self::Redirect { .. } => write!(f, "Redirect"),
            Self::CodeError(status) => write!(f, "Code error: {}", status),
            Self::Invalid(status) => write!(f, "Invalid: {}", status),
            Self::ProbeFailed(reason) => write!(f, "Unknown access failure: {}", reason),
        }
    }
}

impl Serialize for PageStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Link statistics gathered while extracting one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkAudit {
    /// Anchors with a resolvable absolute target
    pub nb_links: usize,

    /// In-scope links already visited, already queued, or pointing at the
    /// current page
    pub nb_links_already_processed: usize,

    /// Links whose host matches neither the original nor the proxy host
    pub nb_links_external_host: usize,

    /// Canonical in-scope URLs newly enqueued from this page
    pub links_to_follow: Vec<String>,
}

impl LinkAudit {
    pub fn nb_links_to_follow(&self) -> usize {
        self.links_to_follow.len()
    }
}

/// One report record per visited URL, immutable after creation
#[derive(Debug, Clone)]
pub struct CrawlRow {
    pub url: String,
    pub status: PageStatus,
    pub nb_links: usize,
    pub nb_links_already_processed: usize,
    pub nb_links_external_host: usize,
    pub nb_links_to_follow: usize,
    pub links_to_follow: Vec<String>,
}

impl CrawlRow {
    /// Row for a page that rendered and was link-audited
    pub fn success(url: String, audit: LinkAudit) -> Self {
        Self {
            url,
            status: PageStatus::Success,
            nb_links: audit.nb_links,
            nb_links_already_processed: audit.nb_links_already_processed,
            nb_links_external_host: audit.nb_links_external_host,
            nb_links_to_follow: audit.links_to_follow.len(),
            links_to_follow: audit.links_to_follow,
        }
    }

    /// Row for a page whose rendering failed; link counts stay zero
    pub fn failure(url: String, status: PageStatus) -> Self {
        Self {
            url,
            status,
            nb_links: 0,
            nb_links_already_processed: 0,
            nb_links_external_host: 0,
            nb_links_to_follow: 0,
            links_to_follow: Vec::new(),
        }
    }

    /// The redirect target, for rows with a `Redirect` status
    pub fn redirect_target(&self) -> Option<&str> {
        self.status.redirect_target()
    }
}

// Serialized in the tabular-export column layout: URL, status, redirect
// target, then the four link counts and the follow list.
impl Serialize for CrawlRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut row = serializer.serialize_struct("CrawlRow", 8)?;
        row.serialize_field("url", &self.url)?;
        row.serialize_field("status", &self.status)?;
        row.serialize_field("redirect", &self.redirect_target())?;
        row.serialize_field("nbLinks", &self.nb_links)?;
        row.serialize_field("nbLinksAlreadyProcessed", &self.nb_links_already_processed)?;
        row.serialize_field("nbLinksExternalHost", &self.nb_links_external_host)?;
        row.serialize_field("nbLinksToFollow", &self.nb_links_to_follow)?;
        row.serialize_field("linksToFollow", &self.links_to_follow)?;
        row.end()
    }
}

/// Accumulated rows for one run, in strict visitation order
#[derive(Debug)]
pub struct Report {
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    rows: Vec<CrawlRow>,
}

impl Report {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: CrawlRow) {
        self.rows.push(row);
    }

    /// Running visited count
    pub fn crawled(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[CrawlRow] {
        &self.rows
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Stamps the run finished; idempotent
    pub fn finish(&mut self) {
        if self.finished_at.is_none() {
            self.finished_at = Some(Utc::now());
        }
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-URL progress hook
///
/// The controller calls this right after a row is recorded, with the running
/// visited count, so a collaborator can render progress incrementally.
pub trait CrawlObserver {
    fn page_crawled(&self, row: &CrawlRow, crawled: usize);
}

/// Observer that ignores all notifications
pub struct NoopObserver;

impl CrawlObserver for NoopObserver {
    fn page_crawled(&self, _row: &CrawlRow, _crawled: usize) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_strings() {
        assert_eq!(PageStatus::Success.to_string(), "Success");
        assert_eq!(
            PageStatus::Redirect {
                target: "https://example.com/c/".to_string()
            }
            .to_string(),
            "Redirect"
        );
        assert_eq!(PageStatus::CodeError(500).to_string(), "Code error: 500");
        assert_eq!(PageStatus::Invalid(200).to_string(), "Invalid: 200");
        assert_eq!(
            PageStatus::ProbeFailed("connection refused".to_string()).to_string(),
            "Unknown access failure: connection refused"
        );
    }

    #[test]
    fn test_success_row_carries_audit_counts() {
        let audit = LinkAudit {
            nb_links: 4,
            nb_links_already_processed: 1,
            nb_links_external_host: 1,
            links_to_follow: vec!["https://example.com/b".to_string()],
        };
        let row = CrawlRow::success("https://example.com/a".to_string(), audit);

        assert!(row.status.is_success());
        assert_eq!(row.nb_links, 4);
        assert_eq!(row.nb_links_already_processed, 1);
        assert_eq!(row.nb_links_external_host, 1);
        assert_eq!(row.nb_links_to_follow, 1);
        assert_eq!(row.links_to_follow, vec!["https://example.com/b"]);
    }

    #[test]
    fn test_failure_row_has_zero_counts() {
        let row = CrawlRow::failure(
            "https://example.com/c".to_string(),
            PageStatus::Redirect {
                target: "https://example.com/c/".to_string(),
            },
        );
        assert_eq!(row.nb_links, 0);
        assert_eq!(row.redirect_target(), Some("https://example.com/c/"));
    }

    #[test]
    fn test_report_order_and_finish() {
        let mut report = Report::new();
        report.push(CrawlRow::failure("a".to_string(), PageStatus::Success));
        report.push(CrawlRow::failure("b".to_string(), PageStatus::Success));

        assert_eq!(report.crawled(), 2);
        assert_eq!(report.rows()[0].url, "a");
        assert!(report.finished_at().is_none());

        report.finish();
        assert!(report.finished_at().is_some());
    }
}
