//! Scan report aggregation
//!
//! Findings are grouped under the display URL of the item they were found
//! in, so every reported secret points back at a retrievable page. Crawl
//! failures are carried alongside: a partial scan is still a scan, and the
//! reader should know what was not covered.

mod render;

pub use render::{print_report, write_json};

use crate::crawler::CrawlFailure;
use crate::detect::Finding;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// One recorded crawl failure, flattened for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct ScanFailure {
    pub scope: String,
    pub identifier: String,
    pub class: String,
    pub error: String,
    pub fatal: bool,
}

impl From<&CrawlFailure> for ScanFailure {
    fn from(failure: &CrawlFailure) -> Self {
        ScanFailure {
            scope: failure.scope.as_str().to_string(),
            identifier: failure.identifier.clone(),
            class: failure.error.class().to_string(),
            error: failure.error.to_string(),
            fatal: failure.fatal,
        }
    }
}

/// Aggregated result of one scan.
#[derive(Debug, Serialize)]
pub struct Report {
    /// Findings keyed by the display URL of the containing item.
    pub results: HashMap<String, Vec<Finding>>,

    /// Crawl failures recorded during the scan.
    pub failures: Vec<ScanFailure>,

    /// Number of content items that were scanned.
    pub total_items_scanned: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Report {
    pub fn new() -> Self {
        Report {
            results: HashMap::new(),
            failures: Vec::new(),
            total_items_scanned: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Counts one scanned item, whether or not it held secrets.
    pub fn record_scanned(&mut self) {
        self.total_items_scanned += 1;
    }

    /// Attributes one finding to a source URL.
    pub fn add_finding(&mut self, source_key: &str, finding: Finding) {
        self.results
            .entry(source_key.to_string())
            .or_default()
            .push(finding);
    }

    /// Records a crawl failure.
    pub fn record_failure(&mut self, failure: &CrawlFailure) {
        self.failures.push(ScanFailure::from(failure));
    }

    /// Stamps the scan as finished.
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Number of distinct items with at least one finding.
    pub fn items_with_secrets(&self) -> usize {
        self.results.len()
    }

    /// Total findings across all items.
    pub fn total_findings(&self) -> usize {
        self.results.values().map(Vec::len).sum()
    }

    /// Whether any recorded failure was fatal.
    pub fn has_fatal_failure(&self) -> bool {
        self.failures.iter().any(|f| f.fatal)
    }
}

impl Default for Report {
    fn default() -> Self {
        Report::new()
    }
}
