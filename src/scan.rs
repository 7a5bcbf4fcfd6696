//! End-to-end scan pipeline: crawl, detect, aggregate
//!
//! The crawler produces a stream of outcomes; this module drains it,
//! running the detector over every retrieved body and folding findings and
//! failures into one [`Report`]. The stream is consumed to exhaustion, so
//! the report always reflects a completed (if partial) crawl.

use crate::config::Config;
use crate::crawler::{Coordinator, CrawlOutcome};
use crate::detect::Detector;
use crate::report::Report;
use crate::SiftError;

/// Crawls the configured wiki and scans every retrieved item.
pub async fn run_scan(config: &Config, detector: &dyn Detector) -> Result<Report, SiftError> {
    let coordinator = Coordinator::new(config)?;
    let mut outcomes = coordinator.crawl();

    let mut report = Report::new();
    while let Some(outcome) = outcomes.recv().await {
        match outcome {
            CrawlOutcome::Item(item) => {
                report.record_scanned();
                let findings = detector.detect(&item.body);
                if !findings.is_empty() {
                    tracing::info!(
                        "{} secret(s) in {} (version {})",
                        findings.len(),
                        item.display_url,
                        item.version
                    );
                }
                for finding in findings {
                    report.add_finding(&item.display_url, finding);
                }
            }
            CrawlOutcome::Failure(failure) => {
                report.record_failure(&failure);
            }
        }
    }

    report.finish();
    tracing::info!(
        "scan finished: {} items scanned, {} with secrets, {} failures",
        report.total_items_scanned,
        report.items_with_secrets(),
        report.failures.len()
    );

    Ok(report)
}
