//! Crawler module for wiki content retrieval
//!
//! This module contains the core crawling logic, including:
//! - Windowed listing of spaces and pages
//! - Content fetching with optional history traversal
//! - Bounded-concurrency fan-out coordination
//! - Race-free crawl completion detection

mod coordinator;
mod fetcher;
mod lister;
mod tracker;

pub use coordinator::{Coordinator, CrawlFailure, CrawlOutcome, FailureScope};
pub use fetcher::{fetch_content, ContentItem, FetchedVersion};
pub use lister::list_all;
pub use tracker::WorkTracker;

use crate::config::Config;
use crate::SiftError;
use tokio::sync::mpsc::UnboundedReceiver;

/// Starts a crawl of the configured wiki and returns the outcome stream.
///
/// The returned stream yields every retrieved content item and every
/// recorded failure, in no particular order across pages, and closes once -
/// and only once - all crawl work has finished.
pub fn run_crawl(config: &Config) -> Result<UnboundedReceiver<CrawlOutcome>, SiftError> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.crawl())
}
