//! Crawl coordinator - three-level fan-out orchestration
//!
//! This module drives the whole crawl: list every space, list every page
//! within each space, fetch every page's content (and, when enabled, its
//! historical versions), and push each retrieved item to the output stream.
//! The number of spaces, pages, and versions is unknown until the remote
//! tells us, so the fan-out is dynamically sized at every level.
//!
//! Two pieces of shared state keep it bounded and terminating:
//! - a single semaphore gate shared by every task at every level, so total
//!   in-flight HTTP work never exceeds the configured limit;
//! - a [`WorkTracker`] counting scheduled-but-unfinished tasks, whose
//!   zero-crossing is the one and only signal that the crawl is done.
//!
//! Failures are isolated to the smallest affected unit: one bad page does
//! not sink its siblings, one bad space does not sink the crawl. The sole
//! exception is credential rejection, which halts scheduling of new work
//! and lets in-flight tasks drain.

use crate::client::{ConfluenceClient, Page, Space};
use crate::config::Config;
use crate::crawler::fetcher::{self, ContentItem};
use crate::crawler::lister;
use crate::crawler::tracker::WorkTracker;
use crate::{ClientError, SiftError};
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Per-unit crawl result: a retrieved item or a recorded failure.
#[derive(Debug)]
pub enum CrawlOutcome {
    Item(ContentItem),
    Failure(CrawlFailure),
}

/// A failure recorded against the smallest affected unit of work.
#[derive(Debug)]
pub struct CrawlFailure {
    pub scope: FailureScope,
    /// Space key, page ID, or page ID plus version, depending on scope.
    pub identifier: String,
    pub error: ClientError,
    /// True only for credential rejection, which also halts new scheduling.
    pub fatal: bool,
}

/// The unit of work a failure is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureScope {
    /// The top-level space listing.
    Spaces,
    /// One space's page listing.
    Space,
    /// One page's current-content fetch.
    Page,
    /// One historical version fetch.
    Version,
}

impl FailureScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureScope::Spaces => "spaces",
            FailureScope::Space => "space",
            FailureScope::Page => "page",
            FailureScope::Version => "version",
        }
    }
}

impl fmt::Display for FailureScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State shared by every crawl task.
struct CrawlContext {
    client: ConfluenceClient,
    window_size: usize,
    history: bool,
    space_filter: HashSet<String>,
    gate: Arc<Semaphore>,
    tracker: WorkTracker,
    halted: AtomicBool,
    fatal_reported: AtomicBool,
}

impl CrawlContext {
    /// Acquires a slot on the shared concurrency gate.
    ///
    /// Returns `None` only if the semaphore is closed, which never happens
    /// during a crawl; callers treat it as "do nothing and finish".
    async fn permit(&self) -> Option<OwnedSemaphorePermit> {
        self.gate.clone().acquire_owned().await.ok()
    }

    fn halted(&self) -> bool {
        self.halted.load(Ordering::SeqCst)
    }

    /// Records a failure against one unit of work.
    ///
    /// A fatal (auth) failure additionally halts scheduling of new work and
    /// is reported at most once; in-flight tasks hitting the same rejection
    /// are only logged.
    fn record_failure(
        &self,
        outcomes: &UnboundedSender<CrawlOutcome>,
        scope: FailureScope,
        identifier: String,
        error: ClientError,
    ) {
        let fatal = error.is_fatal();
        if fatal {
            self.halted.store(true, Ordering::SeqCst);
            if self.fatal_reported.swap(true, Ordering::SeqCst) {
                tracing::debug!("suppressing repeated auth failure for {}", identifier);
                return;
            }
            tracing::error!("authentication rejected, halting new crawl work: {}", error);
        } else {
            tracing::warn!("{} {} failed: {}", scope, identifier, error);
        }

        let _ = outcomes.send(CrawlOutcome::Failure(CrawlFailure {
            scope,
            identifier,
            error,
            fatal,
        }));
    }
}

/// Orchestrates one crawl of one wiki.
pub struct Coordinator {
    ctx: Arc<CrawlContext>,
}

impl Coordinator {
    /// Creates a coordinator from a validated configuration.
    pub fn new(config: &Config) -> Result<Self, SiftError> {
        let client = ConfluenceClient::new(
            &config.source,
            Duration::from_secs(config.crawler.request_timeout_seconds),
        )?;

        let ctx = CrawlContext {
            client,
            window_size: config.crawler.window_size as usize,
            history: config.source.history,
            space_filter: config.source.spaces.iter().cloned().collect(),
            gate: Arc::new(Semaphore::new(config.crawler.max_concurrent_requests as usize)),
            tracker: WorkTracker::new(),
            halted: AtomicBool::new(false),
            fatal_reported: AtomicBool::new(false),
        };

        Ok(Coordinator { ctx: Arc::new(ctx) })
    }

    /// Starts the crawl and returns the outcome stream.
    ///
    /// The stream is guaranteed to close after the last outcome and never
    /// before all in-flight work has completed: a dedicated closer task is
    /// the single observer of the tracker's zero-crossing and drops the
    /// root sender there, while each worker task drops its own sender clone
    /// only after its final send.
    pub fn crawl(self) -> UnboundedReceiver<CrawlOutcome> {
        let (outcomes, stream) = mpsc::unbounded_channel();
        let ctx = self.ctx;

        // Root task registered before anything is spawned; from here on the
        // count only touches zero once all work at all levels is done.
        ctx.tracker.register();
        tokio::spawn(list_spaces(Arc::clone(&ctx), outcomes.clone()));

        tokio::spawn(async move {
            ctx.tracker.wait_idle().await;
            tracing::info!("crawl complete");
            drop(outcomes);
        });

        stream
    }
}

/// Root task: lists all spaces and spawns one page-listing task per space.
async fn list_spaces(ctx: Arc<CrawlContext>, outcomes: UnboundedSender<CrawlOutcome>) {
    let Some(_permit) = ctx.permit().await else {
        ctx.tracker.complete();
        return;
    };

    let result = lister::list_all(ctx.window_size, |start| {
        let ctx = Arc::clone(&ctx);
        async move { ctx.client.spaces(start).await.map(|envelope| envelope.results) }
    })
    .await;

    match result {
        Ok(spaces) => {
            tracing::info!("discovered {} spaces", spaces.len());
            for space in spaces {
                if !ctx.space_filter.is_empty() && !ctx.space_filter.contains(&space.key) {
                    tracing::debug!("skipping space {} (not in filter)", space.key);
                    continue;
                }
                if ctx.halted() {
                    tracing::debug!("halted, not scheduling space {}", space.key);
                    break;
                }
                // Register the child before this task completes, so the
                // outstanding count never transiently reaches zero.
                ctx.tracker.register();
                tokio::spawn(list_pages(Arc::clone(&ctx), outcomes.clone(), space));
            }
        }
        Err(error) => {
            ctx.record_failure(
                &outcomes,
                FailureScope::Spaces,
                "space listing".to_string(),
                error,
            );
        }
    }

    ctx.tracker.complete();
}

/// Lists one space's pages and spawns one content-fetch task per page.
async fn list_pages(ctx: Arc<CrawlContext>, outcomes: UnboundedSender<CrawlOutcome>, space: Space) {
    let Some(_permit) = ctx.permit().await else {
        ctx.tracker.complete();
        return;
    };

    let result = lister::list_all(ctx.window_size, |start| {
        let ctx = Arc::clone(&ctx);
        let key = space.key.clone();
        async move { ctx.client.pages(&key, start).await.map(|envelope| envelope.results) }
    })
    .await;

    match result {
        Ok(pages) => {
            tracing::info!("space {} has {} pages", space.key, pages.len());
            for page in pages {
                if ctx.halted() {
                    tracing::debug!("halted, not scheduling page {}", page.id);
                    break;
                }
                ctx.tracker.register();
                tokio::spawn(fetch_page(
                    Arc::clone(&ctx),
                    outcomes.clone(),
                    space.key.clone(),
                    page,
                ));
            }
        }
        Err(error) => {
            ctx.record_failure(&outcomes, FailureScope::Space, space.key.clone(), error);
        }
    }

    ctx.tracker.complete();
}

/// Fetches one page's current content and, when history is enabled, walks
/// the previous-version chain.
///
/// The chain is inherently sequential - each request depends on the pointer
/// in the previous response - so it runs as one task looping under a single
/// gate slot rather than one task per version. An error partway through
/// truncates the chain; versions already emitted stand.
async fn fetch_page(
    ctx: Arc<CrawlContext>,
    outcomes: UnboundedSender<CrawlOutcome>,
    space_key: String,
    page: Page,
) {
    let Some(_permit) = ctx.permit().await else {
        ctx.tracker.complete();
        return;
    };

    let mut version: i64 = 0;
    loop {
        match fetcher::fetch_content(&ctx.client, &space_key, &page, version).await {
            Ok(fetched) => {
                let number = fetched.number;
                let previous = fetched.previous_version;
                if outcomes.send(CrawlOutcome::Item(fetched.item)).is_err() {
                    break;
                }
                if !ctx.history {
                    break;
                }
                let Some(next) = previous else {
                    break;
                };
                // Versions must strictly decrease; a pointer that does not
                // is a broken chain, not something to follow.
                let bound = if version == 0 { number } else { Some(version) };
                if let Some(bound) = bound {
                    if next >= bound {
                        tracing::warn!(
                            "page {}: previous-version pointer {} does not decrease from {}, stopping chain",
                            page.id,
                            next,
                            bound
                        );
                        break;
                    }
                }
                version = next;
            }
            Err(error) => {
                let (scope, identifier) = if version == 0 {
                    (FailureScope::Page, page.id.clone())
                } else {
                    (FailureScope::Version, format!("{}@v{}", page.id, version))
                };
                ctx.record_failure(&outcomes, scope, identifier, error);
                break;
            }
        }
    }

    ctx.tracker.complete();
}
