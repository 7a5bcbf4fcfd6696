//! Outstanding-work counter for crawl completion detection
//!
//! The crawl is a dynamically-sized fan-out: the number of spaces, pages per
//! space, and versions per page are all unknown up front, so a wait group
//! sized at start cannot work. Instead every task is registered before it is
//! spawned and completed when it exits, and the crawl is finished precisely
//! when the count crosses zero.
//!
//! The one ordering rule that makes this race-free: a task registers all of
//! its children before calling [`WorkTracker::complete`] on itself. Without
//! it the count can transiently hit zero while discovered children are not
//! yet registered, closing the stream with work still pending.

use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// Counts scheduled-but-unfinished crawl tasks across all fan-out levels.
#[derive(Debug, Default)]
pub struct WorkTracker {
    outstanding: AtomicUsize,
    idle: Notify,
}

impl WorkTracker {
    pub fn new() -> Self {
        WorkTracker::default()
    }

    /// Registers one unit of work. Must happen before the task is spawned,
    /// and before the task that discovered it completes.
    pub fn register(&self) {
        self.outstanding.fetch_add(1, Ordering::SeqCst);
    }

    /// Marks one unit of work finished. The caller must have already
    /// registered any children it spawned.
    pub fn complete(&self) {
        if self.outstanding.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.idle.notify_waiters();
        }
    }

    /// Current number of unfinished tasks.
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    /// Resolves once the count has crossed zero.
    ///
    /// The notify registration happens before the count is re-checked, so a
    /// zero-crossing between the check and the await cannot be missed.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            if self.outstanding.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }
}
