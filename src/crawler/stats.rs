use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Counters for one crawl run
///
/// Shared across workers; all counters are relaxed atomics since they
/// are only read for reporting.
pub struct CrawlStats {
    pages_fetched: AtomicU64,
    fetch_failures: AtomicU64,
    links_enqueued: AtomicU64,
    started: Instant,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self {
            pages_fetched: AtomicU64::new(0),
            fetch_failures: AtomicU64::new(0),
            links_enqueued: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    pub fn incr_pages_fetched(&self) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn incr_fetch_failures(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn incr_links_enqueued(&self) {
        self.links_enqueued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn pages_fetched(&self) -> u64 {
        self.pages_fetched.load(Ordering::Relaxed)
    }

    pub fn fetch_failures(&self) -> u64 {
        self.fetch_failures.load(Ordering::Relaxed)
    }

    pub fn links_enqueued(&self) -> u64 {
        self.links_enqueued.load(Ordering::Relaxed)
    }

    /// Elapsed wall-clock time since the stats were created, in seconds
    pub fn elapsed_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self::new()
    }
}
