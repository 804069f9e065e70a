//! Crawl frontier: the deduplicated, priority-ordered store of URLs
//!
//! The frontier owns every URL record discovered during a crawl and is
//! the only structure mutated by multiple workers concurrently. All
//! mutation goes through a single mutex around the backing store; the
//! per-operation cost is dominated by network I/O, not lock contention.
//!
//! Backing storage is pluggable behind the [`FrontierStore`] trait: the
//! in-memory store suits small crawls, the SQLite store keeps the dedup
//! set on disk for large ones.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::url::normalize_url;
use crate::UrlError;
use std::sync::Mutex;
use thiserror::Error;

/// Errors that can occur during frontier operations
#[derive(Debug, Error)]
pub enum FrontierError {
    #[error("Frontier store error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Rejected URL: {0}")]
    InvalidUrl(#[from] UrlError),
}

/// Result type for frontier operations
pub type FrontierResult<T> = Result<T, FrontierError>;

/// Fetch priority of a discovered link
///
/// High priority links match a valid-link pattern, Normal links are
/// in-domain, Low links are out-of-domain pages kept only when the
/// crawl is not domain-scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkPriority {
    High,
    Normal,
    Low,
}

impl LinkPriority {
    /// Rank for ordering and storage; lower ranks are dequeued first.
    pub fn rank(&self) -> i64 {
        match self {
            Self::High => 0,
            Self::Normal => 1,
            Self::Low => 2,
        }
    }

    pub fn from_rank(rank: i64) -> Option<Self> {
        match rank {
            0 => Some(Self::High),
            1 => Some(Self::Normal),
            2 => Some(Self::Low),
            _ => None,
        }
    }
}

/// Lifecycle state of a URL record
///
/// Pending -> InFlight (on dequeue) -> Done (on fetch completion,
/// success or failure). Done records are kept for the lifetime of the
/// crawl so a finished URL can never be re-enqueued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    Pending,
    InFlight,
    Done,
}

/// A URL record held by the frontier
///
/// The `url` field is the normalized deduplication key: fragment
/// stripped, whitespace trimmed, always absolute.
#[derive(Debug, Clone)]
pub struct UrlRecord {
    pub url: String,
    pub priority: LinkPriority,
    pub state: RecordState,
}

/// Trait for frontier backing stores
///
/// Implementations hold the full URL record set and enforce the
/// uniqueness invariant: at most one record per normalized URL for the
/// lifetime of a crawl. Callers pass keys that are already normalized;
/// synchronization is the [`Frontier`] facade's job.
pub trait FrontierStore: Send {
    /// Inserts a Pending record if no record with this key exists.
    ///
    /// Returns whether a record was inserted. The first-seen priority
    /// wins; later inserts of the same key change nothing.
    fn insert_if_absent(&mut self, url: &str, priority: LinkPriority) -> FrontierResult<bool>;

    /// Claims up to `n` Pending records, highest priority first, FIFO
    /// within a tier, transitioning each to InFlight.
    fn claim_batch(&mut self, n: usize) -> FrontierResult<Vec<UrlRecord>>;

    /// Transitions a record to Done. Idempotent; unknown keys are a
    /// no-op.
    fn mark_done(&mut self, url: &str) -> FrontierResult<()>;

    /// Membership test over the full Pending ∪ InFlight ∪ Done key set.
    fn contains(&self, url: &str) -> FrontierResult<bool>;

    /// Number of Pending records.
    fn pending_count(&self) -> FrontierResult<usize>;

    /// Number of InFlight records.
    fn in_flight_count(&self) -> FrontierResult<usize>;

    /// Number of Done records.
    fn done_count(&self) -> FrontierResult<usize>;
}

/// The crawl frontier
///
/// Wraps a backing store behind a single mutex and applies URL
/// normalization at the boundary, so every key that reaches the store
/// is already in deduplicated form.
pub struct Frontier {
    store: Mutex<Box<dyn FrontierStore>>,
}

impl Frontier {
    /// Creates a frontier backed by the in-memory store
    pub fn in_memory() -> Self {
        Self::with_store(Box::new(MemoryStore::new()))
    }

    /// Creates a frontier backed by the given store
    pub fn with_store(store: Box<dyn FrontierStore>) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Enqueues a URL at the given priority
    ///
    /// The URL is normalized first; a URL already known to the frontier
    /// (in any state) is a no-op. Returns whether a new record was
    /// created.
    pub fn enqueue(&self, url: &str, priority: LinkPriority) -> FrontierResult<bool> {
        let normalized = normalize_url(url)?;
        let mut store = self.store.lock().unwrap();
        store.insert_if_absent(normalized.as_str(), priority)
    }

    /// Atomically claims up to `n` pending records for fetching
    ///
    /// An empty result while no records are in flight signals crawl
    /// completion.
    pub fn dequeue_batch(&self, n: usize) -> FrontierResult<Vec<UrlRecord>> {
        let mut store = self.store.lock().unwrap();
        store.claim_batch(n)
    }

    /// Marks a URL's record Done. Idempotent.
    pub fn mark_done(&self, url: &str) -> FrontierResult<()> {
        let normalized = normalize_url(url)?;
        let mut store = self.store.lock().unwrap();
        store.mark_done(normalized.as_str())
    }

    /// Returns whether the frontier has ever seen this URL
    pub fn is_known(&self, url: &str) -> FrontierResult<bool> {
        let normalized = normalize_url(url)?;
        let store = self.store.lock().unwrap();
        store.contains(normalized.as_str())
    }

    /// Number of records waiting to be claimed
    pub fn pending_count(&self) -> FrontierResult<usize> {
        self.store.lock().unwrap().pending_count()
    }

    /// Number of claimed records not yet marked Done
    pub fn in_flight_count(&self) -> FrontierResult<usize> {
        self.store.lock().unwrap().in_flight_count()
    }

    /// Number of completed records
    pub fn done_count(&self) -> FrontierResult<usize> {
        self.store.lock().unwrap().done_count()
    }

    /// Terminal condition for the whole crawl: nothing pending and
    /// nothing in flight.
    pub fn is_drained(&self) -> FrontierResult<bool> {
        let store = self.store.lock().unwrap();
        Ok(store.pending_count()? == 0 && store.in_flight_count()? == 0)
    }
}
