//! In-memory frontier store
//!
//! A hash map over the full record set plus one FIFO queue per priority
//! tier. Suits small crawls where the dedup set fits comfortably in
//! memory; larger crawls use the SQLite store.

use crate::frontier::{FrontierResult, FrontierStore, LinkPriority, RecordState, UrlRecord};
use std::collections::{HashMap, VecDeque};

/// In-memory frontier backing store
pub struct MemoryStore {
    /// Full record set, keyed by normalized URL
    records: HashMap<String, (LinkPriority, RecordState)>,

    /// Pending keys per priority tier, in insertion order.
    ///
    /// A key appears in exactly one queue while its record is Pending
    /// and is removed on claim, so the queues always mirror the Pending
    /// subset of `records`.
    high: VecDeque<String>,
    normal: VecDeque<String>,
    low: VecDeque<String>,

    in_flight: usize,
    done: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            high: VecDeque::new(),
            normal: VecDeque::new(),
            low: VecDeque::new(),
            in_flight: 0,
            done: 0,
        }
    }

    fn queue_for(&mut self, priority: LinkPriority) -> &mut VecDeque<String> {
        match priority {
            LinkPriority::High => &mut self.high,
            LinkPriority::Normal => &mut self.normal,
            LinkPriority::Low => &mut self.low,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FrontierStore for MemoryStore {
    fn insert_if_absent(&mut self, url: &str, priority: LinkPriority) -> FrontierResult<bool> {
        if self.records.contains_key(url) {
            return Ok(false);
        }

        self.records
            .insert(url.to_string(), (priority, RecordState::Pending));
        self.queue_for(priority).push_back(url.to_string());

        Ok(true)
    }

    fn claim_batch(&mut self, n: usize) -> FrontierResult<Vec<UrlRecord>> {
        let mut claimed = Vec::new();

        for priority in [LinkPriority::High, LinkPriority::Normal, LinkPriority::Low] {
            while claimed.len() < n {
                let Some(url) = self.queue_for(priority).pop_front() else {
                    break;
                };

                if let Some(entry) = self.records.get_mut(&url) {
                    entry.1 = RecordState::InFlight;
                }
                self.in_flight += 1;

                claimed.push(UrlRecord {
                    url,
                    priority,
                    state: RecordState::InFlight,
                });
            }
        }

        Ok(claimed)
    }

    fn mark_done(&mut self, url: &str) -> FrontierResult<()> {
        if let Some(entry) = self.records.get_mut(url) {
            match entry.1 {
                RecordState::InFlight => {
                    self.in_flight -= 1;
                    self.done += 1;
                    entry.1 = RecordState::Done;
                }
                RecordState::Pending => {
                    // Completed without ever being claimed; still terminal.
                    let priority = entry.0;
                    entry.1 = RecordState::Done;
                    self.done += 1;
                    self.queue_for(priority).retain(|u| u != url);
                }
                RecordState::Done => {}
            }
        }
        Ok(())
    }

    fn contains(&self, url: &str) -> FrontierResult<bool> {
        Ok(self.records.contains_key(url))
    }

    fn pending_count(&self) -> FrontierResult<usize> {
        Ok(self.high.len() + self.normal.len() + self.low.len())
    }

    fn in_flight_count(&self) -> FrontierResult<usize> {
        Ok(self.in_flight)
    }

    fn done_count(&self) -> FrontierResult<usize> {
        Ok(self.done)
    }
}
