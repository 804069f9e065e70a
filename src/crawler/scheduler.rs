//! Batch-lockstep crawl scheduler
//!
//! The scheduler drains the frontier in batches of `thread-count` URLs:
//! each batch is dispatched to one worker task per URL, then joined in
//! full before the next batch is requested. In-flight concurrency is
//! therefore bounded by the configured worker count, and links found in
//! batch k are never dequeued before batch k completes — priority
//! ordering is recomputed freshly from the whole frontier each round.

use crate::classify::LinkClassifier;
use crate::config::Settings;
use crate::crawler::fetcher::{FetchedPage, Transport};
use crate::crawler::stats::CrawlStats;
use crate::frontier::{Frontier, FrontierError, UrlRecord};
use crate::handler::{CallbackRouter, Page};
use crate::{GossamerError, Result};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

/// Drives the worker pool until the frontier is drained
pub struct Scheduler {
    settings: Arc<Settings>,
    frontier: Arc<Frontier>,
    classifier: Arc<LinkClassifier>,
    router: Arc<CallbackRouter>,
    transport: Arc<dyn Transport>,
    stats: Arc<CrawlStats>,
}

impl Scheduler {
    pub fn new(
        settings: Arc<Settings>,
        frontier: Arc<Frontier>,
        classifier: Arc<LinkClassifier>,
        router: Arc<CallbackRouter>,
        transport: Arc<dyn Transport>,
        stats: Arc<CrawlStats>,
    ) -> Self {
        Self {
            settings,
            frontier,
            classifier,
            router,
            transport,
            stats,
        }
    }

    /// Runs the crawl loop to completion
    ///
    /// Terminates on the first empty batch, which the frontier only
    /// produces once every discovered URL has reached its terminal
    /// state. An unbounded link graph runs until the dedup invariant
    /// stops producing new records.
    pub async fn run(&self) -> Result<()> {
        let mut batch_no = 0u64;

        loop {
            let batch = self.frontier.dequeue_batch(self.settings.thread_count)?;
            if batch.is_empty() {
                tracing::info!("Frontier drained after {} batches", batch_no);
                break;
            }

            batch_no += 1;
            tracing::debug!("Batch {}: dispatching {} workers", batch_no, batch.len());

            let mut handles = Vec::with_capacity(batch.len());
            for record in batch {
                let worker = FetchWorker {
                    settings: self.settings.clone(),
                    frontier: self.frontier.clone(),
                    classifier: self.classifier.clone(),
                    router: self.router.clone(),
                    transport: self.transport.clone(),
                    stats: self.stats.clone(),
                };
                handles.push(tokio::spawn(worker.process(record)));
            }

            // Join barrier: the next batch is not requested until every
            // worker in this one has finished.
            let mut fatal = None;
            for result in join_all(handles).await {
                match result {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => fatal = Some(e),
                    Err(join_err) => {
                        // A panicking handler aborts only its own
                        // worker; the page was already marked done.
                        tracing::error!("Worker aborted, continuing crawl: {}", join_err);
                    }
                }
            }

            // Frontier store failures break the uniqueness guarantee,
            // so they end the crawl.
            if let Some(e) = fatal {
                return Err(e);
            }

            tracing::debug!(
                "Batch {} complete: {} fetched, {} pending",
                batch_no,
                self.stats.pages_fetched(),
                self.frontier.pending_count()?
            );
        }

        Ok(())
    }
}

/// One unit of fetch concurrency
struct FetchWorker {
    settings: Arc<Settings>,
    frontier: Arc<Frontier>,
    classifier: Arc<LinkClassifier>,
    router: Arc<CallbackRouter>,
    transport: Arc<dyn Transport>,
    stats: Arc<CrawlStats>,
}

impl FetchWorker {
    /// Fetches one claimed record, discovers its links, and routes it
    ///
    /// Transport failures degrade to a synthetic 500 with an empty
    /// body: the record is still marked done and never retried. Links
    /// are extracted from any readable body, even on non-2xx responses;
    /// the handler fires only for successful, non-silent pages.
    async fn process(self, record: UrlRecord) -> Result<()> {
        let request_url = format!("{}{}", record.url, self.settings.append_to_links);

        let fetched = match self.transport.fetch(&request_url).await {
            Ok(fetched) => {
                self.stats.incr_pages_fetched();
                fetched
            }
            Err(e) => {
                tracing::warn!("Fetch failed for {}: {}", record.url, e);
                self.stats.incr_fetch_failures();
                FetchedPage {
                    final_url: record.url.clone(),
                    status: 500,
                    headers: HashMap::new(),
                    body: String::new(),
                }
            }
        };

        let final_url = strip_append_suffix(&fetched.final_url, &self.settings.append_to_links);

        if !fetched.body.is_empty() {
            self.discover_links(&fetched.body, &final_url)?;
        }

        // Terminal state is reached before the handler runs, so a
        // failing handler cannot leave the record in flight.
        self.frontier.mark_done(&record.url)?;

        let success = (200..300).contains(&fetched.status);
        if success && !self.classifier.is_silent(&final_url) {
            let page = Page {
                matches: self.classifier.valid_matches(&final_url),
                url: final_url.clone(),
                status: fetched.status,
                body: fetched.body,
                headers: fetched.headers,
            };
            let handler = self.router.handler_for(self.classifier.match_callback(&final_url));
            handler.handle(&page);
        }

        Ok(())
    }

    /// Classifies and enqueues every link found in a page body
    fn discover_links(&self, body: &str, base: &str) -> Result<()> {
        let base_url = match Url::parse(base) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Unparseable base URL {}: {}", base, e);
                return Ok(());
            }
        };

        for link in self.classifier.extract_links(body, &base_url) {
            let classification = self.classifier.classify(&link);
            if !classification.include {
                continue;
            }

            match self.frontier.enqueue(&link, classification.priority) {
                Ok(true) => self.stats.incr_links_enqueued(),
                Ok(false) => {}
                Err(FrontierError::InvalidUrl(e)) => {
                    tracing::debug!("Skipping link {}: {}", link, e);
                }
                Err(e) => return Err(GossamerError::Frontier(e)),
            }
        }

        Ok(())
    }
}

/// Strips the append-to-links suffix back off a final URL
fn strip_append_suffix<'a>(final_url: &'a str, suffix: &str) -> String {
    if !suffix.is_empty() {
        if let Some(stripped) = final_url.strip_suffix(suffix) {
            return stripped.to_string();
        }
    }
    final_url.to_string()
}
