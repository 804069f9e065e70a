//! Crawl engine
//!
//! [`Crawler`] wires the pieces together: settings are validated and
//! compiled into a [`LinkClassifier`], handler ids are resolved into a
//! [`CallbackRouter`], the frontier is seeded with the start URL, and
//! the batch scheduler drains it to completion.
//!
//! ```no_run
//! use gossamer::{Crawler, Page, Settings};
//! use std::sync::Arc;
//!
//! # async fn run() -> gossamer::Result<()> {
//! let settings = Settings {
//!     domain: "example.com".to_string(),
//!     ..Settings::default()
//! };
//!
//! let stats = Crawler::new(settings)
//!     .default_handler(Arc::new(|page: &Page| {
//!         println!("{} {}", page.status, page.url);
//!     }))
//!     .run()
//!     .await?;
//!
//! println!("fetched {} pages", stats.pages_fetched());
//! # Ok(())
//! # }
//! ```

mod fetcher;
mod scheduler;
mod stats;

pub use fetcher::{build_http_client, FetchedPage, HttpTransport, Transport, TransportError};
pub use scheduler::Scheduler;
pub use stats::CrawlStats;

use crate::classify::LinkClassifier;
use crate::config::{validate_settings, Settings};
use crate::frontier::{Frontier, FrontierStore, LinkPriority};
use crate::handler::{CallbackRouter, CrawlHooks, HandlerRegistry, PageHandler};
use crate::Result;
use std::sync::Arc;

/// Builder and entry point for a crawl
pub struct Crawler {
    settings: Settings,
    registry: HandlerRegistry,
    hooks: CrawlHooks,
    transport: Option<Arc<dyn Transport>>,
    store: Option<Box<dyn FrontierStore>>,
}

impl Crawler {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            registry: HandlerRegistry::new(),
            hooks: CrawlHooks::default(),
            transport: None,
            store: None,
        }
    }

    /// Registers a handler under the id used by callback patterns
    pub fn register_handler(mut self, id: impl Into<String>, handler: Arc<dyn PageHandler>) -> Self {
        self.registry.register(id, handler);
        self
    }

    /// Sets the handler for pages no callback pattern matches
    pub fn default_handler(mut self, handler: Arc<dyn PageHandler>) -> Self {
        self.registry.set_default(handler);
        self
    }

    /// Runs once, after validation and before the first fetch
    pub fn precrawl(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.hooks.precrawl = Some(Box::new(hook));
        self
    }

    /// Runs once, after the frontier is drained
    pub fn postcrawl(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.hooks.postcrawl = Some(Box::new(hook));
        self
    }

    /// Replaces the HTTP transport (custom clients, test doubles)
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replaces the frontier store, e.g. with [`crate::frontier::SqliteStore`]
    /// for an on-disk dedup set
    pub fn with_store(mut self, store: Box<dyn FrontierStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Runs the crawl to completion
    ///
    /// Fails before the first fetch on invalid settings, a malformed
    /// pattern, or a callback pattern referencing an unregistered
    /// handler id. Mid-crawl, only frontier store failures are fatal;
    /// fetch and handler failures are contained per page.
    pub async fn run(self) -> Result<Arc<CrawlStats>> {
        validate_settings(&self.settings)?;

        let classifier = Arc::new(LinkClassifier::compile(&self.settings)?);
        let router = Arc::new(CallbackRouter::resolve(
            &self.registry,
            self.settings.callback_patterns.iter().map(|r| r.handler.as_str()),
        )?);

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new()?),
        };

        let frontier = Arc::new(match self.store {
            Some(store) => Frontier::with_store(store),
            None => Frontier::in_memory(),
        });

        let settings = Arc::new(self.settings);
        let seed = settings.start_url();
        frontier.enqueue(&seed, LinkPriority::Normal)?;
        tracing::info!(
            "Starting crawl of {} with {} workers",
            seed,
            settings.thread_count
        );

        let stats = Arc::new(CrawlStats::new());

        if let Some(hook) = &self.hooks.precrawl {
            hook();
        }

        let scheduler = Scheduler::new(
            settings,
            frontier.clone(),
            classifier,
            router,
            transport,
            stats.clone(),
        );
        scheduler.run().await?;

        if let Some(hook) = &self.hooks.postcrawl {
            hook();
        }

        tracing::info!(
            "Crawl finished: {} pages fetched ({} failures), {} links enqueued in {}s",
            stats.pages_fetched(),
            stats.fetch_failures(),
            stats.links_enqueued(),
            stats.elapsed_secs()
        );

        Ok(stats)
    }
}
