//! Page handlers and callback routing
//!
//! A completed, non-silent page is routed to exactly one handler: the
//! one registered for the first callback pattern matching the page URL,
//! or the default handler when nothing matches. The routing table is
//! resolved once at crawl start — handler ids referenced by the
//! settings must exist in the registry before any fetch happens.

use crate::{GossamerError, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// A fetched page as delivered to handlers
///
/// Ephemeral: consumed by the matched handler and the link extractor,
/// then discarded. Never persisted.
#[derive(Debug, Clone)]
pub struct Page {
    /// Final URL after redirects, with any append-to-links suffix
    /// stripped back off
    pub url: String,

    /// HTTP status code; 500 for transport-level failures
    pub status: u16,

    /// Response body; empty when the fetch failed before a body was
    /// read
    pub body: String,

    /// Response headers
    pub headers: HashMap<String, String>,

    /// Capture groups of the valid-link pattern that matched this URL
    /// at discovery time
    pub matches: Vec<String>,
}

/// User-supplied page handler
///
/// Invoked synchronously inside the worker that fetched the page.
pub trait PageHandler: Send + Sync {
    fn handle(&self, page: &Page);
}

impl<F> PageHandler for F
where
    F: Fn(&Page) + Send + Sync,
{
    fn handle(&self, page: &Page) {
        self(page)
    }
}

/// Handler that does nothing; the registry's initial default
struct NoopHandler;

impl PageHandler for NoopHandler {
    fn handle(&self, _page: &Page) {}
}

/// Registry of named handlers plus the default
///
/// Handler ids are plain strings so they can be referenced from the
/// settings file; the id-to-handler binding is typed and checked when
/// the router is resolved.
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn PageHandler>>,
    default: Arc<dyn PageHandler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            default: Arc::new(NoopHandler),
        }
    }

    /// Registers a handler under an id referenced by callback patterns
    pub fn register(&mut self, id: impl Into<String>, handler: Arc<dyn PageHandler>) {
        self.handlers.insert(id.into(), handler);
    }

    /// Replaces the default handler, which receives every routed page
    /// no callback pattern matched
    pub fn set_default(&mut self, handler: Arc<dyn PageHandler>) {
        self.default = handler;
    }

    fn get(&self, id: &str) -> Option<Arc<dyn PageHandler>> {
        self.handlers.get(id).cloned()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolved id-to-handler routing table
pub struct CallbackRouter {
    handlers: HashMap<String, Arc<dyn PageHandler>>,
    default: Arc<dyn PageHandler>,
}

impl std::fmt::Debug for CallbackRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRouter")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl CallbackRouter {
    /// Resolves the router from the registry
    ///
    /// Every handler id appearing in the callback patterns must be
    /// registered; an unknown id fails here, before the crawl starts.
    pub fn resolve(
        registry: &HandlerRegistry,
        referenced_ids: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Result<Self> {
        let mut handlers = HashMap::new();
        for id in referenced_ids {
            let id = id.as_ref();
            match registry.get(id) {
                Some(handler) => {
                    handlers.insert(id.to_string(), handler);
                }
                None => return Err(GossamerError::UnknownHandler(id.to_string())),
            }
        }

        Ok(Self {
            handlers,
            default: registry.default.clone(),
        })
    }

    /// Maps a matched handler id (or None) to its handler
    pub fn handler_for(&self, matched_id: Option<&str>) -> Arc<dyn PageHandler> {
        matched_id
            .and_then(|id| self.handlers.get(id).cloned())
            .unwrap_or_else(|| self.default.clone())
    }
}

/// Zero-argument hook run before or after the crawl loop
pub type Hook = Box<dyn Fn() + Send + Sync>;

/// Typed pre/post-crawl hook slots
#[derive(Default)]
pub struct CrawlHooks {
    pub precrawl: Option<Hook>,
    pub postcrawl: Option<Hook>,
}
