//! URL handling module for Gossamer
//!
//! This module provides URL normalization (the frontier's deduplication
//! key), relative link resolution, domain scoping, and MIME type guessing.

mod mime;
mod normalize;

// Re-export main functions
pub use mime::guess_mime_type;
pub use normalize::{normalize_url, resolve_link};

/// Checks whether a URL belongs to the configured crawl domain
///
/// The test is a plain substring check against the full absolute URL,
/// so `domain = "example.com/blog"` scopes the crawl to a subtree and
/// `domain = "example.com"` covers every page on the host.
///
/// # Examples
///
/// ```
/// use gossamer::url::in_domain;
///
/// assert!(in_domain("http://example.com/page", "example.com"));
/// assert!(!in_domain("http://other.com/page", "example.com"));
/// ```
pub fn in_domain(url: &str, domain: &str) -> bool {
    !domain.is_empty() && url.contains(domain)
}
