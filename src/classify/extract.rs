//! Hyperlink extraction from fetched page bodies
//!
//! Only anchor-tag `href` attributes are considered; scripts,
//! stylesheets, and other embedded resources never produce crawl
//! candidates.

use crate::classify::LinkClassifier;
use crate::url::{guess_mime_type, resolve_link};
use scraper::{Html, Selector};
use url::Url;

impl LinkClassifier {
    /// Extracts hyperlink targets from a page body
    ///
    /// Each `<a href>` value is resolved against `base_url` to an
    /// absolute URL with its fragment stripped; empty, fragment-only,
    /// and non-http(s) targets are discarded.
    ///
    /// When the settings list allowed MIME types and the guessed type
    /// of `base_url`'s target is not among them, extraction is skipped
    /// for the whole page — images and binaries are not scanned for
    /// links.
    pub fn extract_links(&self, body: &str, base_url: &Url) -> Vec<String> {
        if !self.mime_allowed(base_url) {
            return Vec::new();
        }

        let document = Html::parse_document(body);
        let mut links = Vec::new();

        if let Ok(selector) = Selector::parse("a[href]") {
            for element in document.select(&selector) {
                if let Some(href) = element.value().attr("href") {
                    if let Some(absolute) = resolve_link(href, base_url) {
                        links.push(absolute.to_string());
                    }
                }
            }
        }

        links
    }

    fn mime_allowed(&self, base_url: &Url) -> bool {
        if self.allowed_mime_types.is_empty() {
            return true;
        }
        let mime = guess_mime_type(base_url);
        self.allowed_mime_types.iter().any(|allowed| allowed == mime)
    }
}
