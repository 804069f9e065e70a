use serde::Deserialize;

/// Crawl settings
///
/// Constructed once at crawl start, then treated as immutable: the
/// scheduler, frontier, and classifier all read the same value by
/// reference and nothing mutates it mid-crawl.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Domain the crawl is scoped to; matched as a substring of each
    /// discovered absolute URL
    pub domain: String,

    /// Entry path on the domain
    #[serde(rename = "start-page")]
    pub start_page: String,

    /// Protocol prefix for the seed URL
    pub protocol: String,

    /// Drop links outside the configured domain entirely; when false
    /// they are kept at Low priority
    #[serde(rename = "stay-in-domain")]
    pub stay_in_domain: bool,

    /// Ordered target-link patterns; a match gets High priority and its
    /// capture groups ride along with the page
    #[serde(rename = "valid-link-patterns")]
    pub valid_link_patterns: Vec<String>,

    /// Links matching any of these never enter the frontier
    #[serde(rename = "exclude-link-patterns")]
    pub exclude_link_patterns: Vec<String>,

    /// Links matching any of these are fetched and scanned for links,
    /// but fire no handler
    #[serde(rename = "silent-link-patterns")]
    pub silent_link_patterns: Vec<String>,

    /// Ordered pattern-to-handler-id routing table
    #[serde(rename = "callback-patterns")]
    pub callback_patterns: Vec<CallbackRule>,

    /// When non-empty, only pages whose guessed MIME type is listed are
    /// scanned for links
    #[serde(rename = "allowed-mime-types")]
    pub allowed_mime_types: Vec<String>,

    /// Number of concurrent fetch workers per batch
    #[serde(rename = "thread-count")]
    pub thread_count: usize,

    /// Suffix appended to every fetched URL and stripped back off the
    /// reported final URL
    #[serde(rename = "append-to-links")]
    pub append_to_links: String,
}

/// One entry of the callback routing table
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackRule {
    /// Pattern searched against the page URL
    pub pattern: String,

    /// Id of the handler registered for this pattern
    pub handler: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            domain: String::new(),
            start_page: "/".to_string(),
            protocol: "http://".to_string(),
            stay_in_domain: true,
            valid_link_patterns: vec!["(.*)".to_string()],
            exclude_link_patterns: Vec::new(),
            silent_link_patterns: Vec::new(),
            callback_patterns: Vec::new(),
            allowed_mime_types: Vec::new(),
            thread_count: 1,
            append_to_links: String::new(),
        }
    }
}

impl Settings {
    /// The seed URL the frontier is initialized with
    pub fn start_url(&self) -> String {
        format!("{}{}{}", self.protocol, self.domain, self.start_page)
    }
}
