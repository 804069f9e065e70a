//! Link classification for Gossamer
//!
//! The classifier is the pure half of the crawl pipeline: given a
//! discovered URL it decides inclusion, priority, and handler routing.
//! All pattern tables are compiled once before the first fetch, so a
//! malformed pattern fails the crawl at start time rather than
//! mid-traversal.

mod extract;

use crate::config::Settings;
use crate::frontier::LinkPriority;
use crate::url::in_domain;
use crate::ConfigError;
use regex::{Regex, RegexBuilder};

/// Outcome of classifying a single discovered URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Whether the URL should enter the frontier at all
    pub include: bool,

    /// Fetch priority when included
    pub priority: LinkPriority,

    /// Capture groups of the first matching valid-link pattern
    pub matches: Vec<String>,
}

impl Classification {
    fn excluded() -> Self {
        Self {
            include: false,
            priority: LinkPriority::Low,
            matches: Vec::new(),
        }
    }
}

/// Compiled pattern tables and scoping rules for link classification
///
/// Stateless after compilation; safe to share across workers.
#[derive(Debug)]
pub struct LinkClassifier {
    domain: String,
    stay_in_domain: bool,
    allowed_mime_types: Vec<String>,
    valid: Vec<Regex>,
    exclude: Vec<Regex>,
    silent: Vec<Regex>,
    callbacks: Vec<(Regex, String)>,
}

impl LinkClassifier {
    /// Compiles all pattern tables from the crawl settings
    ///
    /// Every pattern across the valid / exclude / silent / callback
    /// tables is compiled with the same flags: case-insensitive and
    /// dot-matches-newline search semantics.
    pub fn compile(settings: &Settings) -> Result<Self, ConfigError> {
        let valid = compile_patterns(&settings.valid_link_patterns)?;
        let exclude = compile_patterns(&settings.exclude_link_patterns)?;
        let silent = compile_patterns(&settings.silent_link_patterns)?;

        let mut callbacks = Vec::with_capacity(settings.callback_patterns.len());
        for rule in &settings.callback_patterns {
            callbacks.push((compile_pattern(&rule.pattern)?, rule.handler.clone()));
        }

        Ok(Self {
            domain: settings.domain.clone(),
            stay_in_domain: settings.stay_in_domain,
            allowed_mime_types: settings.allowed_mime_types.clone(),
            valid,
            exclude,
            silent,
            callbacks,
        })
    }

    /// Classifies an absolute URL discovered on a page
    ///
    /// Exclude patterns win over everything; then domain scoping drops
    /// out-of-domain links when the crawl is domain-bound. Included
    /// URLs get High priority on a valid-pattern match (with that
    /// pattern's capture groups as the matches payload), Normal when
    /// in-domain, Low otherwise.
    pub fn classify(&self, url: &str) -> Classification {
        for re in &self.exclude {
            if re.is_match(url) {
                return Classification::excluded();
            }
        }

        let in_scope = in_domain(url, &self.domain);

        if self.stay_in_domain && !in_scope {
            return Classification::excluded();
        }

        if let Some(matches) = self.first_valid_captures(url) {
            return Classification {
                include: true,
                priority: LinkPriority::High,
                matches,
            };
        }

        let priority = if in_scope {
            LinkPriority::Normal
        } else {
            LinkPriority::Low
        };

        Classification {
            include: true,
            priority,
            matches: Vec::new(),
        }
    }

    /// Capture groups of the first valid pattern matching the URL, or
    /// empty when none matches. This is the matches payload a routed
    /// page carries.
    pub fn valid_matches(&self, url: &str) -> Vec<String> {
        self.first_valid_captures(url).unwrap_or_default()
    }

    fn first_valid_captures(&self, url: &str) -> Option<Vec<String>> {
        for re in &self.valid {
            if let Some(caps) = re.captures(url) {
                return Some(
                    caps.iter()
                        .skip(1)
                        .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
                        .collect(),
                );
            }
        }
        None
    }

    /// Returns the handler id of the first callback pattern matching
    /// the URL, in declaration order, or None for the default handler.
    pub fn match_callback(&self, url: &str) -> Option<&str> {
        self.callbacks
            .iter()
            .find(|(re, _)| re.is_match(url))
            .map(|(_, handler)| handler.as_str())
    }

    /// Whether the URL is silent: fetched and link-extracted, but no
    /// handler fires for it.
    pub fn is_silent(&self, url: &str) -> bool {
        self.silent.iter().any(|re| re.is_match(url))
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex, ConfigError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .map_err(|source| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns.iter().map(|p| compile_pattern(p)).collect()
}
