//! Configuration module for Gossamer
//!
//! Settings are loaded from TOML (or built in code), validated, and
//! then never mutated for the lifetime of the crawl.

mod parser;
mod types;
mod validation;

pub use parser::{load_settings, load_settings_from_str};
pub use types::{CallbackRule, Settings};
pub use validation::validate_settings;
