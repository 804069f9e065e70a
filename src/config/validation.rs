//! Settings validation
//!
//! All checks run before the first fetch; pattern compilation itself is
//! validated separately when the classifier's tables are built.

use crate::config::Settings;
use crate::ConfigError;

/// Validates crawl settings
///
/// Checks structural requirements: a non-empty domain, a positive
/// worker count, a sane protocol prefix, and non-empty handler ids in
/// the callback table.
pub fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    if settings.domain.trim().is_empty() {
        return Err(ConfigError::Validation(
            "domain must not be empty".to_string(),
        ));
    }

    if settings.thread_count == 0 {
        return Err(ConfigError::Validation(
            "thread-count must be a positive integer".to_string(),
        ));
    }

    if settings.protocol != "http://" && settings.protocol != "https://" {
        return Err(ConfigError::Validation(format!(
            "protocol must be \"http://\" or \"https://\", got {:?}",
            settings.protocol
        )));
    }

    for rule in &settings.callback_patterns {
        if rule.handler.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "callback pattern {:?} has an empty handler id",
                rule.pattern
            )));
        }
    }

    Ok(())
}
