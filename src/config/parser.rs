use crate::config::validation::validate_settings;
use crate::config::Settings;
use crate::ConfigResult;
use std::path::Path;

/// Loads and validates settings from a TOML file
pub fn load_settings(path: &Path) -> ConfigResult<Settings> {
    let content = std::fs::read_to_string(path)?;
    load_settings_from_str(&content)
}

/// Parses and validates settings from a TOML string
pub fn load_settings_from_str(content: &str) -> ConfigResult<Settings> {
    let settings: Settings = toml::from_str(content)?;
    validate_settings(&settings)?;
    Ok(settings)
}
