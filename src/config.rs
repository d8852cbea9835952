//! Archiver configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Every key is
//! optional: stock defaults are overridden by whatever the file specifies, and
//! command-line flags override both.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! database_url = "sqlite://db/procon_development.sqlite3"
//! output_root = "out"
//! # stylesheet = "assets/global.css"   # replaces the built-in global.css
//!
//! [formats]
//! start = "%A, %B %-d, %Y at %-I:%M %p"   # homepage start time
//! day = "%A, %B %-d, %Y"                  # schedule day headings
//! time = "%-I:%M %p"                      # schedule time ranges
//! ```
//!
//! Format strings use chrono's `strftime` syntax. Unknown keys are rejected to
//! catch typos early.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

pub const DEFAULT_DATABASE_URL: &str = "sqlite://db/procon_development.sqlite3";

/// Archiver configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiverConfig {
    /// Database the Procon rows are read from.
    pub database_url: String,
    /// Directory that receives one subdirectory per published domain.
    pub output_root: PathBuf,
    /// Replacement for the built-in global stylesheet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stylesheet: Option<PathBuf>,
    /// Date and time display patterns.
    pub formats: FormatConfig,
}

impl Default for ArchiverConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            output_root: PathBuf::from("out"),
            stylesheet: None,
            formats: FormatConfig::default(),
        }
    }
}

impl ArchiverConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "database_url must not be empty".into(),
            ));
        }
        if self.output_root.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "output_root must not be empty".into(),
            ));
        }
        for (key, pattern) in [
            ("formats.start", &self.formats.start),
            ("formats.day", &self.formats.day),
            ("formats.time", &self.formats.time),
        ] {
            if !is_valid_strftime(pattern) {
                return Err(ConfigError::Validation(format!(
                    "{key} is not a valid strftime pattern: {pattern:?}"
                )));
            }
        }
        Ok(())
    }
}

/// chrono `strftime` patterns used when rendering timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatConfig {
    /// Convention start time on the homepage.
    pub start: String,
    /// Heading of each schedule day-section.
    pub day: String,
    /// Each end of an event's time range on the schedule.
    pub time: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            start: "%A, %B %-d, %Y at %-I:%M %p".to_string(),
            day: "%A, %B %-d, %Y".to_string(),
            time: "%-I:%M %p".to_string(),
        }
    }
}

fn is_valid_strftime(pattern: &str) -> bool {
    !pattern.is_empty() && !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(ArchiverConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ArchiverConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ArchiverConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(dir: &Path) -> Result<ArchiverConfig, ConfigError> {
    resolve_config(load_raw_config(dir)?)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Procon Archiver Configuration
# =============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.
#
# --procon-database-url and --output on the command line override the
# matching keys here.

# Database holding the Procon tables. Opened read-only.
database_url = "sqlite://db/procon_development.sqlite3"

# Each published convention is written to <output_root>/<domain>/.
# Relative paths resolve against the current directory.
output_root = "out"

# Stylesheet copied into every site as global.css. When unset, the
# built-in stylesheet is used.
# stylesheet = "assets/global.css"

# ---------------------------------------------------------------------------
# Date and time formats (chrono strftime syntax)
# ---------------------------------------------------------------------------
[formats]
# Convention start time on the homepage.
start = "%A, %B %-d, %Y at %-I:%M %p"

# Heading for each day of the schedule.
day = "%A, %B %-d, %Y"

# Start and end of each scheduled event.
time = "%-I:%M %p"
"##
}
