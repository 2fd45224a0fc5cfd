//! weave configuration.
//!
//! TOML-based configuration for webview instances and the `weave`
//! launcher. Every section uses serde defaults, so a partial file (or no
//! file at all) yields a working configuration.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use weave_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{WeaveConfig, CONFIG_SCHEMA_VERSION};
pub use toml_loader::{load_default, load_from_path};

use weave_common::ConfigError;

/// Load config from the platform default path and validate it.
pub fn load_config() -> Result<WeaveConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &WeaveConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
