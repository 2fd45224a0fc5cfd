//! Reading config files.

use std::path::Path;

use tracing::{info, warn};
use weave_common::ConfigError;

use super::paths::{create_default_config, default_config_path};
use crate::schema::WeaveConfig;
use crate::validation;

/// Parse the TOML file at `path`.
///
/// Absent keys take their defaults. Validation problems are only logged here;
/// [`crate::load_config`] is the entry point that rejects them.
pub fn load_from_path(path: &Path) -> Result<WeaveConfig, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => {
            return Err(ConfigError::ParseError(format!(
                "cannot read {}: {e}",
                path.display()
            )))
        }
    };

    let config: WeaveConfig = toml::from_str(&text)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;

    if let Err(e) = validation::validate(&config) {
        warn!(path = %path.display(), "config has invalid values: {e}");
    }
    info!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Load from [`default_config_path`], writing the commented template (and
/// returning defaults) on first run.
pub fn load_default() -> Result<WeaveConfig, ConfigError> {
    let path = default_config_path()?;
    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            create_default_config(&path)?;
            Ok(WeaveConfig::default())
        }
        other => other,
    }
}
