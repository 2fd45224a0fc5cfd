//! Where the config file lives.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use weave_common::ConfigError;

use super::template::default_config_toml;

/// Environment variable naming a config file to use instead of the
/// platform default.
pub const CONFIG_PATH_ENV: &str = "WEAVE_CONFIG";

/// `$WEAVE_CONFIG` if set and non-empty, else `<config dir>/weave/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    resolve(std::env::var_os(CONFIG_PATH_ENV), dirs::config_dir())
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))
}

fn resolve(env: Option<OsString>, config_dir: Option<PathBuf>) -> Option<PathBuf> {
    match env.filter(|value| !value.is_empty()) {
        Some(path) => Some(PathBuf::from(path)),
        None => config_dir.map(|dir| dir.join("weave").join("config.toml")),
    }
}

/// Write the commented template to `path`. An existing file is kept.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    let failed = |what: &str, e: std::io::Error| {
        ConfigError::ParseError(format!("cannot {what} {}: {e}", path.display()))
    };

    if path.exists() {
        debug!(path = %path.display(), "config file already present");
        return Ok(());
    }
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| failed("create directory for", e))?;
    }
    std::fs::write(path, default_config_toml()).map_err(|e| failed("write", e))?;

    info!(path = %path.display(), "default config written");
    Ok(())
}
