//! Full configuration validation.
//!
//! Each section has its own validator; this orchestrator runs them all and
//! collects every error into a single `ConfigError`.

mod helpers;
mod navigation;
mod window;


use crate::schema::WeaveConfig;
use weave_common::ConfigError;

use helpers::validate_range;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &WeaveConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    window::validate_window(&mut errors, config);
    navigation::validate_navigation(&mut errors, config);
    validate_range(
        &mut errors,
        "bridge.max_pending_calls",
        config.bridge.max_pending_calls,
        1,
        1_000_000,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
