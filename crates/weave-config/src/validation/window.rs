use crate::schema::WeaveConfig;

use super::helpers::validate_range;

pub(crate) fn validate_window(errors: &mut Vec<String>, config: &WeaveConfig) {
    validate_range(errors, "window.width", config.window.width, 100, 16384);
    validate_range(errors, "window.height", config.window.height, 100, 16384);

    if let Some(ua) = &config.window.user_agent {
        if ua.trim().is_empty() {
            errors.push("window.user_agent must not be empty when set".into());
        }
    }
}
