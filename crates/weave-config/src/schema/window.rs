//! Window configuration types.

use serde::{Deserialize, Serialize};
use weave_common::SizeHint;

/// Initial window appearance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Initial width in logical pixels (valid range: 100-16384).
    pub width: u32,
    /// Initial height in logical pixels (valid range: 100-16384).
    pub height: u32,
    /// How `width`/`height` are applied; `fixed` disables resizing.
    pub size_hint: SizeHint,
    /// Enable the inspector / developer tools.
    pub devtools: bool,
    /// Custom user agent string.
    pub user_agent: Option<String>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "weave".into(),
            width: 800,
            height: 600,
            size_hint: SizeHint::None,
            devtools: cfg!(debug_assertions),
            user_agent: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_config_defaults() {
        let config = WindowConfig::default();
        assert_eq!(config.title, "weave");
        assert_eq!(config.width, 800);
        assert_eq!(config.height, 600);
        assert_eq!(config.size_hint, SizeHint::None);
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn window_config_partial_toml() {
        let config: WindowConfig = toml::from_str(
            r#"
title = "Calculator"
size_hint = "fixed"
width = 320
"#,
        )
        .unwrap();
        assert_eq!(config.title, "Calculator");
        assert_eq!(config.size_hint, SizeHint::Fixed);
        assert_eq!(config.width, 320);
        // Defaults preserved
        assert_eq!(config.height, 600);
    }
}
