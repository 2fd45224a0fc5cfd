//! Navigation configuration types.

use serde::{Deserialize, Serialize};

/// Schemes a webview may load when no allowlist is configured.
pub const DEFAULT_ALLOWED_SCHEMES: &[&str] = &["http", "https", "file", "data", "about"];

/// Navigation policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Page loaded by the launcher when no URL is given on the command line.
    pub start_url: Option<String>,
    /// URL schemes that `navigate` accepts. Anything else is reported as a
    /// navigation failure.
    pub allowed_schemes: Vec<String>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            start_url: None,
            allowed_schemes: DEFAULT_ALLOWED_SCHEMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl NavigationConfig {
    pub fn is_scheme_allowed(&self, scheme: &str) -> bool {
        self.allowed_schemes
            .iter()
            .any(|s| s.eq_ignore_ascii_case(scheme))
    }
}
