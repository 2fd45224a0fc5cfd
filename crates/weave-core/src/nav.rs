//! URL policy, current location and per-load initialization scripts.

use url::Url;
use weave_common::{Result, WeaveError};
use weave_config::schema::NavigationConfig;

use crate::bridge::{bind_script, BRIDGE_INIT_SCRIPT};

pub(crate) const BLANK_LOCATION: &str = "about:blank";

pub(crate) struct Navigator {
    policy: NavigationConfig,
    /// User scripts in registration order.
    init_scripts: Vec<String>,
    location: String,
}

impl Navigator {
    pub(crate) fn new(allowed_schemes: Vec<String>) -> Self {
        Self {
            policy: NavigationConfig {
                start_url: None,
                allowed_schemes,
            },
            init_scripts: Vec::new(),
            location: BLANK_LOCATION.to_string(),
        }
    }

    /// Parse and normalize `url`, refusing schemes outside the allowlist.
    pub(crate) fn check(&self, url: &str) -> Result<String> {
        let parsed = Url::parse(url.trim()).map_err(|e| WeaveError::NavigationFailure {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if !self.policy.is_scheme_allowed(parsed.scheme()) {
            return Err(WeaveError::NavigationFailure {
                url: url.to_string(),
                reason: format!("scheme '{}' is not allowed", parsed.scheme()),
            });
        }
        Ok(parsed.into())
    }

    pub(crate) fn add_init_script(&mut self, script: &str) {
        self.init_scripts.push(script.to_string());
    }

    pub(crate) fn init_script_count(&self) -> usize {
        self.init_scripts.len()
    }

    /// Scripts for the next document: bridge bootstrap, one stub per bound
    /// name, then user scripts.
    pub(crate) fn compose<'a>(&self, bound: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let mut scripts = vec![BRIDGE_INIT_SCRIPT.to_string()];
        scripts.extend(bound.into_iter().map(bind_script));
        scripts.extend(self.init_scripts.iter().cloned());
        scripts
    }

    pub(crate) fn location(&self) -> &str {
        &self.location
    }

    pub(crate) fn set_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
    }
}
