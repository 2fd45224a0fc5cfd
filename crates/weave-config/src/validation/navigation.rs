//! Navigation allowlist validation.

use std::sync::OnceLock;

use regex::Regex;

use crate::schema::WeaveConfig;

/// RFC 3986 scheme: a letter followed by letters, digits, `+`, `-` or `.`.
fn scheme_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*$").expect("valid scheme regex"))
}

pub(crate) fn validate_navigation(errors: &mut Vec<String>, config: &WeaveConfig) {
    let nav = &config.navigation;

    if nav.allowed_schemes.is_empty() {
        errors.push("navigation.allowed_schemes must not be empty".into());
    }

    for scheme in &nav.allowed_schemes {
        if !scheme_pattern().is_match(scheme) {
            errors.push(format!(
                "navigation.allowed_schemes contains invalid scheme '{scheme}'"
            ));
        }
    }

    if let Some(url) = &nav.start_url {
        match url.split_once(':') {
            Some((scheme, _)) if nav.is_scheme_allowed(scheme) => {}
            _ => errors.push(format!(
                "navigation.start_url '{url}' does not use an allowed scheme"
            )),
        }
    }
}
