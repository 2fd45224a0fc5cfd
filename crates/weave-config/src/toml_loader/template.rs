//! Default config file content.

/// Generate the default TOML config content with comments.
pub(super) fn default_config_toml() -> String {
    r##"# weave configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[window]
# title = "weave"
# width = 800            # 100-16384
# height = 600           # 100-16384
# size_hint = "none"     # none, min, max, fixed
# devtools = false
# user_agent = "weave/0.1"

[navigation]
# start_url = "about:blank"
# allowed_schemes = ["http", "https", "file", "data", "about"]

[bridge]
# max_pending_calls = 1024   # 1-1000000

[logging]
# level = "info"         # trace, debug, info, warn, error
"##
    .to_string()
}
