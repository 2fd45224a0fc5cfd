//! Script bridge protocol between the host and page JavaScript.
//!
//! Messages flow in both directions:
//! - **page -> host**: a bound stub calls `window.__weave__.call(name, args)`,
//!   which posts `{"id", "name", "params"}` through `window.ipc.postMessage`.
//! - **host -> page**: the host evaluates `window.__weave__.settle(id, status,
//!   result)` to resolve (`status == 0`) or reject the matching promise.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Global object the bootstrap installs on `window`.
pub const BRIDGE_NAMESPACE: &str = "__weave__";

/// Bootstrap injected ahead of every other initialization script.
pub const BRIDGE_INIT_SCRIPT: &str = r#"
(function() {
    if (window.__weave__) {
        return;
    }
    var pending = {};
    var prefix = Math.random().toString(36).slice(2, 10);
    var seq = 0;
    var weave = {
        call: function(name, args) {
            var id = prefix + '-' + (++seq);
            return new Promise(function(resolve, reject) {
                pending[id] = { resolve: resolve, reject: reject };
                try {
                    window.ipc.postMessage(JSON.stringify({
                        id: id,
                        name: name,
                        params: JSON.stringify(args || [])
                    }));
                } catch (err) {
                    delete pending[id];
                    reject(err);
                }
            });
        },
        settle: function(id, status, result) {
            var entry = pending[id];
            if (!entry) {
                return;
            }
            delete pending[id];
            if (status === 0) {
                entry.resolve(result);
            } else {
                entry.reject(result);
            }
        },
        bind: function(name) {
            window[name] = function() {
                return weave.call(name, Array.prototype.slice.call(arguments));
            };
        }
    };
    window.__weave__ = weave;
})();
"#;

/// A bound-function call posted by page script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallMessage {
    /// Request id, unique per document.
    pub id: String,
    /// Bound function name.
    pub name: String,
    #[serde(default)]
    pub params: CallParams,
}

/// Call arguments: the bootstrap sends a JSON-encoded string, hand-written
/// callers may send the array inline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CallParams {
    Encoded(String),
    Inline(Value),
}

impl Default for CallParams {
    fn default() -> Self {
        Self::Inline(Value::Array(Vec::new()))
    }
}

impl CallMessage {
    /// Parse a call from a raw `postMessage` body. Bodies without an id or a
    /// name are not calls.
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str::<Self>(raw)
            .ok()
            .filter(|msg| !msg.id.is_empty() && !msg.name.is_empty())
    }

    /// Arguments as the JSON text handed to the bound callback.
    pub fn raw_args(&self) -> String {
        match &self.params {
            CallParams::Encoded(text) => text.clone(),
            CallParams::Inline(value) => value.to_string(),
        }
    }
}

/// Whether `name` can be exposed as a global function.
pub fn is_bindable_name(name: &str) -> bool {
    !name.is_empty() && name != BRIDGE_NAMESPACE && !name.chars().any(char::is_control)
}

fn js_string(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string())
}

/// Script that installs the `window[name]` stub.
pub fn bind_script(name: &str) -> String {
    format!("window.{BRIDGE_NAMESPACE}.bind({});", js_string(name))
}

/// Script that settles the promise for `id`.
pub fn settle_script(id: &str, status: i32, result: &Value) -> String {
    format!(
        "window.{BRIDGE_NAMESPACE}.settle({}, {}, {});",
        js_string(id),
        status,
        result,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_encoded_params() {
        let msg = CallMessage::from_json(r#"{"id":"a-1","name":"add","params":"[2,3]"}"#).unwrap();
        assert_eq!(msg.id, "a-1");
        assert_eq!(msg.name, "add");
        assert_eq!(msg.raw_args(), "[2,3]");
    }

    #[test]
    fn parses_inline_params() {
        let msg = CallMessage::from_json(r#"{"id":"a-2","name":"add","params":[1,"x"]}"#).unwrap();
        assert_eq!(msg.raw_args(), r#"[1,"x"]"#);
    }

    #[test]
    fn missing_params_default_to_empty_array() {
        let msg = CallMessage::from_json(r#"{"id":"a-3","name":"ping"}"#).unwrap();
        assert_eq!(msg.raw_args(), "[]");
    }

    #[test]
    fn rejects_non_calls() {
        assert!(CallMessage::from_json("not json").is_none());
        assert!(CallMessage::from_json(r#"{"kind":"ping"}"#).is_none());
        assert!(CallMessage::from_json(r#"{"id":"","name":"add"}"#).is_none());
        assert!(CallMessage::from_json(r#"{"id":"a","name":""}"#).is_none());
    }

    #[test]
    fn bind_script_quotes_name() {
        assert_eq!(bind_script("add"), r#"window.__weave__.bind("add");"#);
        assert_eq!(
            bind_script("we\"ird"),
            r#"window.__weave__.bind("we\"ird");"#
        );
    }

    #[test]
    fn settle_script_embeds_json_result() {
        let script = settle_script("a-1", 0, &json!(5));
        assert_eq!(script, r#"window.__weave__.settle("a-1", 0, 5);"#);

        let script = settle_script("a-2", 1, &json!({"error": "NotBound"}));
        assert_eq!(
            script,
            r#"window.__weave__.settle("a-2", 1, {"error":"NotBound"});"#
        );
    }

    #[test]
    fn bindable_names() {
        assert!(is_bindable_name("add"));
        assert!(is_bindable_name("my-func"));
        assert!(!is_bindable_name(""));
        assert!(!is_bindable_name(BRIDGE_NAMESPACE));
        assert!(!is_bindable_name("bad\nname"));
    }

    #[test]
    fn bootstrap_installs_namespace() {
        assert!(BRIDGE_INIT_SCRIPT.contains("window.__weave__ = weave"));
        assert!(BRIDGE_INIT_SCRIPT.contains("window.ipc.postMessage"));
    }
}
