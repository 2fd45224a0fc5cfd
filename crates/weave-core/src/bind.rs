//! Bound host functions and the calls awaiting their resolution.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::time::Instant;

use serde_json::Value;
use weave_common::{Result, WeaveError};

use crate::webview::Webview;

/// Callback invoked on the UI thread for each script call of a bound name.
///
/// The callback answers later (or immediately) with [`Webview::resolve`] or
/// [`WebviewHandle::resolve`](crate::WebviewHandle::resolve).
pub type BindCallback = dyn FnMut(&mut Webview, BindRequest);

pub(crate) type SharedCallback = Rc<RefCell<Box<BindCallback>>>;

/// One script-originated call.
#[derive(Debug)]
pub struct BindRequest {
    id: String,
    name: String,
    raw_args: String,
    args: std::result::Result<Vec<Value>, WeaveError>,
}

impl BindRequest {
    pub(crate) fn new(id: String, name: String, raw_args: String) -> Self {
        let args = parse_args(&raw_args);
        Self {
            id,
            name,
            raw_args,
            args,
        }
    }

    /// Request id to pass back to `resolve`.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Arguments exactly as the script sent them (a JSON array text).
    pub fn raw_args(&self) -> &str {
        &self.raw_args
    }

    /// Parsed arguments, or `MalformedArguments` if the text is not a JSON
    /// array.
    pub fn args(&self) -> std::result::Result<&[Value], &WeaveError> {
        self.args.as_deref()
    }
}

fn parse_args(raw: &str) -> Result<Vec<Value>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(values)) => Ok(values),
        Ok(other) => Err(WeaveError::MalformedArguments(format!(
            "expected a JSON array, got {other}"
        ))),
        Err(e) => Err(WeaveError::MalformedArguments(e.to_string())),
    }
}

/// Rejection value for a bound call; becomes the reason the script promise
/// rejects with.
#[derive(Debug, Clone, PartialEq)]
pub struct Reject(Value);

impl Reject {
    /// Reject with a plain message string.
    pub fn reason(message: impl Into<String>) -> Self {
        Self(Value::String(message.into()))
    }

    pub fn json(value: Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<&WeaveError> for Reject {
    fn from(err: &WeaveError) -> Self {
        Self(err.to_script_value())
    }
}

impl From<WeaveError> for Reject {
    fn from(err: WeaveError) -> Self {
        Self::from(&err)
    }
}

/// Name -> callback. Names iterate in sorted order.
#[derive(Default)]
pub(crate) struct BindTable {
    entries: BTreeMap<String, SharedCallback>,
}

impl BindTable {
    /// Returns `true` when an existing binding was replaced.
    pub(crate) fn insert(&mut self, name: &str, callback: Box<BindCallback>) -> bool {
        self.entries
            .insert(name.to_string(), Rc::new(RefCell::new(callback)))
            .is_some()
    }

    pub(crate) fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    pub(crate) fn get(&self, name: &str) -> Option<SharedCallback> {
        self.entries.get(name).cloned()
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

pub(crate) struct PendingCall {
    pub(crate) name: String,
    pub(crate) received: Instant,
}

/// Calls delivered to a callback and not yet resolved.
pub(crate) struct PendingCalls {
    calls: HashMap<String, PendingCall>,
    limit: usize,
}

impl PendingCalls {
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            calls: HashMap::new(),
            limit,
        }
    }

    pub(crate) fn insert(&mut self, id: &str, name: &str) -> Result<()> {
        if self.calls.len() >= self.limit {
            return Err(WeaveError::InvalidState(format!(
                "too many pending calls (limit {})",
                self.limit
            )));
        }
        self.calls.insert(
            id.to_string(),
            PendingCall {
                name: name.to_string(),
                received: Instant::now(),
            },
        );
        Ok(())
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.calls.contains_key(id)
    }

    /// Remove and return the call; `None` if unknown or already resolved.
    pub(crate) fn take(&mut self, id: &str) -> Option<PendingCall> {
        self.calls.remove(id)
    }

    pub(crate) fn len(&self) -> usize {
        self.calls.len()
    }

    /// Forget every call. Returns how many were dropped.
    pub(crate) fn clear(&mut self) -> usize {
        let dropped = self.calls.len();
        self.calls.clear();
        dropped
    }
}
