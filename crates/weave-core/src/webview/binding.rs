use serde_json::Value;
use tracing::{debug, warn};
use weave_common::{Result, WeaveError};

use crate::bind::{BindRequest, Reject};
use crate::bridge::{bind_script, is_bindable_name, settle_script, CallMessage};

use super::Webview;

impl Webview {
    /// Expose `name` to page script as a global async function.
    ///
    /// The stub is installed in the current document right away and in every
    /// later document before its init scripts. Binding an existing name
    /// replaces its callback.
    pub fn bind<F>(&mut self, name: &str, callback: F) -> Result<()>
    where
        F: FnMut(&mut Webview, BindRequest) + 'static,
    {
        self.ensure_usable()?;
        if !is_bindable_name(name) {
            return Err(WeaveError::InvalidArgument(format!(
                "cannot bind {name:?}"
            )));
        }
        let replaced = self.binds.insert(name, Box::new(callback));
        self.backend.eval(&bind_script(name))?;
        debug!(instance = %self.id, name, replaced, "function bound");
        Ok(())
    }

    /// Bind a function that answers synchronously: `Ok` resolves the script
    /// promise, `Err` rejects it.
    pub fn bind_fn<F>(&mut self, name: &str, mut f: F) -> Result<()>
    where
        F: FnMut(&[Value]) -> std::result::Result<Value, Reject> + 'static,
    {
        self.bind(name, move |webview, request| {
            let outcome = match request.args() {
                Ok(args) => f(args),
                Err(e) => Err(Reject::from(e)),
            };
            let (status, value) = match outcome {
                Ok(value) => (0, value),
                Err(reject) => (1, reject.into_value()),
            };
            if let Err(e) = webview.resolve(request.id(), status, &value.to_string()) {
                warn!(name = request.name(), error = %e, "bound function result not delivered");
            }
        })
    }

    /// Remove the binding. The page keeps its stub; calls through it are
    /// rejected with `NotBound`.
    pub fn unbind(&mut self, name: &str) -> Result<()> {
        self.ensure_usable()?;
        if !self.binds.remove(name) {
            return Err(WeaveError::NotBound(name.to_string()));
        }
        debug!(instance = %self.id, name, "function unbound");
        Ok(())
    }

    /// Settle the script call `request_id`. `status == 0` resolves the
    /// promise with `result` (JSON text); anything else rejects it.
    ///
    /// Unknown or already settled ids fail with `UnknownRequest` and leave the
    /// page untouched. After termination every resolution is ignored.
    pub fn resolve(&mut self, request_id: &str, status: i32, result: &str) -> Result<()> {
        if self.is_terminated() {
            debug!(instance = %self.id, request_id, "late resolution ignored");
            return Ok(());
        }
        let Some(call) = self.pending.take(request_id) else {
            self.diagnostics.stale_resolutions += 1;
            warn!(instance = %self.id, request_id, "resolution for unknown request ignored");
            return Err(WeaveError::UnknownRequest(request_id.to_string()));
        };

        let (status, value, outcome) = match serde_json::from_str::<Value>(result) {
            Ok(value) => (status, value, Ok(())),
            // A bare rejection reason is passed through as a string.
            Err(_) if status != 0 => (status, Value::String(result.to_string()), Ok(())),
            Err(e) => {
                let err = WeaveError::MalformedArguments(format!(
                    "result for {request_id} is not JSON: {e}"
                ));
                warn!(instance = %self.id, name = %call.name, error = %err, "rejecting call");
                (1, err.to_script_value(), Err(err))
            }
        };

        self.backend.eval(&settle_script(request_id, status, &value))?;
        debug!(
            instance = %self.id,
            name = %call.name,
            status,
            elapsed_ms = call.received.elapsed().as_millis() as u64,
            "call settled"
        );
        outcome
    }

    /// Route a `postMessage` body from the page.
    pub(crate) fn handle_script_message(&mut self, body: &str) {
        if self.is_terminated() {
            return;
        }
        let Some(message) = CallMessage::from_json(body) else {
            self.diagnostics.malformed_calls += 1;
            warn!(instance = %self.id, body_len = body.len(), "script message rejected: not a bridge call");
            return;
        };
        self.diagnostics.calls_received += 1;

        let Some(callback) = self.binds.get(&message.name) else {
            self.diagnostics.calls_rejected += 1;
            warn!(instance = %self.id, name = %message.name, "call to unbound function rejected");
            self.reject(&message.id, &WeaveError::NotBound(message.name.clone()));
            return;
        };

        if self.pending.contains(&message.id) {
            self.diagnostics.calls_rejected += 1;
            warn!(instance = %self.id, request_id = %message.id, "duplicate request id ignored");
            return;
        }
        if let Err(e) = self.pending.insert(&message.id, &message.name) {
            self.diagnostics.calls_rejected += 1;
            warn!(instance = %self.id, name = %message.name, error = %e, "call rejected");
            self.reject(&message.id, &e);
            return;
        }

        let raw_args = message.raw_args();
        let request = BindRequest::new(message.id, message.name, raw_args);
        if let Err(e) = request.args() {
            self.diagnostics.malformed_calls += 1;
            warn!(instance = %self.id, name = request.name(), error = %e, "malformed call arguments");
        }
        debug!(instance = %self.id, name = request.name(), request_id = request.id(), "bound call");

        let Ok(mut callback) = callback.try_borrow_mut() else {
            let err = WeaveError::InvalidState(format!("{} is already running", request.name()));
            self.pending.take(request.id());
            self.reject(request.id(), &err);
            return;
        };
        (*callback)(self, request);
    }

    fn reject(&mut self, request_id: &str, err: &WeaveError) {
        let script = settle_script(request_id, 1, &err.to_script_value());
        if let Err(e) = self.backend.eval(&script) {
            warn!(instance = %self.id, request_id, error = %e, "failed to deliver rejection");
        }
    }
}
