use std::time::Duration;

use tracing::{debug, info, warn};
use weave_common::{Result, WeaveError};

use crate::events::{PageLoadState, WebviewEvent};
use crate::platform::BackendEvent;
use crate::queue::UiMessage;
use crate::registry::Lifecycle;

use super::Webview;

impl Webview {
    /// Run the event loop until the instance terminates.
    ///
    /// Each iteration executes the messages queued so far, then waits for
    /// native events (or a wake from another thread) and handles them.
    pub fn run(&mut self) -> Result<()> {
        self.enter_loop()?;
        self.looping = true;
        info!(instance = %self.id, "event loop started");

        while !self.is_terminated() {
            self.iterate(None);
        }

        // Tasks posted while the last batch was running still execute.
        self.drain_mailbox();
        self.looping = false;
        info!(instance = %self.id, "event loop stopped");
        Ok(())
    }

    /// Run a single loop iteration, waiting at most `timeout` for native
    /// events. For hosts that own their loop. Returns `false` once the
    /// instance has terminated.
    pub fn run_once(&mut self, timeout: Option<Duration>) -> Result<bool> {
        self.enter_loop()?;
        self.looping = true;
        self.iterate(timeout);
        self.looping = false;
        if self.is_terminated() {
            self.drain_mailbox();
            return Ok(false);
        }
        Ok(true)
    }

    fn enter_loop(&mut self) -> Result<()> {
        if self.looping {
            return Err(WeaveError::InvalidState("event loop already running".into()));
        }
        match self.lifecycle() {
            Lifecycle::Created => self.shared.set_lifecycle(Lifecycle::Running),
            Lifecycle::Running => {}
            Lifecycle::Terminated => {
                return Err(WeaveError::InvalidInstance(format!(
                    "{} has terminated",
                    self.id
                )))
            }
        }
        Ok(())
    }

    fn iterate(&mut self, timeout: Option<Duration>) {
        self.drain_mailbox();
        if self.is_terminated() {
            return;
        }
        for event in self.backend.pump(timeout) {
            self.handle_backend_event(event);
            if self.is_terminated() {
                break;
            }
        }
    }

    /// Run the loop, then destroy the instance.
    pub fn show(mut self) -> Result<()> {
        self.run()
    }

    /// Ask the loop to exit. Safe to call any number of times.
    pub fn terminate(&self) -> Result<()> {
        self.shared.request_terminate()
    }

    /// Queue `task` behind everything already dispatched. Never runs inline,
    /// even when called on the UI thread.
    pub fn dispatch<F>(&self, task: F) -> Result<()>
    where
        F: FnOnce(&mut Webview) + Send + 'static,
    {
        self.handle().dispatch(task)
    }

    /// Execute the messages queued at the time of the call, in order.
    /// Messages they enqueue wait for the next iteration.
    pub(crate) fn drain_mailbox(&mut self) {
        let batch: Vec<UiMessage> = self.mailbox.try_iter().collect();
        for message in batch {
            match message {
                UiMessage::Dispatch(task) => task(self),
                UiMessage::Resolve {
                    request_id,
                    status,
                    result,
                } => {
                    // Failures are logged and counted by `resolve`.
                    let _ = self.resolve(&request_id, status, &result);
                }
                UiMessage::Terminate => self.finish(),
            }
        }
    }

    /// Move to `Terminated`. Bound callbacks stop firing from here on.
    pub(crate) fn finish(&mut self) {
        if self.is_terminated() {
            return;
        }
        self.shared.set_lifecycle(Lifecycle::Terminated);
        if self.pending.len() > 0 {
            debug!(
                instance = %self.id,
                unresolved = self.pending.len(),
                "terminating with unresolved calls"
            );
        }
        info!(instance = %self.id, "webview terminated");
        self.emit(WebviewEvent::Terminated);
    }

    pub(crate) fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::ScriptMessage(body) => self.handle_script_message(&body),
            BackendEvent::PageLoad { state, url } => {
                debug!(instance = %self.id, ?state, url = %url, "page load");
                if state == PageLoadState::Finished {
                    self.navigator.set_location(url.clone());
                }
                self.emit(WebviewEvent::PageLoad { state, url });
            }
            BackendEvent::TitleChanged(title) => {
                self.emit(WebviewEvent::TitleChanged { title });
            }
            BackendEvent::NavigationFailed { url, reason } => {
                self.report_navigation_failure(url, reason);
            }
            BackendEvent::CloseRequested => {
                self.emit(WebviewEvent::CloseRequested);
                self.finish();
            }
        }
    }

    pub(crate) fn report_navigation_failure(&mut self, url: String, reason: String) {
        warn!(instance = %self.id, url = %url, reason = %reason, "navigation failed");
        self.diagnostics.navigation_failures += 1;
        self.emit(WebviewEvent::NavigationFailed { url, reason });
    }
}
