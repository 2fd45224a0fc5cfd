//! The webview instance.
//!
//! A [`Webview`] lives on the thread that created it (it is `!Send`). Other
//! threads reach it through a [`WebviewHandle`], whose messages are drained
//! by [`Webview::run`] in FIFO order.

use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

use tracing::{debug, info};
use weave_common::{Bounds, Result, SizeHint, WeaveError};

use crate::bind::{BindTable, PendingCalls};
use crate::config::WebviewConfig;
use crate::events::WebviewEvent;
use crate::nav::Navigator;
use crate::platform::headless::{HeadlessBackend, HeadlessPage};
use crate::platform::{self, Backend, Load};
use crate::queue::{UiMessage, WebviewHandle};
use crate::registry::{self, InstanceId, Lifecycle, Shared};

mod binding;
mod content;
mod lifecycle;
mod window;

#[cfg(test)]
mod tests;

const BLANK_DOCUMENT: &str = "<html><body></body></html>";

/// Counters for conditions that are logged and otherwise ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Script messages that were valid bridge calls.
    pub calls_received: u64,
    /// Calls rejected before reaching a callback (unbound name, pending cap).
    pub calls_rejected: u64,
    /// Script messages or call arguments that failed to parse.
    pub malformed_calls: u64,
    /// Resolutions for ids that were unknown or already settled.
    pub stale_resolutions: u64,
    pub navigation_failures: u64,
}

type EventHandler = Box<dyn FnMut(&WebviewEvent)>;

/// A webview instance: one window (or embedded view) plus its page.
pub struct Webview {
    id: InstanceId,
    shared: Arc<Shared>,
    mailbox: Receiver<UiMessage>,
    backend: Box<dyn Backend>,
    binds: BindTable,
    pending: PendingCalls,
    navigator: Navigator,
    title: String,
    bounds: Bounds,
    size_hint: SizeHint,
    events: Vec<WebviewEvent>,
    event_handler: Option<EventHandler>,
    diagnostics: Diagnostics,
    /// Set while `run` or `run_once` is on the stack.
    looping: bool,
}

impl Webview {
    /// Create an instance on the platform backend.
    pub fn new(config: WebviewConfig) -> Result<Self> {
        let backend = platform::create_backend(&config)?;
        Self::with_backend(config, backend)
    }

    /// Create an instance on the headless backend and return its page probe.
    pub fn headless(config: WebviewConfig) -> Result<(Self, HeadlessPage)> {
        let (backend, page) = HeadlessBackend::new(&config);
        let webview = Self::with_backend(config, Box::new(backend))?;
        Ok((webview, page))
    }

    /// Create an instance on a caller-supplied backend.
    pub fn with_backend(config: WebviewConfig, backend: Box<dyn Backend>) -> Result<Self> {
        let (sender, mailbox) = mpsc::channel();
        let shared = Arc::new(Shared::new(sender, backend.waker()));
        let id = registry::register(Arc::clone(&shared));

        // From here on, an early return drops `webview`, which unregisters it.
        let mut webview = Self {
            id,
            shared,
            mailbox,
            backend,
            binds: BindTable::default(),
            pending: PendingCalls::new(config.max_pending_calls),
            navigator: Navigator::new(config.allowed_schemes.clone()),
            title: config.title.clone(),
            bounds: config.bounds,
            size_hint: config.size_hint,
            events: Vec::new(),
            event_handler: None,
            diagnostics: Diagnostics::default(),
            looping: false,
        };

        webview.backend.set_title(&config.title)?;
        webview.backend.set_bounds(config.bounds, config.size_hint)?;
        let scripts = webview.init_scripts();
        webview.backend.load(Load::Html(BLANK_DOCUMENT), &scripts)?;

        info!(
            instance = %id,
            bounds = %config.bounds,
            embedded = config.parent.is_some(),
            "webview created"
        );
        Ok(webview)
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Thread-safe handle for dispatch, resolve and terminate.
    pub fn handle(&self) -> WebviewHandle {
        WebviewHandle::from_id(self.id)
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.shared.lifecycle()
    }

    pub fn is_terminated(&self) -> bool {
        self.lifecycle() == Lifecycle::Terminated
    }

    pub fn diagnostics(&self) -> Diagnostics {
        self.diagnostics
    }

    /// Number of script calls waiting for a resolution.
    pub fn pending_calls(&self) -> usize {
        self.pending.len()
    }

    /// Register a handler for instance events. Replaces any previous handler;
    /// while none is set, events are buffered for [`drain_events`](Self::drain_events).
    pub fn on_event<F>(&mut self, handler: F)
    where
        F: FnMut(&WebviewEvent) + 'static,
    {
        self.event_handler = Some(Box::new(handler));
    }

    /// Take all buffered events.
    pub fn drain_events(&mut self) -> Vec<WebviewEvent> {
        std::mem::take(&mut self.events)
    }

    /// Destroy the instance. Outstanding handles turn invalid.
    pub fn destroy(self) {
        drop(self);
    }

    fn emit(&mut self, event: WebviewEvent) {
        match &mut self.event_handler {
            Some(handler) => handler(&event),
            None => self.events.push(event),
        }
    }

    fn ensure_usable(&self) -> Result<()> {
        if self.is_terminated() {
            return Err(WeaveError::InvalidInstance(format!(
                "{} has terminated",
                self.id
            )));
        }
        Ok(())
    }

    fn init_scripts(&self) -> Vec<String> {
        self.navigator.compose(self.binds.names())
    }
}

impl Drop for Webview {
    fn drop(&mut self) {
        self.shared.set_lifecycle(Lifecycle::Terminated);
        registry::unregister(self.id);
        let discarded = self.mailbox.try_iter().count();
        if discarded > 0 {
            debug!(instance = %self.id, discarded, "queued messages discarded");
        }
        info!(instance = %self.id, "webview destroyed");
    }
}
