//! Windowless backend.
//!
//! Nothing is rendered. The simulated page understands the bridge's own
//! script forms (stub installation, promise settlement, `name(args)` calls to
//! installed stubs) and records everything else, which is enough to drive an
//! instance end to end in tests and in `weave --headless`.
//!
//! [`HeadlessPage`] is the page side: it can be moved to other threads to
//! invoke bound functions and observe what the host evaluated.

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::ffi::c_void;
use std::ptr::NonNull;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, OnceLock};
use std::time::{Duration, Instant};

use regex::Regex;
use serde_json::{json, Value};
use tracing::{debug, trace};
use weave_common::{new_request_id, Bounds, SizeHint};

use super::{Backend, BackendEvent, Load, Result, Waker};
use crate::config::WebviewConfig;
use crate::events::PageLoadState;

/// One entry in the page's script log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptRecord {
    /// A new document started loading.
    Navigate(String),
    /// Initialization script run for the current document.
    Init(String),
    /// The document's onload point. Init scripts are always recorded before
    /// it.
    Loaded(String),
    /// Script evaluated in the current document that was not a bridge form.
    Eval(String),
}

/// A promise settled by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub request_id: String,
    pub status: i32,
    pub value: Value,
}

#[derive(Default)]
struct PageState {
    title: String,
    bounds: Bounds,
    min_size: Option<(u32, u32)>,
    max_size: Option<(u32, u32)>,
    resizable: bool,
    location: Option<String>,
    html: Option<String>,
    loads: usize,
    records: Vec<ScriptRecord>,
    stubs: BTreeSet<String>,
    outstanding: HashSet<String>,
    settlements: Vec<Settlement>,
    events: VecDeque<BackendEvent>,
    woken: bool,
    navigation_failure: Option<String>,
}

struct Page {
    state: Mutex<PageState>,
    signal: Condvar,
}

impl Page {
    fn lock(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn wait_timeout<'a>(
        &self,
        guard: MutexGuard<'a, PageState>,
        timeout: Duration,
    ) -> MutexGuard<'a, PageState> {
        match self.signal.wait_timeout(guard, timeout) {
            Ok((guard, _)) => guard,
            Err(poisoned) => poisoned.into_inner().0,
        }
    }
}

fn settle_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)^\s*window\.__weave__\.settle\((.*)\)\s*;?\s*$").expect("valid regex")
    })
}

fn bind_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)^\s*window\.__weave__\.bind\((.*)\)\s*;?\s*$").expect("valid regex")
    })
}

fn call_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)^\s*(?:window\.)?([A-Za-z_$][A-Za-z0-9_$]*)\((.*)\)\s*;?\s*$")
            .expect("valid regex")
    })
}

/// Post a bridge call the way the bootstrap's `call` does. Returns the id.
fn post_call(state: &mut PageState, name: &str, params: String) -> String {
    let id = new_request_id();
    state.outstanding.insert(id.clone());
    let body = json!({ "id": id, "name": name, "params": params }).to_string();
    state.events.push_back(BackendEvent::ScriptMessage(body));
    id
}

/// Run `script` against the simulated document. `record` is logged when the
/// script is not one of the bridge forms.
fn execute(state: &mut PageState, script: &str, record: Option<ScriptRecord>) {
    if let Some(caps) = settle_re().captures(script) {
        let parsed: Option<Vec<Value>> = serde_json::from_str(&format!("[{}]", &caps[1])).ok();
        if let Some([Value::String(id), status, value]) = parsed.as_deref() {
            // Mirrors the bootstrap: unknown or already settled ids are no-ops.
            if state.outstanding.remove(id) {
                state.settlements.push(Settlement {
                    request_id: id.clone(),
                    status: status.as_i64().unwrap_or(1) as i32,
                    value: value.clone(),
                });
            }
            return;
        }
    }

    if let Some(caps) = bind_re().captures(script) {
        if let Ok(name) = serde_json::from_str::<String>(&caps[1]) {
            state.stubs.insert(name);
            return;
        }
    }

    if let Some(caps) = call_re().captures(script) {
        let name = &caps[1];
        if state.stubs.contains(name) {
            let params = format!("[{}]", caps[2].trim());
            post_call(state, name, params);
            return;
        }
    }

    if let Some(record) = record {
        state.records.push(record);
    }
}

/// Headless [`Backend`] implementation.
pub struct HeadlessBackend {
    page: Arc<Page>,
}

/// Page-side probe of a [`HeadlessBackend`].
#[derive(Clone)]
pub struct HeadlessPage {
    page: Arc<Page>,
}

struct PageWaker(Arc<Page>);

impl Waker for PageWaker {
    fn wake(&self) {
        self.0.lock().woken = true;
        self.0.signal.notify_all();
    }
}

impl HeadlessBackend {
    pub fn new(config: &WebviewConfig) -> (Self, HeadlessPage) {
        let state = PageState {
            title: config.title.clone(),
            bounds: config.bounds,
            resizable: true,
            ..Default::default()
        };
        let page = Arc::new(Page {
            state: Mutex::new(state),
            signal: Condvar::new(),
        });
        (
            Self {
                page: Arc::clone(&page),
            },
            HeadlessPage { page },
        )
    }
}

impl Backend for HeadlessBackend {
    fn set_title(&mut self, title: &str) -> Result<()> {
        self.page.lock().title = title.to_string();
        Ok(())
    }

    fn set_bounds(&mut self, bounds: Bounds, hint: SizeHint) -> Result<()> {
        let mut state = self.page.lock();
        match hint {
            SizeHint::None => {
                state.bounds = bounds;
                state.resizable = true;
            }
            SizeHint::Min => state.min_size = Some((bounds.width, bounds.height)),
            SizeHint::Max => state.max_size = Some((bounds.width, bounds.height)),
            SizeHint::Fixed => {
                state.bounds = bounds;
                state.resizable = false;
            }
        }
        Ok(())
    }

    fn load(&mut self, load: Load<'_>, init_scripts: &[String]) -> Result<()> {
        let mut state = self.page.lock();
        let url = match load {
            Load::Url(url) => {
                if let Some(reason) = state.navigation_failure.take() {
                    debug!(url, reason = %reason, "headless navigation failed");
                    state.events.push_back(BackendEvent::NavigationFailed {
                        url: url.to_string(),
                        reason,
                    });
                    self.page.signal.notify_all();
                    return Ok(());
                }
                state.html = None;
                url.to_string()
            }
            Load::Html(html) => {
                state.html = Some(html.to_string());
                "about:blank".to_string()
            }
        };

        // New document: stubs and pending promises of the old one are gone.
        state.stubs.clear();
        state.outstanding.clear();
        state.loads += 1;
        state.location = Some(url.clone());
        state.records.push(ScriptRecord::Navigate(url.clone()));
        state.events.push_back(BackendEvent::PageLoad {
            state: PageLoadState::Started,
            url: url.clone(),
        });
        for script in init_scripts {
            state.records.push(ScriptRecord::Init(script.clone()));
            execute(&mut state, script, None);
        }
        state.records.push(ScriptRecord::Loaded(url.clone()));
        state.events.push_back(BackendEvent::PageLoad {
            state: PageLoadState::Finished,
            url,
        });
        self.page.signal.notify_all();
        Ok(())
    }

    fn eval(&mut self, script: &str) -> Result<()> {
        trace!(len = script.len(), "headless eval");
        let mut state = self.page.lock();
        execute(&mut state, script, Some(ScriptRecord::Eval(script.to_string())));
        self.page.signal.notify_all();
        Ok(())
    }

    fn window_handle(&self) -> Option<NonNull<c_void>> {
        None
    }

    fn waker(&self) -> Arc<dyn Waker> {
        Arc::new(PageWaker(Arc::clone(&self.page)))
    }

    fn pump(&mut self, timeout: Option<Duration>) -> Vec<BackendEvent> {
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut state = self.page.lock();
        while state.events.is_empty() && !state.woken {
            let wait = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        break;
                    }
                    deadline - now
                }
                None => Duration::from_secs(3600),
            };
            state = self.page.wait_timeout(state, wait);
        }
        state.woken = false;
        state.events.drain(..).collect()
    }
}

impl HeadlessPage {
    /// Call bound function `name` the way its stub would. Returns the
    /// request id. The call is posted even when no stub is installed, like a
    /// direct `window.__weave__.call(name, args)`.
    pub fn invoke(&self, name: &str, args: &Value) -> String {
        self.invoke_raw(name, &args.to_string())
    }

    /// Like [`invoke`](Self::invoke) with the argument text sent verbatim.
    pub fn invoke_raw(&self, name: &str, params: &str) -> String {
        let mut state = self.page.lock();
        let id = post_call(&mut state, name, params.to_string());
        self.page.signal.notify_all();
        id
    }

    /// Deliver an arbitrary `window.ipc.postMessage` body.
    pub fn post_message(&self, body: impl Into<String>) {
        self.page
            .lock()
            .events
            .push_back(BackendEvent::ScriptMessage(body.into()));
        self.page.signal.notify_all();
    }

    /// Simulate the user closing the window.
    pub fn close(&self) {
        self.page.lock().events.push_back(BackendEvent::CloseRequested);
        self.page.signal.notify_all();
    }

    /// Make the next URL load fail with `reason`.
    pub fn fail_next_navigation(&self, reason: impl Into<String>) {
        self.page.lock().navigation_failure = Some(reason.into());
    }

    pub fn title(&self) -> String {
        self.page.lock().title.clone()
    }

    pub fn bounds(&self) -> Bounds {
        self.page.lock().bounds
    }

    pub fn min_size(&self) -> Option<(u32, u32)> {
        self.page.lock().min_size
    }

    pub fn max_size(&self) -> Option<(u32, u32)> {
        self.page.lock().max_size
    }

    pub fn resizable(&self) -> bool {
        self.page.lock().resizable
    }

    pub fn location(&self) -> Option<String> {
        self.page.lock().location.clone()
    }

    pub fn html(&self) -> Option<String> {
        self.page.lock().html.clone()
    }

    /// Number of documents loaded so far.
    pub fn loads(&self) -> usize {
        self.page.lock().loads
    }

    pub fn records(&self) -> Vec<ScriptRecord> {
        self.page.lock().records.clone()
    }

    /// Scripts evaluated in documents (excluding bridge forms).
    pub fn evaluated(&self) -> Vec<String> {
        self.page
            .lock()
            .records
            .iter()
            .filter_map(|r| match r {
                ScriptRecord::Eval(s) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }

    /// Names with a stub installed in the current document.
    pub fn stubs(&self) -> Vec<String> {
        self.page.lock().stubs.iter().cloned().collect()
    }

    pub fn settlements(&self) -> Vec<Settlement> {
        self.page.lock().settlements.clone()
    }

    pub fn settlement(&self, request_id: &str) -> Option<Settlement> {
        self.page
            .lock()
            .settlements
            .iter()
            .find(|s| s.request_id == request_id)
            .cloned()
    }

    /// Block until `request_id` is settled or `timeout` elapses.
    pub fn wait_for_settlement(&self, request_id: &str, timeout: Duration) -> Option<Settlement> {
        let deadline = Instant::now() + timeout;
        let mut state = self.page.lock();
        loop {
            if let Some(found) = state.settlements.iter().find(|s| s.request_id == request_id) {
                return Some(found.clone());
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            state = self.page.wait_timeout(state, deadline - now);
        }
    }

    /// `true` while `request_id` has not been settled.
    pub fn is_outstanding(&self, request_id: &str) -> bool {
        self.page.lock().outstanding.contains(request_id)
    }
}
