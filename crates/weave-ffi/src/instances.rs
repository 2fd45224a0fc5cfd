//! Per-thread ownership of instances created through the C ABI.
//!
//! A `webview_t` is the raw value of an [`InstanceId`]. The `Webview` it names
//! lives in a thread-local table of the creating thread, so UI-thread entry
//! points can only reach it from there. While the event loop is running, the
//! instance is out of the table; callbacks invoked by the loop publish it in
//! the active stack so that they can re-enter the ABI.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::thread;

use tracing::debug;
use weave_common::{Result, WeaveError};
use weave_core::registry;
use weave_core::{InstanceId, Webview, WebviewHandle};

/// Opaque instance handle. `0` is never a valid handle.
#[allow(non_camel_case_types)]
pub type webview_t = u64;

thread_local! {
    static OWNED: RefCell<HashMap<InstanceId, Box<Webview>>> = RefCell::new(HashMap::new());
    static ACTIVE: RefCell<Vec<(InstanceId, *mut Webview)>> = const { RefCell::new(Vec::new()) };
    /// Destroyed while the loop was running; dropped when the loop returns.
    static DOOMED: RefCell<HashSet<InstanceId>> = RefCell::new(HashSet::new());
}

pub(crate) fn decode(w: webview_t) -> Result<InstanceId> {
    InstanceId::from_raw(w).ok_or_else(|| WeaveError::InvalidInstance(format!("handle {w:#x}")))
}

pub(crate) fn handle(w: webview_t) -> Result<WebviewHandle> {
    decode(w).map(WebviewHandle::from_id)
}

/// Take ownership of a freshly created instance on the current thread.
pub(crate) fn adopt(webview: Webview) -> webview_t {
    let id = webview.id();
    OWNED.with(|owned| owned.borrow_mut().insert(id, Box::new(webview)));
    id.to_raw()
}

fn check_thread(id: InstanceId) -> Result<()> {
    match registry::owner_thread(id) {
        None => Err(WeaveError::InvalidInstance(id.to_string())),
        Some(owner) if owner != thread::current().id() => Err(WeaveError::WrongThread),
        Some(_) => Ok(()),
    }
}

fn active(id: InstanceId) -> Option<*mut Webview> {
    ACTIVE.with(|stack| {
        stack
            .borrow()
            .iter()
            .rev()
            .find(|(active, _)| *active == id)
            .map(|(_, ptr)| *ptr)
    })
}

/// `true` when `w` names an instance owned by the calling thread.
pub(crate) fn is_owner_thread(w: webview_t) -> bool {
    decode(w).and_then(check_thread).is_ok()
}

/// Run `f` against the instance `w` on its owner thread.
pub(crate) fn with_webview<T>(w: webview_t, f: impl FnOnce(&mut Webview) -> Result<T>) -> Result<T> {
    let id = decode(w)?;
    check_thread(id)?;

    if let Some(ptr) = active(id) {
        // SAFETY: the pointer was published by `with_active` from a live
        // `&mut Webview` that is not used while the callback runs, and it is
        // removed before that borrow ends.
        let webview = unsafe { &mut *ptr };
        return f(webview);
    }

    let mut webview = OWNED
        .with(|owned| owned.borrow_mut().remove(&id))
        .ok_or_else(|| WeaveError::InvalidInstance(id.to_string()))?;
    let outcome = f(&mut webview);

    let doomed = DOOMED.with(|doomed| doomed.borrow_mut().remove(&id));
    if doomed {
        debug!(instance = %id, "dropping instance destroyed during its loop");
        drop(webview);
    } else {
        OWNED.with(|owned| owned.borrow_mut().insert(id, webview));
    }
    outcome
}

/// Publish `webview` for re-entrant ABI calls made by `f`.
pub(crate) fn with_active<T>(webview: &mut Webview, f: impl FnOnce() -> T) -> T {
    struct Pop;
    impl Drop for Pop {
        fn drop(&mut self) {
            ACTIVE.with(|stack| stack.borrow_mut().pop());
        }
    }

    let entry = (webview.id(), webview as *mut Webview);
    ACTIVE.with(|stack| stack.borrow_mut().push(entry));
    let _pop = Pop;
    f()
}

/// Destroy `w`. An instance whose loop is on the stack is terminated now and
/// dropped once the loop returns.
pub(crate) fn destroy(w: webview_t) -> Result<()> {
    let id = decode(w)?;
    check_thread(id)?;

    if let Some(webview) = OWNED.with(|owned| owned.borrow_mut().remove(&id)) {
        webview.destroy();
        return Ok(());
    }
    if active(id).is_some() {
        DOOMED.with(|doomed| doomed.borrow_mut().insert(id));
        return WebviewHandle::from_id(id).terminate();
    }
    Err(WeaveError::InvalidInstance(id.to_string()))
}

#[cfg(test)]
pub(crate) fn owned_count() -> usize {
    OWNED.with(|owned| owned.borrow().len())
}
