//! The exported `webview_*` functions.
//!
//! Every function returns a status code from [`crate::codes`] unless noted.
//! Strings are NUL-terminated UTF-8 and are copied before the call returns.
//! `webview_terminate`, `webview_dispatch` and `webview_return` may be called
//! from any thread; everything else must run on the thread that called
//! `webview_create`.

use std::ffi::{c_char, c_int, c_void, CStr, CString};
use std::panic::{self, AssertUnwindSafe};

use tracing::{error, warn};
use tracing_subscriber::EnvFilter;
use weave_common::{Bounds, Result, SizeHint, WeaveError};
use weave_core::{ParentWindow, Webview, WebviewConfig};

use crate::codes::{self, WEBVIEW_ERROR_UNSPECIFIED};
use crate::instances::{self, webview_t, with_active, with_webview};

/// Callback run on the UI thread by `webview_dispatch`.
#[allow(non_camel_case_types)]
pub type webview_dispatch_fn = unsafe extern "C" fn(w: webview_t, arg: *mut c_void);

/// Callback for a bound function: request id, JSON array of arguments, user
/// data.
#[allow(non_camel_case_types)]
pub type webview_bind_fn = unsafe extern "C" fn(id: *const c_char, req: *const c_char, arg: *mut c_void);

/// User data carried into a dispatched task. The caller vouches for it.
struct SendPtr(*mut c_void);

unsafe impl Send for SendPtr {}

impl SendPtr {
    fn get(self) -> *mut c_void {
        self.0
    }
}

fn guard(f: impl FnOnce() -> Result<()>) -> c_int {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => {
            if let Err(e) = &result {
                warn!(error = %e, "webview call failed");
            }
            codes::status(result)
        }
        Err(_) => {
            error!("panic inside webview call");
            WEBVIEW_ERROR_UNSPECIFIED
        }
    }
}

/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that stays valid
/// for the duration of the call.
unsafe fn text<'a>(ptr: *const c_char, what: &str) -> Result<&'a str> {
    if ptr.is_null() {
        return Err(WeaveError::InvalidArgument(format!("{what} is null")));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| WeaveError::InvalidArgument(format!("{what} is not UTF-8")))
}

fn size_hint(hints: c_int) -> Result<SizeHint> {
    SizeHint::from_flags(hints)
        .ok_or_else(|| WeaveError::InvalidArgument(format!("unknown size hint {hints}")))
}

fn dimension(value: c_int, what: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| WeaveError::InvalidArgument(format!("{what} is negative")))
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("weave=debug"));
    // A host that installed its own subscriber keeps it.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

// =============================================================================
// Lifecycle
// =============================================================================

/// Create an instance owned by the calling thread. Returns `0` on failure.
///
/// A non-zero `debug` enables developer tools and debug logging. A non-null
/// `window` embeds the view in that native parent window.
///
/// # Safety
/// `window` must be null or a valid native window handle for the platform.
#[no_mangle]
pub unsafe extern "C" fn webview_create(debug: c_int, window: *mut c_void) -> webview_t {
    if debug != 0 {
        init_logging();
    }
    let config = WebviewConfig::default()
        .with_devtools(debug != 0)
        .with_parent(ParentWindow::new(window));

    match panic::catch_unwind(AssertUnwindSafe(|| Webview::new(config))) {
        Ok(Ok(webview)) => instances::adopt(webview),
        Ok(Err(e)) => {
            error!(error = %e, "webview creation failed");
            0
        }
        Err(_) => {
            error!("panic during webview creation");
            0
        }
    }
}

/// Destroy the instance. From inside one of its callbacks, the loop is
/// terminated and the instance is freed when `webview_run` returns.
#[no_mangle]
pub extern "C" fn webview_destroy(w: webview_t) -> c_int {
    guard(|| instances::destroy(w))
}

/// Run the event loop until the instance terminates.
#[no_mangle]
pub extern "C" fn webview_run(w: webview_t) -> c_int {
    guard(|| with_webview(w, |webview| webview.run()))
}

/// Stop the event loop. Any thread.
#[no_mangle]
pub extern "C" fn webview_terminate(w: webview_t) -> c_int {
    guard(|| instances::handle(w)?.terminate())
}

/// Queue `f(w, arg)` to run on the UI thread. Any thread.
///
/// # Safety
/// `f` must be safe to call with `arg` on the UI thread.
#[no_mangle]
pub unsafe extern "C" fn webview_dispatch(
    w: webview_t,
    f: Option<webview_dispatch_fn>,
    arg: *mut c_void,
) -> c_int {
    guard(|| {
        let f = f.ok_or_else(|| WeaveError::InvalidArgument("dispatch function is null".into()))?;
        let arg = SendPtr(arg);
        instances::handle(w)?.dispatch(move |webview| {
            let arg = arg.get();
            let raw = webview.id().to_raw();
            with_active(webview, || f(raw, arg));
        })
    })
}

// =============================================================================
// Window
// =============================================================================

/// Native window handle, or null when there is none.
#[no_mangle]
pub extern "C" fn webview_get_window(w: webview_t) -> *mut c_void {
    with_webview(w, |webview| Ok(webview.window_handle()))
        .ok()
        .flatten()
        .map_or(std::ptr::null_mut(), |handle| handle.as_ptr())
}

/// # Safety
/// `title` must be a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn webview_set_title(w: webview_t, title: *const c_char) -> c_int {
    guard(|| {
        let title = text(title, "title")?;
        with_webview(w, |webview| webview.set_title(title))
    })
}

/// Set position and size. `hints` is 0 (none), 1 (min), 2 (max) or 3 (fixed).
#[no_mangle]
pub extern "C" fn webview_set_bounds(
    w: webview_t,
    x: c_int,
    y: c_int,
    width: c_int,
    height: c_int,
    hints: c_int,
) -> c_int {
    guard(|| {
        let bounds = Bounds::new(x, y, dimension(width, "width")?, dimension(height, "height")?);
        let hint = size_hint(hints)?;
        with_webview(w, |webview| webview.set_bounds(bounds, hint))
    })
}

/// Write the current position, size and size hint through the out-pointers.
///
/// # Safety
/// Every pointer must be valid for a `c_int` write.
#[no_mangle]
pub unsafe extern "C" fn webview_get_bounds(
    w: webview_t,
    x: *mut c_int,
    y: *mut c_int,
    width: *mut c_int,
    height: *mut c_int,
    hints: *mut c_int,
) -> c_int {
    guard(|| {
        if [x, y, width, height, hints].iter().any(|p| p.is_null()) {
            return Err(WeaveError::InvalidArgument("bounds out-pointer is null".into()));
        }
        let (bounds, hint) = with_webview(w, |webview| Ok((webview.bounds(), webview.size_hint())))?;
        let to_c = |value: u32| {
            c_int::try_from(value)
                .map_err(|_| WeaveError::InvalidState(format!("dimension {value} overflows int")))
        };
        let (w_out, h_out) = (to_c(bounds.width)?, to_c(bounds.height)?);
        *x = bounds.x;
        *y = bounds.y;
        *width = w_out;
        *height = h_out;
        *hints = hint.as_flags();
        Ok(())
    })
}

#[no_mangle]
pub extern "C" fn webview_set_size(w: webview_t, width: c_int, height: c_int, hints: c_int) -> c_int {
    guard(|| {
        let (width, height) = (dimension(width, "width")?, dimension(height, "height")?);
        let hint = size_hint(hints)?;
        with_webview(w, |webview| webview.set_size(width, height, hint))
    })
}

// =============================================================================
// Content
// =============================================================================

/// Load `url`. Load failures are reported as events, not as a status.
///
/// # Safety
/// `url` must be a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn webview_navigate(w: webview_t, url: *const c_char) -> c_int {
    guard(|| {
        let url = text(url, "url")?;
        with_webview(w, |webview| webview.navigate(url))
    })
}

/// # Safety
/// `html` must be a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn webview_set_html(w: webview_t, html: *const c_char) -> c_int {
    guard(|| {
        let html = text(html, "html")?;
        with_webview(w, |webview| webview.set_html(html))
    })
}

/// Run `js` before page scripts on every later page load.
///
/// # Safety
/// `js` must be a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn webview_init(w: webview_t, js: *const c_char) -> c_int {
    guard(|| {
        let js = text(js, "script")?;
        with_webview(w, |webview| webview.init(js))
    })
}

/// Evaluate `js` in the current document. No result is returned.
///
/// # Safety
/// `js` must be a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn webview_eval(w: webview_t, js: *const c_char) -> c_int {
    guard(|| {
        let js = text(js, "script")?;
        with_webview(w, |webview| webview.eval(js))
    })
}

// =============================================================================
// Binding
// =============================================================================

/// Expose `name` to script. Each call invokes `f(id, args, arg)` on the UI
/// thread; answer it with `webview_return(w, id, ...)`. Calls whose arguments
/// are not a JSON array are rejected without reaching `f`.
///
/// # Safety
/// `name` must be a valid NUL-terminated string and `f` must be safe to call
/// with `arg` on the UI thread for as long as the binding exists.
#[no_mangle]
pub unsafe extern "C" fn webview_bind(
    w: webview_t,
    name: *const c_char,
    f: Option<webview_bind_fn>,
    arg: *mut c_void,
) -> c_int {
    guard(|| {
        let name = text(name, "name")?;
        let f = f.ok_or_else(|| WeaveError::InvalidArgument("bind function is null".into()))?;
        with_webview(w, |webview| {
            webview.bind(name, move |webview, request| {
                let rejection = match request.args() {
                    Err(e) => Some(e.to_script_value()),
                    Ok(_) => None,
                };
                let strings = (CString::new(request.id()), CString::new(request.raw_args()));
                let (Ok(id), Ok(args)) = strings else {
                    let err = WeaveError::MalformedArguments("call contains a NUL byte".into());
                    let _ = webview.resolve(request.id(), 1, &err.to_script_value().to_string());
                    return;
                };
                if let Some(reason) = rejection {
                    let _ = webview.resolve(request.id(), 1, &reason.to_string());
                    return;
                }
                with_active(webview, || f(id.as_ptr(), args.as_ptr(), arg));
            })
        })
    })
}

/// # Safety
/// `name` must be a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn webview_unbind(w: webview_t, name: *const c_char) -> c_int {
    guard(|| {
        let name = text(name, "name")?;
        with_webview(w, |webview| webview.unbind(name))
    })
}

/// Settle the script call `id`. `status == 0` resolves its promise with the
/// JSON `result`; any other status rejects it. Any thread; from other threads
/// the resolution is queued and unknown ids are only logged.
///
/// # Safety
/// `id` and `result` must be valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn webview_return(
    w: webview_t,
    id: *const c_char,
    status: c_int,
    result: *const c_char,
) -> c_int {
    guard(|| {
        let id = text(id, "request id")?;
        let result = text(result, "result")?;
        if instances::is_owner_thread(w) {
            with_webview(w, |webview| webview.resolve(id, status, result))
        } else {
            instances::handle(w)?.resolve(id, status, result)
        }
    })
}

// =============================================================================
// Misc
// =============================================================================

/// Library version, a static NUL-terminated string.
#[no_mangle]
pub extern "C" fn webview_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr().cast()
}

/// Static description of a status code.
#[no_mangle]
pub extern "C" fn webview_strerror(code: c_int) -> *const c_char {
    codes::describe_ptr(code)
}
