use std::ffi::c_void;
use std::ptr::NonNull;
use std::sync::Arc;
use std::time::Duration;

use weave_common::{Bounds, PlatformError, SizeHint};

use crate::config::WebviewConfig;
use crate::events::PageLoadState;

pub mod headless;
#[cfg(feature = "native")]
pub mod native;

pub type Result<T> = std::result::Result<T, PlatformError>;

/// Interrupts a blocking [`Backend::pump`] from any thread.
pub trait Waker: Send + Sync {
    fn wake(&self);
}

/// Content for a new document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Load<'a> {
    Url(&'a str),
    Html(&'a str),
}

/// Raw notifications from the window and page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    /// Body of a `window.ipc.postMessage` call.
    ScriptMessage(String),
    PageLoad { state: PageLoadState, url: String },
    TitleChanged(String),
    NavigationFailed { url: String, reason: String },
    CloseRequested,
}

/// Window + browser engine behind one instance. Lives on the UI thread.
pub trait Backend {
    fn set_title(&mut self, title: &str) -> Result<()>;

    fn set_bounds(&mut self, bounds: Bounds, hint: SizeHint) -> Result<()>;

    /// Replace the document. `init_scripts` run, in order, before any page
    /// script of the new document.
    fn load(&mut self, load: Load<'_>, init_scripts: &[String]) -> Result<()>;

    /// Evaluate in the current document; the result is discarded.
    fn eval(&mut self, script: &str) -> Result<()>;

    /// Native window (`HWND`, `NSView*`, X11 window id), if there is one.
    fn window_handle(&self) -> Option<NonNull<c_void>>;

    fn waker(&self) -> Arc<dyn Waker>;

    /// Process native events, blocking up to `timeout` (`None` = until
    /// something happens or the waker fires).
    fn pump(&mut self, timeout: Option<Duration>) -> Vec<BackendEvent>;
}

/// Create the platform-appropriate backend.
///
/// With the `native` feature: a winit window hosting a wry webview.
/// Otherwise: the headless backend.
pub fn create_backend(config: &WebviewConfig) -> Result<Box<dyn Backend>> {
    #[cfg(feature = "native")]
    {
        Ok(Box::new(native::NativeBackend::new(config)?))
    }
    #[cfg(not(feature = "native"))]
    {
        let (backend, _page) = headless::HeadlessBackend::new(config);
        Ok(Box::new(backend))
    }
}
