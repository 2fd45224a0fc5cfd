use std::ffi::c_void;
use std::ptr::NonNull;

use weave_common::{Bounds, SizeHint};
use weave_config::schema::DEFAULT_ALLOWED_SCHEMES;
use weave_config::WeaveConfig;

/// Host-owned native window to embed into instead of creating a top-level
/// window (`HWND` on Windows, `NSView*` on macOS).
///
/// The pointer must stay valid for as long as the instance lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentWindow(NonNull<c_void>);

impl ParentWindow {
    pub fn new(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    pub fn as_ptr(self) -> *mut c_void {
        self.0.as_ptr()
    }

    pub fn as_non_null(self) -> NonNull<c_void> {
        self.0
    }
}

/// Configuration for creating a new webview instance.
#[derive(Debug, Clone)]
pub struct WebviewConfig {
    pub title: String,
    pub bounds: Bounds,
    pub size_hint: SizeHint,
    /// Enable developer tools (always on in debug builds).
    pub devtools: bool,
    pub user_agent: Option<String>,
    pub parent: Option<ParentWindow>,
    /// URL schemes `navigate` accepts.
    pub allowed_schemes: Vec<String>,
    /// Cap on script calls awaiting a host resolution.
    pub max_pending_calls: usize,
}

impl Default for WebviewConfig {
    fn default() -> Self {
        Self {
            title: "weave".to_string(),
            bounds: Bounds::default(),
            size_hint: SizeHint::None,
            devtools: cfg!(debug_assertions),
            user_agent: None,
            parent: None,
            allowed_schemes: DEFAULT_ALLOWED_SCHEMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_pending_calls: 1024,
        }
    }
}

impl WebviewConfig {
    /// Build from the loaded settings file.
    pub fn from_settings(settings: &WeaveConfig) -> Self {
        let window = &settings.window;
        Self {
            title: window.title.clone(),
            bounds: Bounds::default().with_size(window.width, window.height),
            size_hint: window.size_hint,
            devtools: window.devtools,
            user_agent: window.user_agent.clone(),
            parent: None,
            allowed_schemes: settings.navigation.allowed_schemes.clone(),
            max_pending_calls: usize::try_from(settings.bridge.max_pending_calls)
                .unwrap_or(usize::MAX),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_parent(mut self, parent: Option<ParentWindow>) -> Self {
        self.parent = parent;
        self
    }

    pub fn with_devtools(mut self, devtools: bool) -> Self {
        self.devtools = devtools;
        self
    }
}
