//! winit window + wry webview.
//!
//! The instance's loop drives winit through `pump_app_events`, so the host
//! thread keeps ownership of the loop between iterations. winit allows one
//! event loop per process; creating a second native instance fails with
//! `EventLoopError`.

use std::ffi::c_void;
use std::ptr::NonNull;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, info, warn};
use weave_common::{Bounds, PlatformError, SizeHint};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalPosition, LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowAttributes, WindowId};
use wry::raw_window_handle::{self, HasWindowHandle, RawWindowHandle};
use wry::{WebView, WebViewBuilder};

use super::{Backend, BackendEvent, Load, Result, Waker};
use crate::config::{ParentWindow, WebviewConfig};
use crate::events::PageLoadState;

type EventSink = Arc<Mutex<Vec<BackendEvent>>>;

fn push(events: &EventSink, event: BackendEvent) {
    if let Ok(mut evts) = events.lock() {
        evts.push(event);
    }
}

/// User event used only to interrupt a blocking pump.
#[derive(Debug, Clone, Copy)]
struct Wake;

struct ProxyWaker(Mutex<EventLoopProxy<Wake>>);

impl Waker for ProxyWaker {
    fn wake(&self) {
        if let Ok(proxy) = self.0.lock() {
            // Fails only once the loop is gone.
            let _ = proxy.send_event(Wake);
        }
    }
}

struct WindowState {
    /// `None` when embedding into a host-owned parent.
    attributes: Option<WindowAttributes>,
    window: Option<Window>,
    creation_error: Option<String>,
    resized: Option<PhysicalSize<u32>>,
    events: EventSink,
}

impl ApplicationHandler<Wake> for WindowState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let Some(attributes) = self.attributes.clone() else {
            return;
        };
        match event_loop.create_window(attributes) {
            Ok(window) => self.window = Some(window),
            Err(e) => self.creation_error = Some(e.to_string()),
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("window close requested");
                push(&self.events, BackendEvent::CloseRequested);
            }
            WindowEvent::Resized(size) if size.width > 0 && size.height > 0 => {
                self.resized = Some(size);
            }
            _ => {}
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, _event: Wake) {}
}

/// Borrowed view of a host window for `build_as_child`.
struct ParentHandle(RawWindowHandle);

impl HasWindowHandle for ParentHandle {
    fn window_handle(
        &self,
    ) -> std::result::Result<raw_window_handle::WindowHandle<'_>, raw_window_handle::HandleError>
    {
        // SAFETY: the host guarantees the parent outlives the instance.
        Ok(unsafe { raw_window_handle::WindowHandle::borrow_raw(self.0) })
    }
}

fn parent_handle(parent: ParentWindow) -> Result<ParentHandle> {
    #[cfg(target_os = "windows")]
    {
        let hwnd = std::num::NonZeroIsize::new(parent.as_ptr() as isize)
            .ok_or_else(|| PlatformError::WindowError("null parent window".into()))?;
        Ok(ParentHandle(RawWindowHandle::Win32(
            raw_window_handle::Win32WindowHandle::new(hwnd),
        )))
    }
    #[cfg(target_os = "macos")]
    {
        Ok(ParentHandle(RawWindowHandle::AppKit(
            raw_window_handle::AppKitWindowHandle::new(parent.as_non_null()),
        )))
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        let _ = parent;
        Err(PlatformError::NotSupported(
            "embedding into a parent window on this platform".into(),
        ))
    }
}

fn raw_pointer(handle: RawWindowHandle) -> Option<NonNull<c_void>> {
    match handle {
        RawWindowHandle::Win32(h) => NonNull::new(h.hwnd.get() as *mut c_void),
        RawWindowHandle::AppKit(h) => Some(h.ns_view),
        RawWindowHandle::Xlib(h) => NonNull::new(h.window as usize as *mut c_void),
        RawWindowHandle::Wayland(h) => Some(h.surface),
        _ => None,
    }
}

fn bounds_to_wry(bounds: Bounds) -> wry::Rect {
    wry::Rect {
        position: wry::dpi::Position::Logical(wry::dpi::LogicalPosition::new(
            f64::from(bounds.x),
            f64::from(bounds.y),
        )),
        size: wry::dpi::Size::Logical(wry::dpi::LogicalSize::new(
            f64::from(bounds.width),
            f64::from(bounds.height),
        )),
    }
}

/// Native [`Backend`]: owns the winit event loop, the window and the webview.
pub struct NativeBackend {
    event_loop: EventLoop<Wake>,
    state: WindowState,
    webview: Option<WebView>,
    /// Init scripts the current webview was built with.
    applied_scripts: Vec<String>,
    parent: Option<ParentWindow>,
    bounds: Bounds,
    devtools: bool,
    user_agent: Option<String>,
    events: EventSink,
    waker: Arc<ProxyWaker>,
    exited: bool,
}

impl NativeBackend {
    pub fn new(config: &WebviewConfig) -> Result<Self> {
        let event_loop = EventLoop::<Wake>::with_user_event()
            .build()
            .map_err(|e| PlatformError::EventLoopError(e.to_string()))?;
        let waker = Arc::new(ProxyWaker(Mutex::new(event_loop.create_proxy())));
        let events: EventSink = Arc::new(Mutex::new(Vec::new()));

        let attributes = config.parent.is_none().then(|| {
            Window::default_attributes()
                .with_title(config.title.clone())
                .with_inner_size(LogicalSize::new(config.bounds.width, config.bounds.height))
                .with_position(LogicalPosition::new(config.bounds.x, config.bounds.y))
                .with_resizable(config.size_hint != SizeHint::Fixed)
        });

        let mut backend = Self {
            event_loop,
            state: WindowState {
                attributes,
                window: None,
                creation_error: None,
                resized: None,
                events: Arc::clone(&events),
            },
            webview: None,
            applied_scripts: Vec::new(),
            parent: config.parent,
            bounds: config.bounds,
            devtools: config.devtools,
            user_agent: config.user_agent.clone(),
            events,
            waker,
            exited: false,
        };

        if backend.parent.is_none() {
            // The window is created from `resumed`, delivered on the first pumps.
            for _ in 0..16 {
                backend.pump_once(Some(Duration::ZERO));
                if backend.state.window.is_some() || backend.state.creation_error.is_some() {
                    break;
                }
            }
            if let Some(e) = backend.state.creation_error.take() {
                return Err(PlatformError::WindowError(e));
            }
            if backend.state.window.is_none() {
                return Err(PlatformError::WindowError("window was not created".into()));
            }
        }

        debug!(parent = backend.parent.is_some(), "native backend ready");
        Ok(backend)
    }

    fn pump_once(&mut self, timeout: Option<Duration>) {
        if self.exited {
            return;
        }
        if let PumpStatus::Exit(code) = self.event_loop.pump_app_events(timeout, &mut self.state) {
            debug!(code, "event loop exited");
            self.exited = true;
            push(&self.events, BackendEvent::CloseRequested);
        }
    }

    fn build_webview(&mut self, load: Load<'_>, init_scripts: &[String]) -> Result<()> {
        // Tear down the old view before building its replacement.
        self.webview = None;

        let mut builder = WebViewBuilder::new().with_devtools(self.devtools);
        for script in init_scripts {
            builder = builder.with_initialization_script(script);
        }
        if let Some(ua) = &self.user_agent {
            builder = builder.with_user_agent(ua);
        }

        let events = Arc::clone(&self.events);
        builder = builder.with_ipc_handler(move |request| {
            let body = request.body().to_string();
            debug!(body_len = body.len(), "script message");
            push(&events, BackendEvent::ScriptMessage(body));
        });

        let events = Arc::clone(&self.events);
        builder = builder.with_on_page_load_handler(move |event, url| {
            let state = PageLoadState::from(event);
            debug!(?state, url = %url, "page load");
            push(&events, BackendEvent::PageLoad { state, url });
        });

        let events = Arc::clone(&self.events);
        builder = builder.with_document_title_changed_handler(move |title| {
            push(&events, BackendEvent::TitleChanged(title));
        });

        builder = match load {
            Load::Url(url) => builder.with_url(url),
            Load::Html(html) => builder.with_html(html),
        };

        let webview = match (self.parent, &self.state.window) {
            (Some(parent), _) => {
                let handle = parent_handle(parent)?;
                builder
                    .with_bounds(bounds_to_wry(self.bounds))
                    .build_as_child(&handle)
            }
            (None, Some(window)) => builder.build(window),
            (None, None) => {
                return Err(PlatformError::WindowError("no window to host the webview".into()))
            }
        }
        .map_err(|e| PlatformError::WebViewError(e.to_string()))?;

        self.webview = Some(webview);
        self.applied_scripts = init_scripts.to_vec();
        Ok(())
    }

    fn webview(&self) -> Result<&WebView> {
        self.webview
            .as_ref()
            .ok_or_else(|| PlatformError::WebViewError("webview not built yet".into()))
    }

    fn sync_child_bounds(&mut self) {
        let Some(size) = self.state.resized.take() else {
            return;
        };
        if self.parent.is_some() {
            return;
        }
        if let Some(webview) = &self.webview {
            let rect = wry::Rect {
                position: wry::dpi::Position::Logical(wry::dpi::LogicalPosition::new(0.0, 0.0)),
                size: wry::dpi::Size::Physical(wry::dpi::PhysicalSize::new(
                    size.width,
                    size.height,
                )),
            };
            if let Err(e) = webview.set_bounds(rect) {
                warn!(error = %e, "failed to resize webview");
            }
        }
    }
}

impl Backend for NativeBackend {
    fn set_title(&mut self, title: &str) -> Result<()> {
        match &self.state.window {
            Some(window) => window.set_title(title),
            None => debug!("title ignored for an embedded webview"),
        }
        Ok(())
    }

    fn set_bounds(&mut self, bounds: Bounds, hint: SizeHint) -> Result<()> {
        let Some(window) = &self.state.window else {
            // Embedded: bounds are the webview's rect inside the parent.
            if matches!(hint, SizeHint::None | SizeHint::Fixed) {
                self.bounds = bounds;
                if let Some(webview) = &self.webview {
                    webview
                        .set_bounds(bounds_to_wry(bounds))
                        .map_err(|e| PlatformError::WebViewError(e.to_string()))?;
                }
            }
            return Ok(());
        };

        let size = LogicalSize::new(bounds.width, bounds.height);
        match hint {
            SizeHint::None => {
                window.set_resizable(true);
                window.set_outer_position(LogicalPosition::new(bounds.x, bounds.y));
                let _ = window.request_inner_size(size);
            }
            SizeHint::Min => window.set_min_inner_size(Some(size)),
            SizeHint::Max => window.set_max_inner_size(Some(size)),
            SizeHint::Fixed => {
                let _ = window.request_inner_size(size);
                window.set_resizable(false);
            }
        }
        self.bounds = bounds;
        Ok(())
    }

    fn load(&mut self, load: Load<'_>, init_scripts: &[String]) -> Result<()> {
        // wry fixes initialization scripts at build time.
        if self.webview.is_none() || self.applied_scripts != init_scripts {
            return self.build_webview(load, init_scripts);
        }
        let webview = self.webview()?;
        match load {
            Load::Url(url) => webview.load_url(url),
            Load::Html(html) => webview.load_html(html),
        }
        .map_err(|e| PlatformError::WebViewError(e.to_string()))
    }

    fn eval(&mut self, script: &str) -> Result<()> {
        self.webview()?
            .evaluate_script(script)
            .map_err(|e| PlatformError::WebViewError(e.to_string()))
    }

    fn window_handle(&self) -> Option<NonNull<c_void>> {
        match (&self.state.window, self.parent) {
            (Some(window), _) => window
                .window_handle()
                .ok()
                .and_then(|handle| raw_pointer(handle.as_raw())),
            (None, Some(parent)) => Some(parent.as_non_null()),
            (None, None) => None,
        }
    }

    fn waker(&self) -> Arc<dyn Waker> {
        Arc::clone(&self.waker) as Arc<dyn Waker>
    }

    fn pump(&mut self, timeout: Option<Duration>) -> Vec<BackendEvent> {
        self.pump_once(timeout);
        self.sync_child_bounds();
        self.events
            .lock()
            .map(|mut evts| std::mem::take(&mut *evts))
            .unwrap_or_default()
    }
}
