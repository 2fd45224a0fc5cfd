//! Webview event types.

use serde::{Deserialize, Serialize};

/// State of a page load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageLoadState {
    /// Navigation has started.
    Started,
    /// Document finished loading; initialization scripts have run.
    Finished,
}

#[cfg(feature = "native")]
impl From<wry::PageLoadEvent> for PageLoadState {
    fn from(e: wry::PageLoadEvent) -> Self {
        match e {
            wry::PageLoadEvent::Started => Self::Started,
            wry::PageLoadEvent::Finished => Self::Finished,
        }
    }
}

/// Events surfaced by an instance to its host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebviewEvent {
    /// Page load state changed. Carries the URL.
    PageLoad { state: PageLoadState, url: String },
    /// Document title changed.
    TitleChanged { title: String },
    /// A navigation was refused or failed to load.
    NavigationFailed { url: String, reason: String },
    /// The user asked to close the window. The instance terminates.
    CloseRequested,
    /// The event loop is exiting.
    Terminated,
}
