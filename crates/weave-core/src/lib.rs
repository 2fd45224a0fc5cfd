//! Embeddable webview core.
//!
//! A [`Webview`] is a native window (or a view embedded in a host window)
//! showing one web page, with:
//! - a generation-checked instance registry, so stale handles fail cleanly
//! - a FIFO dispatch queue that other threads use to run work on the UI thread
//! - a bind table exposing host functions to page script as async functions
//! - navigation, HTML loading, init scripts and fire-and-forget eval
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use serde_json::json;
//! use weave_core::{Webview, WebviewConfig};
//!
//! let mut webview = Webview::new(WebviewConfig::default().with_title("demo"))?;
//! webview.bind_fn("add", |args| {
//!     let sum: i64 = args.iter().filter_map(|v| v.as_i64()).sum();
//!     Ok(json!(sum))
//! })?;
//! webview.set_html("<script>add(2, 3).then(console.log)</script>")?;
//! webview.show()?;
//! # Ok::<(), weave_core::WeaveError>(())
//! ```

pub mod bind;
pub mod bridge;
pub mod config;
pub mod events;
mod nav;
pub mod platform;
pub mod queue;
pub mod registry;
pub mod webview;

pub use bind::{BindRequest, Reject};
pub use config::{ParentWindow, WebviewConfig};
pub use events::{PageLoadState, WebviewEvent};
pub use platform::headless::{HeadlessPage, ScriptRecord, Settlement};
pub use queue::{Task, WebviewHandle};
pub use registry::{InstanceId, Lifecycle};
pub use webview::{Diagnostics, Webview};

pub use weave_common::{Bounds, Result, SizeHint, WeaveError};
