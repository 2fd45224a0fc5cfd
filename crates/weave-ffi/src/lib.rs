//! C ABI for weave.
//!
//! Builds as a `cdylib` exporting the `webview_*` functions declared in
//! `include/weave.h`. Instances are addressed by opaque 64-bit handles that
//! fail with `WEBVIEW_ERROR_INVALID_INSTANCE` once the instance is destroyed.

pub mod api;
pub mod codes;
mod instances;

pub use api::*;
pub use codes::*;
pub use instances::webview_t;
