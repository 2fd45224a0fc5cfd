use std::ffi::c_void;
use std::ptr::NonNull;

use tracing::debug;
use weave_common::{Bounds, Result, SizeHint};

use super::Webview;

impl Webview {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        self.ensure_usable()?;
        self.backend.set_title(title)?;
        self.title = title.to_string();
        debug!(instance = %self.id, title, "title set");
        Ok(())
    }

    /// Window position and size, as last set.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Hint the current bounds were applied with: `None` or `Fixed`.
    pub fn size_hint(&self) -> SizeHint {
        self.size_hint
    }

    /// Apply `bounds` according to `hint`: `None` and `Fixed` move and
    /// resize the window, `Min` and `Max` only constrain user resizing.
    pub fn set_bounds(&mut self, bounds: Bounds, hint: SizeHint) -> Result<()> {
        self.ensure_usable()?;
        self.backend.set_bounds(bounds, hint)?;
        if matches!(hint, SizeHint::None | SizeHint::Fixed) {
            self.bounds = bounds;
            self.size_hint = hint;
        }
        debug!(instance = %self.id, bounds = %bounds, ?hint, "bounds set");
        Ok(())
    }

    /// Resize in place; see [`set_bounds`](Self::set_bounds).
    pub fn set_size(&mut self, width: u32, height: u32, hint: SizeHint) -> Result<()> {
        self.set_bounds(self.bounds.with_size(width, height), hint)
    }

    /// Native window handle, `None` for headless instances.
    pub fn window_handle(&self) -> Option<NonNull<c_void>> {
        self.backend.window_handle()
    }
}
