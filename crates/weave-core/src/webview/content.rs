use tracing::debug;
use weave_common::{Result, WeaveError};

use crate::nav::BLANK_LOCATION;
use crate::platform::Load;

use super::Webview;

impl Webview {
    /// URL of the current document.
    pub fn location(&self) -> &str {
        self.navigator.location()
    }

    /// Load `url` into the page.
    ///
    /// Malformed URLs, disallowed schemes and load errors do not fail the
    /// call; they surface as a `NavigationFailed` event.
    pub fn navigate(&mut self, url: &str) -> Result<()> {
        self.ensure_usable()?;
        let target = match self.navigator.check(url) {
            Ok(target) => target,
            Err(WeaveError::NavigationFailure { url, reason }) => {
                self.report_navigation_failure(url, reason);
                return Ok(());
            }
            Err(other) => return Err(other),
        };

        let scripts = self.init_scripts();
        if let Err(e) = self.backend.load(Load::Url(&target), &scripts) {
            self.report_navigation_failure(target, e.to_string());
            return Ok(());
        }
        debug!(instance = %self.id, url = %target, "navigating");
        self.navigator.set_location(target);
        self.forget_pending_calls();
        Ok(())
    }

    /// Replace the page with `html`. The document URL becomes `about:blank`.
    pub fn set_html(&mut self, html: &str) -> Result<()> {
        self.ensure_usable()?;
        let scripts = self.init_scripts();
        if let Err(e) = self.backend.load(Load::Html(html), &scripts) {
            self.report_navigation_failure(BLANK_LOCATION.to_string(), e.to_string());
            return Ok(());
        }
        debug!(instance = %self.id, len = html.len(), "html loaded");
        self.navigator.set_location(BLANK_LOCATION);
        self.forget_pending_calls();
        Ok(())
    }

    /// Add a script that runs before page scripts on every later document
    /// load, after scripts added earlier.
    pub fn init(&mut self, script: &str) -> Result<()> {
        self.ensure_usable()?;
        self.navigator.add_init_script(script);
        debug!(
            instance = %self.id,
            count = self.navigator.init_script_count(),
            "init script added"
        );
        Ok(())
    }

    /// Evaluate `script` in the current document. Fire and forget.
    pub fn eval(&mut self, script: &str) -> Result<()> {
        self.ensure_usable()?;
        self.backend.eval(script)?;
        Ok(())
    }

    /// The old document's promises are gone; their calls no longer count
    /// against the pending cap and resolving them fails with `UnknownRequest`.
    fn forget_pending_calls(&mut self) {
        let dropped = self.pending.clear();
        if dropped > 0 {
            debug!(instance = %self.id, dropped, "pending calls dropped with document");
        }
    }
}
