//! Demo bindings and page content for the launcher.

use std::path::Path;

use serde_json::{json, Value};
use tracing::{debug, info, warn};
use weave_common::Result;
use weave_core::{Reject, Webview, WebviewEvent};

use crate::cli::Args;

/// Runs before page scripts on every load.
const READY_SCRIPT: &str = "window.weaveLauncher = { version: \"VERSION\" };";

const DEMO_HTML: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>weave</title></head>
<body style="font-family: sans-serif">
  <h1>weave</h1>
  <p><input id="a" value="2" size="4"> + <input id="b" value="3" size="4">
     <button id="add">=</button> <span id="sum"></span></p>
  <p><input id="text" value="hello"> <button id="echo">echo</button>
     <code id="echoed"></code></p>
  <p><button id="quit">quit</button></p>
  <script>
    const $ = (id) => document.getElementById(id);
    $("add").onclick = async () => {
      try {
        $("sum").textContent = await add(Number($("a").value), Number($("b").value));
      } catch (e) {
        $("sum").textContent = "error: " + JSON.stringify(e);
      }
    };
    $("echo").onclick = async () => {
      $("echoed").textContent = JSON.stringify(await echo($("text").value));
    };
    $("quit").onclick = () => quit();
  </script>
</body>
</html>
"#;

/// What the launcher shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Url(String),
    Html(String),
    Demo,
}

impl Content {
    /// Command line first, then the configured start URL, then the demo.
    pub fn from_args(args: &Args, start_url: Option<&str>) -> Result<Self> {
        if let Some(url) = &args.url {
            return Ok(Self::Url(url.clone()));
        }
        match (&args.html, start_url) {
            (Some(path), _) => Self::from_file(path),
            (None, Some(url)) => Ok(Self::Url(url.to_string())),
            (None, None) => Ok(Self::Demo),
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let html = std::fs::read_to_string(path)?;
        info!("Loaded {} bytes of HTML from {}", html.len(), path.display());
        Ok(Self::Html(html))
    }

    pub fn load(&self, webview: &mut Webview) -> Result<()> {
        match self {
            Self::Url(url) => webview.navigate(url),
            Self::Html(html) => webview.set_html(html),
            Self::Demo => webview.set_html(DEMO_HTML),
        }
    }
}

/// Sum numeric arguments. Integral sums stay integers.
pub fn add(args: &[Value]) -> std::result::Result<Value, Reject> {
    let mut sum = 0.0;
    for arg in args {
        sum += arg
            .as_f64()
            .ok_or_else(|| Reject::reason(format!("add expects numbers, got {arg}")))?;
    }
    if sum.fract() == 0.0 && sum.abs() < 9_007_199_254_740_992.0 {
        Ok(json!(sum as i64))
    } else {
        Ok(json!(sum))
    }
}

/// Bind `add`, `echo` and `quit`, and register the launcher init script.
pub fn install(webview: &mut Webview) -> Result<()> {
    webview.bind_fn("add", add)?;
    webview.bind_fn("echo", |args| Ok(Value::Array(args.to_vec())))?;
    webview.bind("quit", |webview, request| {
        info!("Quit requested by page");
        if let Err(e) = webview.resolve(request.id(), 0, "null") {
            warn!("Failed to answer quit: {e}");
        }
        if let Err(e) = webview.terminate() {
            warn!("Failed to terminate: {e}");
        }
    })?;
    webview.init(&READY_SCRIPT.replace("VERSION", env!("CARGO_PKG_VERSION")))?;
    Ok(())
}

/// Log instance events.
pub fn log_events(webview: &mut Webview) {
    webview.on_event(|event| match event {
        WebviewEvent::PageLoad { state, url } => debug!("Page load {state:?}: {url}"),
        WebviewEvent::TitleChanged { title } => debug!("Title changed: {title}"),
        WebviewEvent::NavigationFailed { url, reason } => {
            warn!("Navigation to {url} failed: {reason}")
        }
        WebviewEvent::CloseRequested => info!("Window closed"),
        WebviewEvent::Terminated => debug!("Webview terminated"),
    });
}
