//! Windowless run: a background thread plays the page, calling the bound
//! demo functions and collecting how each call settled.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{info, warn};
use weave_core::{HeadlessPage, WebviewHandle};

const CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// `(function, JSON argument array)` pairs called in order, before `quit`.
const SCRIPTED_CALLS: &[(&str, &str)] = &[
    ("add", "[2, 3]"),
    ("add", "[1.5, 2]"),
    ("echo", r#"["hello", {"n": 1}]"#),
    ("add", r#"[1, "x"]"#),
    ("missing", "[]"),
];

/// Start the page thread. It ends by calling `quit`, or by terminating the
/// instance itself when that call does not settle.
pub fn spawn(page: HeadlessPage, handle: WebviewHandle) -> JoinHandle<Vec<String>> {
    thread::spawn(move || {
        let mut report = Vec::with_capacity(SCRIPTED_CALLS.len());
        for (name, params) in SCRIPTED_CALLS {
            report.push(call(&page, name, params));
        }

        let quit = page.invoke_raw("quit", "[]");
        if page.wait_for_settlement(&quit, CALL_TIMEOUT).is_none() {
            warn!("quit did not settle, terminating");
            if let Err(e) = handle.terminate() {
                warn!("Terminate failed: {e}");
            }
        }
        info!("Headless run finished ({} calls)", report.len());
        report
    })
}

fn call(page: &HeadlessPage, name: &str, params: &str) -> String {
    let id = page.invoke_raw(name, params);
    match page.wait_for_settlement(&id, CALL_TIMEOUT) {
        Some(s) if s.status == 0 => format!("{name}({params}) resolved {}", s.value),
        Some(s) => format!("{name}({params}) rejected {}", s.value),
        None => format!("{name}({params}) timed out"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_core::{Webview, WebviewConfig};

    #[test]
    fn scripted_calls_settle_and_quit_terminates() {
        let (mut webview, page) = Webview::headless(WebviewConfig::default()).unwrap();
        crate::app::install(&mut webview).unwrap();
        let driver = spawn(page, webview.handle());
        webview.run().unwrap();

        let report = driver.join().unwrap();
        assert_eq!(report[0], "add([2, 3]) resolved 5");
        assert_eq!(report[1], "add([1.5, 2]) resolved 3.5");
        assert_eq!(report[2], r#"echo(["hello", {"n": 1}]) resolved ["hello",{"n":1}]"#);
        assert!(report[3].starts_with(r#"add([1, "x"]) rejected "add expects numbers"#));
        assert!(report[4].contains("NotBound"));
        assert!(webview.is_terminated());
    }
}
