use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use serde_json::{json, Value};
use weave_common::SizeHint;

use super::*;
use crate::bind::Reject;
use crate::bridge::{bind_script, BRIDGE_INIT_SCRIPT};
use crate::events::PageLoadState;
use crate::platform::headless::ScriptRecord;
use crate::registry::owner_thread;

fn headless() -> (Webview, HeadlessPage) {
    Webview::headless(WebviewConfig::default()).unwrap()
}

/// Run loop iterations without blocking until the mailbox and page are idle.
fn spin(webview: &mut Webview) {
    for _ in 0..8 {
        if !webview.run_once(Some(Duration::ZERO)).unwrap_or(false) {
            break;
        }
    }
}

/// Spin until `request_id` is settled (other threads may be resolving it).
fn spin_until_settled(webview: &mut Webview, page: &HeadlessPage, request_id: &str) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while page.settlement(request_id).is_none() {
        assert!(Instant::now() < deadline, "request {request_id} never settled");
        webview.run_once(Some(Duration::from_millis(10))).unwrap();
    }
}

fn bind_sum(webview: &mut Webview) {
    webview
        .bind_fn("add", |args| {
            Ok(json!(args.iter().filter_map(Value::as_i64).sum::<i64>()))
        })
        .unwrap();
}

/// Bind `name` with a callback that parks request ids for a later resolve.
fn bind_parked(webview: &mut Webview, name: &str) -> Rc<RefCell<Vec<String>>> {
    let parked = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&parked);
    webview
        .bind(name, move |_, request| {
            sink.borrow_mut().push(request.id().to_string());
        })
        .unwrap();
    parked
}

// -- Bound calls --

#[test]
fn add_resolves_with_sum() {
    let (mut webview, page) = headless();
    bind_sum(&mut webview);

    let id = page.invoke("add", &json!([2, 3]));
    spin(&mut webview);

    let settled = page.settlement(&id).unwrap();
    assert_eq!(settled.status, 0);
    assert_eq!(settled.value, json!(5));
    assert_eq!(webview.pending_calls(), 0);
    assert_eq!(webview.diagnostics().calls_received, 1);
}

#[test]
fn page_script_calls_through_stub() {
    let (mut webview, page) = headless();
    bind_sum(&mut webview);

    webview.eval("add(2, 3)").unwrap();
    spin(&mut webview);

    let settlements = page.settlements();
    assert_eq!(settlements.len(), 1);
    assert_eq!(settlements[0].value, json!(5));
}

#[test]
fn add_called_from_blank_page_resolves_to_five() {
    let (mut webview, page) = headless();
    let received = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&received);
    webview
        .bind("add", move |_, request| {
            let args = request.args().map(<[Value]>::to_vec).unwrap_or_default();
            sink.borrow_mut().push((request.id().to_string(), args));
        })
        .unwrap();
    webview.navigate("about:blank").unwrap();

    webview.eval("window.add(2,3)").unwrap();
    spin(&mut webview);

    let (ids, args): (Vec<String>, Vec<Vec<Value>>) = received.borrow().iter().cloned().unzip();
    assert_eq!(args, [vec![json!(2), json!(3)]]);
    let calls = ids;
    webview.resolve(&calls[0], 0, "5").unwrap();
    let settled = page.settlement(&calls[0]).unwrap();
    assert_eq!((settled.status, settled.value), (0, json!(5)));

    let err = webview.resolve(&calls[0], 0, "5").unwrap_err();
    assert!(matches!(err, WeaveError::UnknownRequest(_)));
    assert_eq!(page.settlements().len(), 1);
}

#[test]
fn deferred_resolve_settles_once() {
    let (mut webview, page) = headless();
    let parked = bind_parked(&mut webview, "slow");

    let id = page.invoke("slow", &json!([]));
    spin(&mut webview);
    assert_eq!(parked.borrow().as_slice(), [id.clone()]);
    assert!(page.settlement(&id).is_none());
    assert_eq!(webview.pending_calls(), 1);

    webview.resolve(&id, 0, r#""done""#).unwrap();
    let err = webview.resolve(&id, 0, r#""again""#).unwrap_err();
    assert!(matches!(err, WeaveError::UnknownRequest(_)));

    let settlements = page.settlements();
    assert_eq!(settlements.len(), 1);
    assert_eq!(settlements[0].value, json!("done"));
    assert_eq!(webview.diagnostics().stale_resolutions, 1);
}

#[test]
fn resolve_from_worker_thread() {
    let (mut webview, page) = headless();
    webview
        .bind("compute", |webview, request| {
            let handle = webview.handle();
            let id = request.id().to_string();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(10));
                handle.resolve(id, 0, "42").unwrap();
            });
        })
        .unwrap();

    let id = page.invoke("compute", &json!([]));
    spin_until_settled(&mut webview, &page, &id);
    assert_eq!(page.settlement(&id).unwrap().value, json!(42));
}

#[test]
fn unknown_request_is_rejected() {
    let (mut webview, _page) = headless();
    assert!(matches!(
        webview.resolve("never-issued", 0, "1"),
        Err(WeaveError::UnknownRequest(_))
    ));
    assert_eq!(webview.diagnostics().stale_resolutions, 1);
}

#[test]
fn bind_fn_reject_rejects_promise() {
    let (mut webview, page) = headless();
    webview
        .bind_fn("fail", |_| Err(Reject::reason("nope")))
        .unwrap();

    let id = page.invoke("fail", &json!([]));
    spin(&mut webview);

    let settled = page.settlement(&id).unwrap();
    assert_eq!(settled.status, 1);
    assert_eq!(settled.value, json!("nope"));
}

#[test]
fn non_zero_status_passes_plain_text_reason() {
    let (mut webview, page) = headless();
    let parked = bind_parked(&mut webview, "slow");
    let id = page.invoke("slow", &json!([]));
    spin(&mut webview);
    assert_eq!(parked.borrow().len(), 1);

    webview.resolve(&id, 2, "boom").unwrap();
    let settled = page.settlement(&id).unwrap();
    assert_eq!(settled.status, 2);
    assert_eq!(settled.value, json!("boom"));
}

#[test]
fn invalid_result_json_rejects_call() {
    let (mut webview, page) = headless();
    bind_parked(&mut webview, "slow");
    let id = page.invoke("slow", &json!([]));
    spin(&mut webview);

    let err = webview.resolve(&id, 0, "{not json").unwrap_err();
    assert!(matches!(err, WeaveError::MalformedArguments(_)));

    let settled = page.settlement(&id).unwrap();
    assert_eq!(settled.status, 1);
    assert_eq!(settled.value["error"], "MalformedArguments");
}

#[test]
fn malformed_arguments_reach_callback_as_error() {
    let (mut webview, page) = headless();
    bind_sum(&mut webview);

    let id = page.invoke_raw("add", "[1,");
    spin(&mut webview);

    let settled = page.settlement(&id).unwrap();
    assert_eq!(settled.status, 1);
    assert_eq!(settled.value["error"], "MalformedArguments");
    assert_eq!(webview.diagnostics().malformed_calls, 1);
}

#[test]
fn raw_arguments_are_kept_verbatim() {
    let (mut webview, page) = headless();
    let seen = Rc::new(RefCell::new(String::new()));
    let sink = Rc::clone(&seen);
    webview
        .bind("echo", move |webview, request| {
            *sink.borrow_mut() = request.raw_args().to_string();
            let args = request.args().unwrap().to_vec();
            webview
                .resolve(request.id(), 0, &Value::Array(args).to_string())
                .unwrap();
        })
        .unwrap();

    let id = page.invoke_raw("echo", r#"[1, "two", {"three": 3}]"#);
    spin(&mut webview);

    assert_eq!(*seen.borrow(), r#"[1, "two", {"three": 3}]"#);
    assert_eq!(
        page.settlement(&id).unwrap().value,
        json!([1, "two", {"three": 3}])
    );
}

#[test]
fn non_bridge_message_is_dropped() {
    let (mut webview, page) = headless();
    page.post_message("garbage");
    page.post_message(r#"{"kind":"ping"}"#);
    spin(&mut webview);

    assert_eq!(webview.diagnostics().malformed_calls, 2);
    assert_eq!(webview.diagnostics().calls_received, 0);
    assert!(page.settlements().is_empty());
}

#[test]
fn pending_cap_rejects_excess_calls() {
    let config = WebviewConfig {
        max_pending_calls: 1,
        ..Default::default()
    };
    let (mut webview, page) = Webview::headless(config).unwrap();
    bind_parked(&mut webview, "slow");

    let first = page.invoke("slow", &json!([]));
    let second = page.invoke("slow", &json!([]));
    spin(&mut webview);

    assert!(page.settlement(&first).is_none());
    let rejected = page.settlement(&second).unwrap();
    assert_eq!(rejected.status, 1);
    assert_eq!(rejected.value["error"], "InvalidState");
    assert_eq!(webview.pending_calls(), 1);
    assert_eq!(webview.diagnostics().calls_rejected, 1);
}

#[test]
fn new_document_releases_abandoned_calls() {
    let config = WebviewConfig {
        max_pending_calls: 2,
        ..Default::default()
    };
    let (mut webview, page) = Webview::headless(config).unwrap();
    let parked = bind_parked(&mut webview, "slow");

    let abandoned = [page.invoke("slow", &json!([])), page.invoke("slow", &json!([]))];
    spin(&mut webview);
    assert_eq!(webview.pending_calls(), 2);

    webview.navigate("https://other.test/").unwrap();
    assert_eq!(webview.pending_calls(), 0);

    let fresh = page.invoke("slow", &json!([]));
    spin(&mut webview);
    assert!(page.settlement(&fresh).is_none());
    assert_eq!(parked.borrow().len(), 3);
    assert_eq!(webview.pending_calls(), 1);

    let err = webview.resolve(&abandoned[0], 0, "1").unwrap_err();
    assert!(matches!(err, WeaveError::UnknownRequest(_)));
    webview.resolve(&fresh, 0, "1").unwrap();
    assert_eq!(page.settlement(&fresh).unwrap().value, json!(1));
}

#[test]
fn set_html_also_releases_abandoned_calls() {
    let (mut webview, page) = headless();
    bind_parked(&mut webview, "slow");
    page.invoke("slow", &json!([]));
    spin(&mut webview);
    assert_eq!(webview.pending_calls(), 1);

    webview.set_html("<p>next</p>").unwrap();
    assert_eq!(webview.pending_calls(), 0);
}

// -- Bind table --

#[test]
fn unbound_name_rejects_with_not_bound() {
    let (mut webview, page) = headless();
    bind_sum(&mut webview);
    webview.unbind("add").unwrap();

    let id = page.invoke("add", &json!([1, 2]));
    spin(&mut webview);

    let settled = page.settlement(&id).unwrap();
    assert_eq!(settled.status, 1);
    assert_eq!(settled.value["error"], "NotBound");
    // The stub stays in the page.
    assert!(page.stubs().contains(&"add".to_string()));
}

#[test]
fn unbind_unknown_name_fails() {
    let (mut webview, _page) = headless();
    assert!(matches!(
        webview.unbind("missing"),
        Err(WeaveError::NotBound(_))
    ));
}

#[test]
fn rebinding_replaces_callback() {
    let (mut webview, page) = headless();
    webview.bind_fn("v", |_| Ok(json!(1))).unwrap();
    webview.bind_fn("v", |_| Ok(json!(2))).unwrap();

    let id = page.invoke("v", &json!([]));
    spin(&mut webview);
    assert_eq!(page.settlement(&id).unwrap().value, json!(2));
}

#[test]
fn bind_rejects_unusable_names() {
    let (mut webview, _page) = headless();
    assert!(matches!(
        webview.bind_fn("", |_| Ok(Value::Null)),
        Err(WeaveError::InvalidArgument(_))
    ));
    assert!(matches!(
        webview.bind_fn("__weave__", |_| Ok(Value::Null)),
        Err(WeaveError::InvalidArgument(_))
    ));
}

#[test]
fn bound_stub_survives_navigation() {
    let (mut webview, page) = headless();
    bind_sum(&mut webview);
    assert_eq!(page.stubs(), vec!["add".to_string()]);

    webview.navigate("https://example.com/").unwrap();
    assert_eq!(page.stubs(), vec!["add".to_string()]);
    assert!(page
        .records()
        .contains(&ScriptRecord::Init(bind_script("add"))));
}

// -- Dispatch queue --

#[test]
fn dispatch_preserves_per_thread_order() {
    let (mut webview, _page) = headless();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let handle = webview.handle();
            let seen = Arc::clone(&seen);
            thread::spawn(move || {
                for seq in 0..100 {
                    let seen = Arc::clone(&seen);
                    handle
                        .dispatch(move |_| seen.lock().unwrap().push((worker, seq)))
                        .unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }
    spin(&mut webview);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 400);
    for worker in 0..4 {
        let order: Vec<_> = seen
            .iter()
            .filter(|(w, _)| *w == worker)
            .map(|(_, seq)| *seq)
            .collect();
        assert_eq!(order, (0..100).collect::<Vec<_>>());
    }
}

#[test]
fn dispatch_on_ui_thread_is_deferred() {
    let (mut webview, _page) = headless();
    let ran = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&ran);
    webview
        .dispatch(move |_| flag.store(true, Ordering::SeqCst))
        .unwrap();

    assert!(!ran.load(Ordering::SeqCst));
    spin(&mut webview);
    assert!(ran.load(Ordering::SeqCst));
}

#[test]
fn task_dispatched_from_task_waits_for_next_iteration() {
    let (mut webview, _page) = headless();
    let log = Arc::new(Mutex::new(Vec::new()));
    let outer = Arc::clone(&log);
    webview
        .dispatch(move |webview| {
            outer.lock().unwrap().push("outer");
            let inner = Arc::clone(&outer);
            webview
                .dispatch(move |_| inner.lock().unwrap().push("inner"))
                .unwrap();
        })
        .unwrap();

    webview.run_once(Some(Duration::ZERO)).unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["outer"]);
    webview.run_once(Some(Duration::ZERO)).unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["outer", "inner"]);
}

#[test]
fn task_receives_the_instance() {
    let (mut webview, page) = headless();
    webview
        .dispatch(|webview| webview.set_title("from task").unwrap())
        .unwrap();
    spin(&mut webview);
    assert_eq!(webview.title(), "from task");
    assert_eq!(page.title(), "from task");
}

// -- Lifecycle --

#[test]
fn terminate_from_other_thread_ends_run() {
    let (mut webview, _page) = headless();
    let handle = webview.handle();
    let start = Instant::now();
    let t = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        handle.terminate().unwrap();
    });

    webview.run().unwrap();
    t.join().unwrap();

    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(webview.lifecycle(), Lifecycle::Terminated);
    assert!(!webview.handle().is_alive());
    assert!(webview.drain_events().contains(&WebviewEvent::Terminated));
}

#[test]
fn terminate_is_idempotent() {
    let (mut webview, _page) = headless();
    webview.terminate().unwrap();
    webview.terminate().unwrap();
    webview.run().unwrap();
    webview.terminate().unwrap();

    let terminated = webview
        .drain_events()
        .into_iter()
        .filter(|e| *e == WebviewEvent::Terminated)
        .count();
    assert_eq!(terminated, 1);
}

#[test]
fn queued_tasks_still_run_after_terminate() {
    let (mut webview, _page) = headless();
    let log = Arc::new(Mutex::new(Vec::new()));
    let before = Arc::clone(&log);
    let after = Arc::clone(&log);

    webview
        .dispatch(move |_| before.lock().unwrap().push("before"))
        .unwrap();
    webview.terminate().unwrap();
    webview
        .dispatch(move |_| after.lock().unwrap().push("after"))
        .unwrap();
    webview.run().unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["before", "after"]);
}

#[test]
fn operations_after_terminate_fail() {
    let (mut webview, _page) = headless();
    webview.terminate().unwrap();
    webview.run().unwrap();

    assert!(matches!(
        webview.dispatch(|_| {}),
        Err(WeaveError::InvalidInstance(_))
    ));
    assert!(matches!(
        webview.eval("1"),
        Err(WeaveError::InvalidInstance(_))
    ));
    assert!(matches!(
        webview.navigate("https://example.com"),
        Err(WeaveError::InvalidInstance(_))
    ));
    assert!(matches!(webview.run(), Err(WeaveError::InvalidInstance(_))));
}

#[test]
fn run_inside_task_is_invalid_state() {
    let (mut webview, _page) = headless();
    let outcome = Arc::new(Mutex::new(None));
    let slot = Arc::clone(&outcome);
    webview
        .dispatch(move |webview| {
            *slot.lock().unwrap() = Some(webview.run().map_err(|e| e.kind()));
            webview.terminate().unwrap();
        })
        .unwrap();
    webview.run().unwrap();

    assert_eq!(*outcome.lock().unwrap(), Some(Err("InvalidState")));
}

#[test]
fn callbacks_stop_after_terminate() {
    let (mut webview, page) = headless();
    let parked = bind_parked(&mut webview, "slow");

    page.invoke("slow", &json!([]));
    webview.terminate().unwrap();
    webview.run().unwrap();

    assert!(parked.borrow().is_empty());
}

#[test]
fn late_resolution_is_ignored() {
    let (mut webview, page) = headless();
    let parked = bind_parked(&mut webview, "slow");
    let id = page.invoke("slow", &json!([]));
    spin(&mut webview);
    assert_eq!(parked.borrow().len(), 1);

    let handle = webview.handle();
    webview.terminate().unwrap();
    spin(&mut webview);
    assert!(webview.is_terminated());

    webview.resolve(&id, 0, "1").unwrap();
    handle.resolve(id.clone(), 0, "1").unwrap();
    assert!(page.settlement(&id).is_none());
}

#[test]
fn close_request_terminates() {
    let (mut webview, page) = headless();
    page.close();
    webview.run().unwrap();

    let events = webview.drain_events();
    assert!(events.contains(&WebviewEvent::CloseRequested));
    assert!(events.contains(&WebviewEvent::Terminated));
}

#[test]
fn stale_handle_fails_after_destroy() {
    let (webview, _page) = headless();
    let handle = webview.handle();
    assert_eq!(owner_thread(handle.id()), Some(thread::current().id()));
    webview.destroy();

    assert!(!handle.is_alive());
    assert!(owner_thread(handle.id()).is_none());
    assert!(matches!(
        handle.dispatch(|_| {}),
        Err(WeaveError::InvalidInstance(_))
    ));
    assert!(matches!(
        handle.resolve("x", 0, "1"),
        Err(WeaveError::InvalidInstance(_))
    ));
    assert!(matches!(
        handle.terminate(),
        Err(WeaveError::InvalidInstance(_))
    ));

    // A new instance may reuse the slot; the old handle stays dead.
    let (replacement, _page) = headless();
    assert_ne!(replacement.id(), handle.id());
    assert!(!handle.is_alive());
}

#[test]
fn show_destroys_after_run() {
    let (webview, _page) = headless();
    let handle = webview.handle();
    handle.terminate().unwrap();
    webview.show().unwrap();
    assert!(matches!(
        handle.dispatch(|_| {}),
        Err(WeaveError::InvalidInstance(_))
    ));
}

// -- Navigation and scripts --

#[test]
fn init_scripts_run_before_onload_on_every_load() {
    let (mut webview, page) = headless();
    webview.init("S1").unwrap();
    webview.init("S2").unwrap();
    webview.navigate("https://a.test/").unwrap();
    webview.navigate("https://b.test/").unwrap();
    webview.set_html("<p>c</p>").unwrap();

    // Split the log into documents and check each load after the scripts
    // were registered.
    let records = page.records();
    let mut documents: Vec<Vec<ScriptRecord>> = Vec::new();
    for record in records {
        if matches!(record, ScriptRecord::Navigate(_)) {
            documents.push(Vec::new());
        }
        if let Some(doc) = documents.last_mut() {
            doc.push(record);
        }
    }
    assert_eq!(documents.len(), 4);

    for doc in &documents[1..] {
        let inits: Vec<&str> = doc
            .iter()
            .filter_map(|r| match r {
                ScriptRecord::Init(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(inits, vec![BRIDGE_INIT_SCRIPT, "S1", "S2"]);
        assert!(matches!(doc.last(), Some(ScriptRecord::Loaded(_))));
    }
}

#[test]
fn navigate_normalizes_url() {
    let (mut webview, page) = headless();
    webview.navigate("https://example.com/a b").unwrap();
    assert_eq!(webview.location(), "https://example.com/a%20b");
    assert_eq!(
        page.location().as_deref(),
        Some("https://example.com/a%20b")
    );
}

#[test]
fn disallowed_scheme_reports_navigation_failure() {
    let (mut webview, page) = headless();
    let loads = page.loads();
    webview.navigate("ftp://example.com/file").unwrap();

    assert_eq!(page.loads(), loads);
    assert_eq!(webview.location(), "about:blank");
    assert_eq!(webview.diagnostics().navigation_failures, 1);
    let failed = webview.drain_events().into_iter().any(|e| {
        matches!(e, WebviewEvent::NavigationFailed { ref url, .. } if url == "ftp://example.com/file")
    });
    assert!(failed);
}

#[test]
fn malformed_url_reports_navigation_failure() {
    let (mut webview, _page) = headless();
    webview.navigate("definitely not a url").unwrap();
    assert_eq!(webview.diagnostics().navigation_failures, 1);
}

#[test]
fn load_failure_surfaces_as_event() {
    let (mut webview, page) = headless();
    page.fail_next_navigation("offline");
    webview.navigate("https://unreachable.test").unwrap();
    spin(&mut webview);

    let events = webview.drain_events();
    assert!(events.contains(&WebviewEvent::NavigationFailed {
        url: "https://unreachable.test/".into(),
        reason: "offline".into(),
    }));
}

#[test]
fn page_load_events_follow_navigation() {
    let (mut webview, _page) = headless();
    webview.drain_events();
    webview.navigate("https://example.com/").unwrap();
    spin(&mut webview);

    let loads: Vec<_> = webview
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            WebviewEvent::PageLoad { state, url } if url == "https://example.com/" => Some(state),
            _ => None,
        })
        .collect();
    assert_eq!(loads, vec![PageLoadState::Started, PageLoadState::Finished]);
}

#[test]
fn set_html_loads_blank_document() {
    let (mut webview, page) = headless();
    webview.navigate("https://example.com/").unwrap();
    webview.set_html("<h1>hi</h1>").unwrap();
    assert_eq!(webview.location(), "about:blank");
    assert_eq!(page.html().as_deref(), Some("<h1>hi</h1>"));
}

#[test]
fn eval_reaches_current_document() {
    let (mut webview, page) = headless();
    webview.eval("document.title = 'x'").unwrap();
    assert_eq!(page.evaluated(), vec!["document.title = 'x'".to_string()]);
}

// -- Window --

#[test]
fn title_and_bounds_reach_backend() {
    let (mut webview, page) = headless();
    webview.set_title("Demo").unwrap();
    webview
        .set_bounds(Bounds::new(10, 20, 640, 480), SizeHint::None)
        .unwrap();
    assert_eq!(page.title(), "Demo");
    assert_eq!(page.bounds(), Bounds::new(10, 20, 640, 480));

    webview.set_size(300, 200, SizeHint::Min).unwrap();
    assert_eq!(webview.bounds(), Bounds::new(10, 20, 640, 480));
    assert_eq!(page.min_size(), Some((300, 200)));
    assert_eq!(webview.size_hint(), SizeHint::None);

    webview.set_size(1024, 768, SizeHint::Fixed).unwrap();
    assert_eq!(webview.bounds(), Bounds::new(10, 20, 1024, 768));
    assert_eq!(webview.size_hint(), SizeHint::Fixed);
    assert!(!page.resizable());
}

#[test]
fn headless_has_no_window_handle() {
    let (webview, _page) = headless();
    assert!(webview.window_handle().is_none());
}

#[test]
fn event_handler_replaces_buffer() {
    let (mut webview, _page) = headless();
    webview.drain_events();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    webview.on_event(move |event| sink.borrow_mut().push(event.clone()));

    webview.navigate("ftp://nope").unwrap();
    assert_eq!(seen.borrow().len(), 1);
    assert!(webview.drain_events().is_empty());
}
