//! Completion protocol through the dispatcher: single-response guarantee
//! and handler-scheduled completion.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use flex_sdk::FlexService;
use serde_json::json;

use crate::support::{data_task, dispatch, functions_task};

#[test]
fn double_completion_reflects_first_outcome_only() {
    let service: FlexService<()> = FlexService::new();
    service
        .data()
        .service_object("widgets")
        .on_insert(|_ctx, mut complete, _modules| {
            complete.set_body(json!({ "winner": true })).created().next();
            // Protocol violation: already responded. Must not fire the
            // callback again or disturb the committed response.
            complete.not_found().done();
        });

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let (tx, rx) = std::sync::mpsc::channel();
    service.process(data_task("POST", "widgets"), (), move |task| {
        counter.fetch_add(1, Ordering::SeqCst);
        tx.send(task).unwrap();
    });

    let completed = rx.recv_timeout(Duration::from_secs(2)).unwrap();
    // Give a hypothetical second invocation a moment to surface.
    assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(completed.response.status_code, Some(201));
    assert_eq!(completed.response.body, json!({ "winner": true }));
    assert!(completed.response.continue_);
}

#[test]
fn handler_may_complete_from_another_thread() {
    let service: FlexService<()> = FlexService::new();
    service
        .functions()
        .register("slowJob", |_ctx, mut complete, _modules| {
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(20));
                complete.set_body(json!({ "finished": true })).ok().done();
            });
        });

    let completed = dispatch(&service, functions_task("slowJob", None), ());
    assert_eq!(completed.response.body, json!({ "finished": true }));
}

#[test]
fn error_shorthand_then_next_still_continues() {
    let service: FlexService<()> = FlexService::new();
    service
        .data()
        .service_object("widgets")
        .on_get_by_id(|_ctx, mut complete, _modules| {
            complete.set_body(json!("entity 42 missing")).not_found().next();
        });

    let mut task = data_task("GET", "widgets");
    task.request.entity_id = Some("42".to_string());
    let completed = dispatch(&service, task, ());

    assert_eq!(completed.response.status_code, Some(404));
    assert_eq!(completed.response.body["error"], "NotFound");
    assert_eq!(completed.response.body["debug"], "entity 42 missing");
    assert!(completed.response.continue_);
}

#[test]
fn runtime_error_with_detail() {
    let service: FlexService<()> = FlexService::new();
    service
        .functions()
        .register("fragile", |_ctx, mut complete, _modules| {
            let detail = flex_sdk::ErrorDetail::new("BackendError", "upstream refused");
            complete.set_error(detail).runtime_error().done();
        });

    let completed = dispatch(&service, functions_task("fragile", None), ());
    assert_eq!(completed.response.status_code, Some(550));
    assert_eq!(completed.response.body["error"], "FlexRuntimeError");
    assert_eq!(completed.response.body["debug"]["name"], "BackendError");
    assert_eq!(completed.response.body["debug"]["message"], "upstream refused");
}
