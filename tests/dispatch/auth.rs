//! Auth-domain dispatch: token bodies, OAuth-style failures, fallbacks.

use std::sync::{Arc, Mutex};

use flex_sdk::{FlexService, Task, TaskType};
use serde_json::{json, Value};

use crate::support::{auth_task, dispatch};

#[test]
fn successful_authentication() {
    let service: FlexService<()> = FlexService::new();
    service.auth().register("ldap", |ctx, mut complete, _modules| {
        assert_eq!(ctx.body["username"], "kid");
        complete
            .set_token(json!({ "access_token": "abc123" }))
            .add_attribute("email", json!("kid@example.com"))
            .ok()
            .done();
    });

    let mut task = auth_task("ldap");
    task.request.body = json!({ "username": "kid", "password": "hunter2" });
    let completed = dispatch(&service, task, ());

    assert_eq!(completed.response.status_code, Some(200));
    assert_eq!(
        completed.response.body,
        json!({
            "token": { "access_token": "abc123" },
            "authenticated": true,
            "email": "kid@example.com"
        })
    );
    assert!(!completed.response.continue_);
}

#[test]
fn denied_authentication() {
    let service: FlexService<()> = FlexService::new();
    service.auth().register("ldap", |_ctx, mut complete, _modules| {
        complete.access_denied().done();
    });

    let completed = dispatch(&service, auth_task("ldap"), ());
    assert_eq!(completed.response.status_code, Some(401));
    assert_eq!(completed.response.body["error"], "access_denied");
    assert!(completed.response.body["error_description"].is_string());
}

#[test]
fn temporarily_unavailable() {
    let service: FlexService<()> = FlexService::new();
    service.auth().register("ldap", |_ctx, mut complete, _modules| {
        complete.temporarily_unavailable().done();
    });

    let completed = dispatch(&service, auth_task("ldap"), ());
    assert_eq!(completed.response.status_code, Some(401));
    assert_eq!(
        completed.response.body["error"],
        "temporarily_unavailable"
    );
}

#[test]
fn missing_task_name_terminates() {
    let service: FlexService<()> = FlexService::new();
    let completed = dispatch(&service, Task::new(TaskType::Auth), ());
    assert_eq!(completed.response.status_code, Some(400));
    assert_eq!(completed.response.body["debug"], "No task name to execute");
}

#[test]
fn credentials_arrive_parsed_from_string_body() {
    let service: FlexService<()> = FlexService::new();
    let seen = Arc::new(Mutex::new(Value::Null));
    let sink = seen.clone();
    service.auth().register("ldap", move |ctx, mut complete, _modules| {
        *sink.lock().unwrap() = ctx.body.clone();
        complete.ok().done();
    });

    let mut task = auth_task("ldap");
    task.request.body = json!(r#"{"username":"kid"}"#);
    dispatch(&service, task, ());
    assert_eq!(*seen.lock().unwrap(), json!({ "username": "kid" }));
}

#[test]
fn unparsable_credentials_are_bad_request() {
    let service: FlexService<()> = FlexService::new();
    let mut task = auth_task("ldap");
    task.request.body = json!("username=kid");

    let completed = dispatch(&service, task, ());
    assert_eq!(completed.response.status_code, Some(400));
    assert_eq!(completed.response.body["debug"], "Request body is not JSON");
}
