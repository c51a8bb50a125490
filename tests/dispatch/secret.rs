//! Shared-secret gate: non-discovery tasks must present the key.

use flex_sdk::{FlexService, Task, TaskType};
use serde_json::json;

use crate::support::{data_task, dispatch};

fn gated_service() -> FlexService<()> {
    let service: FlexService<()> = FlexService::new().shared_secret("s3cr3t");
    service
        .data()
        .service_object("widgets")
        .on_insert(|_ctx, mut complete, _modules| {
            complete.set_body(json!({ "ok": true })).created().done();
        });
    service
}

#[test]
fn matching_key_dispatches() {
    let service = gated_service();
    let mut task = data_task("POST", "widgets");
    task.auth_key = Some("s3cr3t".to_string());

    let completed = dispatch(&service, task, ());
    assert_eq!(completed.response.status_code, Some(201));
}

#[test]
fn missing_key_is_unauthorized() {
    let service = gated_service();
    let completed = dispatch(&service, data_task("POST", "widgets"), ());

    assert_eq!(completed.response.status_code, Some(401));
    assert_eq!(completed.response.body["error"], "InvalidCredentials");
    assert!(!completed.response.continue_);
}

#[test]
fn wrong_key_is_unauthorized() {
    let service = gated_service();
    let mut task = data_task("POST", "widgets");
    task.auth_key = Some("letmein".to_string());

    let completed = dispatch(&service, task, ());
    assert_eq!(completed.response.status_code, Some(401));
}

#[test]
fn discovery_bypasses_the_gate() {
    let service = gated_service();
    let completed = dispatch(&service, Task::new(TaskType::ServiceDiscovery), ());
    assert_eq!(completed.response.status_code, Some(200));
    assert!(completed.discovery_objects.is_some());
}

#[test]
fn ungated_service_ignores_auth_key() {
    let service: FlexService<()> = FlexService::new();
    service
        .data()
        .service_object("widgets")
        .on_insert(|_ctx, mut complete, _modules| complete.created().done());

    let mut task = data_task("POST", "widgets");
    task.auth_key = Some("anything".to_string());
    let completed = dispatch(&service, task, ());
    assert_eq!(completed.response.status_code, Some(201));
}
