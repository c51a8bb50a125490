//! HTTP transport — receives serialized tasks and replies with the
//! completed envelope.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `POST /` — dispatch a task. Body = task JSON; the reply is the same
//!   task with its response envelope filled in.
//! - `GET /healthcheck` — returns `{ "healthy": true }`.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use flex_sdk::FlexService;
//!
//! let service: Arc<FlexService<()>> = Arc::new(FlexService::new());
//! // Compose with other axum routes...
//! let app = flex_sdk::http::router(service.clone(), Arc::new(|_task| ()));
//! // ...or serve directly.
//! flex_sdk::http::serve(service, Arc::new(|_task| ()), "0.0.0.0:7777").await?;
//! ```

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::service::FlexService;
use crate::task::Task;

/// Builds the per-task module bag handed to every handler — the
/// `generate(task)` seam of the module-builder collaborator. Called once
/// per inbound task, before dispatch.
pub type ModuleFactory<M> = Arc<dyn Fn(&Task) -> M + Send + Sync>;

struct TaskState<M> {
    service: Arc<FlexService<M>>,
    modules: ModuleFactory<M>,
}

// Derived Clone would demand M: Clone; only the Arcs are cloned.
impl<M> Clone for TaskState<M> {
    fn clone(&self) -> Self {
        TaskState {
            service: self.service.clone(),
            modules: self.modules.clone(),
        }
    }
}

/// Build an axum `Router` that dispatches tasks through the given service.
pub fn router<M: Send + 'static>(
    service: Arc<FlexService<M>>,
    modules: ModuleFactory<M>,
) -> Router {
    Router::new()
        .route("/healthcheck", get(healthcheck_handler))
        .route("/", post(task_handler::<M>))
        .with_state(TaskState { service, modules })
}

/// Serve the service over HTTP at the given address (e.g. `"0.0.0.0:7777"`).
pub async fn serve<M: Send + 'static>(
    service: Arc<FlexService<M>>,
    modules: ModuleFactory<M>,
    addr: &str,
) -> Result<(), std::io::Error> {
    let app = router(service, modules);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

/// `GET /healthcheck` — returns `{ "healthy": true }`.
async fn healthcheck_handler() -> impl IntoResponse {
    Json(json!({ "healthy": true }))
}

/// `POST /` — dispatch one task and await its completion.
///
/// The callback-style core is bridged through a oneshot channel. If the
/// handler drops its completion without ever calling a terminal method,
/// the channel closes and the transport answers 500 instead of hanging.
async fn task_handler<M: Send + 'static>(
    State(state): State<TaskState<M>>,
    Json(task): Json<Task>,
) -> impl IntoResponse {
    let (tx, rx) = tokio::sync::oneshot::channel();
    let modules = (state.modules)(&task);
    state.service.process(task, modules, move |task| {
        let _ = tx.send(task);
    });

    match rx.await {
        Ok(task) => Json(task).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "task abandoned before completion" })),
        )
            .into_response(),
    }
}
