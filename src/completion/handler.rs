//! The data / functions completion handler.

use serde_json::{json, Value};

use super::{Callback, WriteMode};
use crate::errors::{ErrorDetail, ErrorKind};
use crate::task::Task;

/// Fluent response builder for data and functions handlers.
///
/// Every non-terminal method returns `&mut Self` so calls chain:
///
/// ```ignore
/// service.data().service_object("widgets").on_insert(|ctx, mut complete, _modules| {
///     complete.set_body(json!({ "_id": "abc" })).created().next();
/// });
/// ```
///
/// The handler owns the completion and may move it anywhere, including
/// another thread — completion happens on the handler's schedule, not the
/// dispatcher's.
pub struct Completion {
    domain: &'static str,
    handler_key: String,
    mode: WriteMode,
    body: Option<Value>,
    query: Option<Value>,
    status: Option<u16>,
    /// Taken on the first terminal call; `None` means Responded.
    pending: Option<(Task, Callback)>,
}

impl Completion {
    pub(crate) fn new(
        domain: &'static str,
        handler_key: impl Into<String>,
        mode: WriteMode,
        task: Task,
        callback: Callback,
    ) -> Self {
        Completion {
            domain,
            handler_key: handler_key.into(),
            mode,
            body: None,
            query: None,
            status: None,
            pending: Some((task, callback)),
        }
    }

    /// Stage the response (or continuation-request) body. A later call
    /// overwrites an earlier one.
    pub fn set_body(&mut self, body: impl Into<Value>) -> &mut Self {
        self.body = Some(body.into());
        self
    }

    /// Stage a continuation query. Only written back on `next()` in
    /// request-mutation mode.
    pub fn set_query(&mut self, query: Value) -> &mut Self {
        self.query = Some(query);
        self
    }

    /// Stage a normalized error value as the body/debug payload.
    pub fn set_error(&mut self, detail: ErrorDetail) -> &mut Self {
        self.body = Some(detail.to_value());
        self
    }

    /// Status 200.
    pub fn ok(&mut self) -> &mut Self {
        self.status = Some(200);
        self
    }

    /// Status 201.
    pub fn created(&mut self) -> &mut Self {
        self.status = Some(201);
        self
    }

    /// Status 202.
    pub fn accepted(&mut self) -> &mut Self {
        self.status = Some(202);
        self
    }

    /// 400 BadRequest.
    ///
    /// Like every error shorthand: a body staged beforehand (via
    /// [`set_body`](Self::set_body) or [`set_error`](Self::set_error))
    /// becomes the error envelope's `debug` payload.
    ///
    /// ```ignore
    /// complete.set_body(json!("entity 42 missing")).not_found().done();
    /// ```
    pub fn bad_request(&mut self) -> &mut Self {
        self.fail(ErrorKind::BadRequest)
    }

    /// 401 InvalidCredentials.
    pub fn unauthorized(&mut self) -> &mut Self {
        self.fail(ErrorKind::Unauthorized)
    }

    /// 403 Forbidden.
    pub fn forbidden(&mut self) -> &mut Self {
        self.fail(ErrorKind::Forbidden)
    }

    /// 404 NotFound; the staged body becomes `debug`.
    pub fn not_found(&mut self) -> &mut Self {
        self.fail(ErrorKind::NotFound)
    }

    /// 405 NotAllowed.
    pub fn not_allowed(&mut self) -> &mut Self {
        self.fail(ErrorKind::NotAllowed)
    }

    /// 501 NotImplemented; the staged body becomes `debug`.
    pub fn not_implemented(&mut self) -> &mut Self {
        self.fail(ErrorKind::NotImplemented)
    }

    /// 550 FlexRuntimeError; the staged body becomes `debug`.
    pub fn runtime_error(&mut self) -> &mut Self {
        self.fail(ErrorKind::RuntimeError)
    }

    // Error shorthands replace the staged body with the structured error
    // envelope; whatever was staged before becomes the debug payload.
    fn fail(&mut self, kind: ErrorKind) -> &mut Self {
        let debug = self.body.take().unwrap_or_else(|| json!({}));
        self.status = Some(kind.status_code());
        self.body = Some(kind.body(debug));
        self
    }

    /// Terminal: commit the staged result and tell the pipeline to keep
    /// going (`response.continue = true`). In request-mutation mode the
    /// staged body/query write back into the request.
    pub fn next(&mut self) {
        self.finish(true)
    }

    /// Terminal: commit the staged result as the final response
    /// (`response.continue = false`). Always writes the response body.
    pub fn done(&mut self) {
        self.finish(false)
    }

    fn finish(&mut self, continue_: bool) {
        let Some((mut task, callback)) = self.pending.take() else {
            tracing::warn!(
                domain = self.domain,
                handler = %self.handler_key,
                attempted = if continue_ { "next" } else { "done" },
                "response already submitted; repeat terminal call ignored"
            );
            return;
        };

        task.response.set_status(self.status.unwrap_or(200));
        match (self.mode, continue_) {
            (WriteMode::Request, true) => {
                if let Some(body) = self.body.take() {
                    task.request.body = body;
                }
                if let Some(query) = self.query.take() {
                    task.request.query = query;
                }
            }
            _ => {
                if let Some(body) = self.body.take() {
                    task.response.set_body(body);
                }
            }
        }
        task.response.set_continue(continue_);
        callback(task);
    }

    /// Whether a terminal call has already been made.
    pub fn responded(&self) -> bool {
        self.pending.is_none()
    }
}
