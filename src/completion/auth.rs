//! The auth-domain completion handler.
//!
//! Same Pending/Responded state machine and terminal semantics as
//! [`Completion`](super::Completion), different vocabulary: auth handlers
//! stage a token and optional attributes, and the error shorthands produce
//! OAuth-style `{error, error_description}` bodies with status 401.

use serde_json::{Map, Value};

use super::Callback;
use crate::task::Task;

/// OAuth-style auth failure kinds. All map to status 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AuthFailure {
    ServerError,
    AccessDenied,
    TemporarilyUnavailable,
}

impl AuthFailure {
    fn error(&self) -> &'static str {
        match self {
            AuthFailure::ServerError => "server_error",
            AuthFailure::AccessDenied => "access_denied",
            AuthFailure::TemporarilyUnavailable => "temporarily_unavailable",
        }
    }

    fn error_description(&self) -> &'static str {
        match self {
            AuthFailure::ServerError => {
                "The authentication server encountered an unexpected condition that prevented it from fulfilling the request"
            }
            AuthFailure::AccessDenied => {
                "The credentials provided were denied by the authentication handler"
            }
            AuthFailure::TemporarilyUnavailable => {
                "The authentication server is temporarily unable to handle the request"
            }
        }
    }
}

/// Fluent response builder for auth handlers.
///
/// ```ignore
/// service.auth().register("myAuth", |ctx, mut complete, _modules| {
///     complete
///         .set_token(json!({ "access_token": "abc123" }))
///         .add_attribute("email", json!("kid@example.com"))
///         .ok()
///         .done();
/// });
/// ```
pub struct AuthCompletion {
    handler_key: String,
    token: Value,
    attributes: Map<String, Value>,
    status: Option<u16>,
    failure: Option<AuthFailure>,
    pending: Option<(Task, Callback)>,
}

impl AuthCompletion {
    pub(crate) fn new(handler_key: impl Into<String>, task: Task, callback: Callback) -> Self {
        AuthCompletion {
            handler_key: handler_key.into(),
            token: Value::Null,
            attributes: Map::new(),
            status: None,
            failure: None,
            pending: Some((task, callback)),
        }
    }

    /// Stage the authentication token. A later call overwrites.
    pub fn set_token(&mut self, token: impl Into<Value>) -> &mut Self {
        self.token = token.into();
        self
    }

    /// Stage an extra attribute carried alongside the token in the success
    /// body.
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Remove a previously staged attribute.
    pub fn remove_attribute(&mut self, key: &str) -> &mut Self {
        self.attributes.remove(key);
        self
    }

    /// Status 200, authenticated.
    pub fn ok(&mut self) -> &mut Self {
        self.status = Some(200);
        self
    }

    /// 401 `server_error`.
    pub fn server_error(&mut self) -> &mut Self {
        self.fail(AuthFailure::ServerError)
    }

    /// 401 `access_denied`.
    pub fn access_denied(&mut self) -> &mut Self {
        self.fail(AuthFailure::AccessDenied)
    }

    /// 401 `temporarily_unavailable`.
    pub fn temporarily_unavailable(&mut self) -> &mut Self {
        self.fail(AuthFailure::TemporarilyUnavailable)
    }

    fn fail(&mut self, failure: AuthFailure) -> &mut Self {
        self.status = Some(401);
        self.failure = Some(failure);
        self
    }

    /// Terminal: commit and continue the pipeline.
    pub fn next(&mut self) {
        self.finish(true)
    }

    /// Terminal: commit as the final response.
    pub fn done(&mut self) {
        self.finish(false)
    }

    fn finish(&mut self, continue_: bool) {
        let Some((mut task, callback)) = self.pending.take() else {
            tracing::warn!(
                domain = "auth",
                handler = %self.handler_key,
                attempted = if continue_ { "next" } else { "done" },
                "response already submitted; repeat terminal call ignored"
            );
            return;
        };

        task.response.set_status(self.status.unwrap_or(200));
        task.response.set_body(self.body());
        task.response.set_continue(continue_);
        callback(task);
    }

    // Success bodies always carry `{token, authenticated}`; staged
    // attributes ride alongside them.
    fn body(&mut self) -> Value {
        if let Some(failure) = self.failure {
            return serde_json::json!({
                "error": failure.error(),
                "error_description": failure.error_description(),
            });
        }
        let mut body = Map::new();
        body.insert("token".to_string(), std::mem::take(&mut self.token));
        body.insert("authenticated".to_string(), Value::Bool(true));
        for (key, value) in std::mem::take(&mut self.attributes) {
            body.insert(key, value);
        }
        Value::Object(body)
    }

    /// Whether a terminal call has already been made.
    pub fn responded(&self) -> bool {
        self.pending.is_none()
    }
}
