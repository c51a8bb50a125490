//! Error taxonomy for task dispatch.
//!
//! Routing and malformed-input failures terminate a single task with a
//! structured `{error, description, debug}` body; they are never fatal to
//! the process and never propagate out of `process` as a panic or `Err`.

use std::error::Error;
use std::fmt;

use serde_json::{json, Value};

use crate::task::Task;

/// Semantic outcome kinds with fixed status codes and wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    NotAllowed,
    NotImplemented,
    RuntimeError,
}

impl ErrorKind {
    /// HTTP-style status code for this outcome.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::NotAllowed => 405,
            ErrorKind::NotImplemented => 501,
            ErrorKind::RuntimeError => 550,
        }
    }

    /// Wire name carried in the `error` field.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::Unauthorized => "InvalidCredentials",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::NotAllowed => "NotAllowed",
            ErrorKind::NotImplemented => "NotImplemented",
            ErrorKind::RuntimeError => "FlexRuntimeError",
        }
    }

    /// Fixed human-readable description carried in the `description` field.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Unable to understand request",
            ErrorKind::Unauthorized => {
                "Invalid credentials. Please retry your request with correct credentials"
            }
            ErrorKind::Forbidden => "The request is forbidden",
            ErrorKind::NotFound => {
                "The requested entity or entities were not found in the serviceObject"
            }
            ErrorKind::NotAllowed => "The request is not allowed",
            ErrorKind::NotImplemented => {
                "The request invoked a method that is not implemented"
            }
            ErrorKind::RuntimeError => {
                "The Flex service had a runtime error. See debug message for details"
            }
        }
    }

    /// Build the structured error body for this kind.
    pub fn body(&self, debug: Value) -> Value {
        json!({
            "error": self.name(),
            "description": self.description(),
            "debug": debug,
        })
    }
}

/// An explicit, serializable error value handlers can stage as a debug
/// payload. Replaces runtime is-this-an-Error inspection: callers construct
/// it deliberately, typically via [`ErrorDetail::from_err`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    pub name: String,
    pub message: String,
    pub stack: Option<String>,
}

impl ErrorDetail {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        ErrorDetail {
            name: name.into(),
            message: message.into(),
            stack: None,
        }
    }

    /// Capture a std error as `{name, message, stack}`. The source chain,
    /// if any, becomes the stack text.
    pub fn from_err(err: &(dyn Error + 'static)) -> Self {
        let mut stack = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            stack.push(cause.to_string());
            source = cause.source();
        }
        ErrorDetail {
            name: "Error".to_string(),
            message: err.to_string(),
            stack: if stack.is_empty() {
                None
            } else {
                Some(stack.join("\n"))
            },
        }
    }

    pub fn to_value(&self) -> Value {
        json!({
            "name": self.name,
            "message": self.message,
            "stack": self.stack,
        })
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

impl Error for ErrorDetail {}

/// Commit a terminal error response onto the task and hand it to the
/// callback. Used by the dispatchers for routing and malformed-input
/// short-circuits; the registered handler is never invoked on this path.
pub(crate) fn terminate<C>(mut task: Task, kind: ErrorKind, debug: &str, callback: C)
where
    C: FnOnce(Task),
{
    task.response.set_status(kind.status_code());
    task.response.set_body(kind.body(Value::String(debug.to_string())));
    task.response.set_continue(false);
    callback(task);
}
