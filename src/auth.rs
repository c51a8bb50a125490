//! Auth domain — authentication handlers invoked by task name.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::completion::AuthCompletion;
use crate::errors::{terminate, ErrorKind};
use crate::normalize::{normalize_slot, NormalizeError};
use crate::registry::HandlerTable;
use crate::task::Task;

/// A registered auth handler.
pub type AuthHandler<M> = Arc<dyn Fn(AuthContext, AuthCompletion, M) + Send + Sync>;

/// The handler-facing view of an auth task: the normalized request body
/// (typically credentials) plus the request headers.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub body: Value,
    pub headers: HashMap<String, String>,
}

/// The auth-domain registry: task name to handler.
pub struct AuthRegistry<M> {
    handlers: HandlerTable<String, AuthHandler<M>>,
}

/// Fallback for unregistered auth handlers: a 401 `server_error`, the auth
/// rendition of NotImplemented.
fn not_implemented<M>() -> AuthHandler<M> {
    Arc::new(|_ctx, mut complete, _modules| {
        complete.server_error().done();
    })
}

impl<M> AuthRegistry<M> {
    pub(crate) fn new() -> Self {
        AuthRegistry {
            handlers: HandlerTable::new(),
        }
    }

    /// Store or overwrite the handler for `task_name`.
    pub fn register<F>(&self, task_name: impl Into<String>, handler: F) -> &Self
    where
        F: Fn(AuthContext, AuthCompletion, M) + Send + Sync + 'static,
    {
        self.handlers.register(task_name.into(), Arc::new(handler));
        self
    }

    /// Registered task names, in registration order.
    pub fn handler_names(&self) -> Vec<String> {
        self.handlers.keys()
    }

    /// Remove one registration.
    pub fn unregister(&self, task_name: &str) -> bool {
        self.handlers.unregister(&task_name.to_string())
    }

    /// Empty the registry.
    pub fn clear_all(&self) {
        self.handlers.clear_all();
    }

    pub(crate) fn process<C>(&self, mut task: Task, modules: M, callback: C)
    where
        C: FnOnce(Task) + Send + 'static,
    {
        let Some(task_name) = task.task_name.clone() else {
            return terminate(
                task,
                ErrorKind::BadRequest,
                "No task name to execute",
                callback,
            );
        };

        if let Err(e) = normalize_slot(&mut task.request.body, NormalizeError::Body) {
            return terminate(task, ErrorKind::BadRequest, &e.to_string(), callback);
        }

        let handler = self.handlers.resolve(&task_name).unwrap_or_else(|| {
            tracing::debug!(
                task_name = %task_name,
                "no auth handler registered; falling back to server_error"
            );
            not_implemented()
        });

        let context = AuthContext {
            body: task.request.body.clone(),
            headers: task.request.headers.clone(),
        };
        let completion = AuthCompletion::new(task_name, task, Box::new(callback));
        handler(context, completion, modules);
    }
}
