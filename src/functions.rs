//! Functions domain — custom business-logic hooks and endpoints.
//!
//! Functions tasks name their handler directly (`taskName`); the hook type
//! decides which side of the task the handler reads, and which side
//! `next()` writes back to:
//!
//! - `pre` / `customEndpoint` — context reads the request; `next()`
//!   rewrites the request so later pipeline stages see the modified input.
//! - `post` — context reads the upstream response; `next()` writes the
//!   response.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::completion::{Completion, WriteMode};
use crate::errors::{terminate, ErrorKind};
use crate::normalize::{normalize_slot, NormalizeError};
use crate::registry::HandlerTable;
use crate::task::{HookType, Task};

/// A registered functions handler.
pub type FunctionsHandler<M> = Arc<dyn Fn(FunctionsContext, Completion, M) + Send + Sync>;

/// The handler-facing view of a functions task.
///
/// `body` and `headers` come from the hook-selected side of the task.
/// `object_name` is the first non-null of the request's `objectName` /
/// `collectionName`.
#[derive(Debug, Clone)]
pub struct FunctionsContext {
    pub method: Option<String>,
    pub username: Option<String>,
    pub user_id: Option<String>,
    pub entity_id: Option<String>,
    pub login_options: Option<Value>,
    pub object_name: Option<String>,
    pub hook_type: Option<HookType>,
    pub body: Value,
    pub headers: HashMap<String, String>,
    /// For post hooks whose upstream stage already failed (status > 399),
    /// that status — handlers can inspect it before deciding to continue.
    pub status: Option<u16>,
}

/// The functions-domain registry: task name to handler.
pub struct FunctionsRegistry<M> {
    handlers: HandlerTable<String, FunctionsHandler<M>>,
}

fn not_implemented<M>() -> FunctionsHandler<M> {
    Arc::new(|_ctx, mut complete, _modules| {
        complete.not_implemented().done();
    })
}

impl<M> FunctionsRegistry<M> {
    pub(crate) fn new() -> Self {
        FunctionsRegistry {
            handlers: HandlerTable::new(),
        }
    }

    /// Store or overwrite the handler for `task_name`.
    pub fn register<F>(&self, task_name: impl Into<String>, handler: F) -> &Self
    where
        F: Fn(FunctionsContext, Completion, M) + Send + Sync + 'static,
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

        // A task without a hook type is a custom-endpoint invocation.
        let post_hook = task.hook_type == Some(HookType::Post);
        let active_body = if post_hook {
            &mut task.response.body
        } else {
            &mut task.request.body
        };
        if let Err(e) = normalize_slot(active_body, NormalizeError::Body) {
            return terminate(task, ErrorKind::BadRequest, &e.to_string(), callback);
        }

        let handler = self.handlers.resolve(&task_name).unwrap_or_else(|| {
            tracing::debug!(
                task_name = %task_name,
                "no handler registered; falling back to NotImplemented"
            );
            not_implemented()
        });

        let request = &task.request;
        let (body, headers) = if post_hook {
            (task.response.body.clone(), task.response.headers.clone())
        } else {
            (request.body.clone(), request.headers.clone())
        };
        let context = FunctionsContext {
            method: task.method.clone(),
            username: request.username.clone(),
            user_id: request.user_id.clone(),
            entity_id: request.entity_id.clone(),
            login_options: request.login_options.clone(),
            object_name: request
                .object_name
                .clone()
                .or_else(|| request.collection_name.clone()),
            hook_type: task.hook_type,
            body,
            headers,
            status: task
                .response
                .status_code
                .filter(|status| post_hook && *status > 399),
        };

        let mode = if post_hook {
            WriteMode::Response
        } else {
            WriteMode::Request
        };
        let completion = Completion::new("functions", task_name, mode, task, Box::new(callback));
        handler(context, completion, modules);
    }
}
