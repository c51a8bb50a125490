//! Data domain — service-object CRUD dispatch.
//!
//! Inbound data tasks carry no explicit operation name; the dispatcher
//! infers one from the method/endpoint/body shape, resolves the handler
//! from the named service object's registry, and invokes it with a
//! [`DataContext`] and a [`Completion`].

mod infer;
mod service_object;

pub use infer::{infer_operation, InferError};
pub use service_object::{DataOperation, DataRegistry, InvalidOperation, ServiceObject};

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::completion::{Completion, WriteMode};
use crate::errors::{terminate, ErrorKind};
use crate::normalize::{normalize_slot, query_present, NormalizeError};
use crate::task::Task;

/// A registered data handler. Invoked with the request view, the
/// completion handler, and the per-task module bag.
pub type DataHandler<M> = Arc<dyn Fn(DataContext, Completion, M) + Send + Sync>;

/// The handler-facing view of a data task: the normalized request plus the
/// resolved query.
#[derive(Debug, Clone)]
pub struct DataContext {
    pub method: String,
    pub headers: HashMap<String, String>,
    pub service_object_name: String,
    pub entity_id: Option<String>,
    /// Normalized body (structured, never a JSON string).
    pub body: Value,
    /// Normalized query; `None` when the task carried none.
    pub query: Option<Value>,
    pub username: Option<String>,
    pub user_id: Option<String>,
}

/// Fallback for unregistered operations: self-completes with the
/// 501/NotImplemented outcome. Resolution itself never fails.
fn not_implemented<M>() -> DataHandler<M> {
    Arc::new(|_ctx, mut complete, _modules| {
        complete.not_implemented().done();
    })
}

impl<M> DataRegistry<M> {
    pub(crate) fn process<C>(&self, mut task: Task, modules: M, callback: C)
    where
        C: FnOnce(Task) + Send + 'static,
    {
        let Some(name) = task.request.service_object_name.clone() else {
            return terminate(
                task,
                ErrorKind::BadRequest,
                "No service object name found",
                callback,
            );
        };

        if let Err(e) = normalize_slot(&mut task.request.body, NormalizeError::Body) {
            return terminate(task, ErrorKind::BadRequest, &e.to_string(), callback);
        }
        if let Err(e) = normalize_slot(&mut task.request.query, NormalizeError::Query) {
            return terminate(task, ErrorKind::BadRequest, &e.to_string(), callback);
        }

        let Some(method) = task.method.clone() else {
            return terminate(
                task,
                ErrorKind::BadRequest,
                &InferError.to_string(),
                callback,
            );
        };

        let operation = match infer_operation(
            &method,
            task.endpoint.as_deref(),
            task.request.entity_id.is_some(),
            query_present(&task.request.query),
            &task.request.body,
        ) {
            Ok(operation) => operation,
            Err(e) => {
                return terminate(task, ErrorKind::BadRequest, &e.to_string(), callback)
            }
        };

        let handler = self
            .lookup(&name)
            .and_then(|so| so.resolve(operation))
            .unwrap_or_else(|| {
                tracing::debug!(
                    service_object = %name,
                    operation = %operation,
                    "no handler registered; falling back to NotImplemented"
                );
                not_implemented()
            });

        let request = &task.request;
        let context = DataContext {
            method,
            headers: request.headers.clone(),
            service_object_name: name.clone(),
            entity_id: request.entity_id.clone(),
            body: request.body.clone(),
            query: if query_present(&request.query) {
                Some(request.query.clone())
            } else {
                None
            },
            username: request.username.clone(),
            user_id: request.user_id.clone(),
        };

        let completion = Completion::new(
            "data",
            format!("{name}.{operation}"),
            WriteMode::Response,
            task,
            Box::new(callback),
        );
        handler(context, completion, modules);
    }
}
