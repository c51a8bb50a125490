//! FlexService — the service façade owning the per-domain registries.
//!
//! Registries are explicit, instance-owned state, never module-level
//! singletons: multiple independent services can coexist in one process
//! (and in tests). Generic over `M`, the opaque module bag the host builds
//! per task and every handler receives as its third argument.
//!
//! ## Example
//!
//! ```ignore
//! use flex_sdk::{FlexService, Task, TaskType};
//! use serde_json::json;
//!
//! let service: FlexService<()> = FlexService::new();
//! service.data().service_object("widgets").on_insert(|_ctx, mut complete, _modules| {
//!     complete.set_body(json!({ "_id": "w1" })).created().next();
//! });
//!
//! let mut task = Task::new(TaskType::Data);
//! task.method = Some("POST".into());
//! task.request.service_object_name = Some("widgets".into());
//! service.process(task, (), |task| {
//!     assert_eq!(task.response.status_code, Some(201));
//! });
//! ```

use crate::auth::AuthRegistry;
use crate::data::DataRegistry;
use crate::errors::{terminate, ErrorKind};
use crate::functions::FunctionsRegistry;
use crate::task::{
    DataLinkDiscovery, DiscoveryObjects, HandlerDiscovery, Task, TaskType,
};

/// A Flex service instance: three handler registries plus the optional
/// shared-secret gate.
pub struct FlexService<M> {
    data: DataRegistry<M>,
    functions: FunctionsRegistry<M>,
    auth: AuthRegistry<M>,
    shared_secret: Option<String>,
}

impl<M> FlexService<M> {
    /// Create a service with empty registries and no shared secret.
    pub fn new() -> Self {
        FlexService {
            data: DataRegistry::new(),
            functions: FunctionsRegistry::new(),
            auth: AuthRegistry::new(),
            shared_secret: None,
        }
    }

    /// Require every non-discovery task to carry this pre-shared key.
    ///
    /// Builder pattern — returns `self` for chaining.
    pub fn shared_secret(mut self, secret: impl Into<String>) -> Self {
        self.shared_secret = Some(secret.into());
        self
    }

    /// The data-domain registry (service objects).
    pub fn data(&self) -> &DataRegistry<M> {
        &self.data
    }

    /// The functions-domain registry.
    pub fn functions(&self) -> &FunctionsRegistry<M> {
        &self.functions
    }

    /// The auth-domain registry.
    pub fn auth(&self) -> &AuthRegistry<M> {
        &self.auth
    }

    /// Dispatch one task.
    ///
    /// Routes by the task's type, injects a fresh completion handler, and
    /// returns as soon as the registered handler has been invoked; the
    /// callback fires exactly once with the completed task, on whatever
    /// schedule the handler chooses. `process` itself never fails for any
    /// reachable input — per-task errors arrive through the callback as a
    /// task whose `response.status_code >= 400`.
    ///
    /// A handler that never calls a terminal completion method hangs the
    /// host-side request; timeouts are the host's responsibility.
    pub fn process<C>(&self, task: Task, modules: M, callback: C)
    where
        C: FnOnce(Task) + Send + 'static,
    {
        if task.task_type == TaskType::ServiceDiscovery {
            return self.discover(task, callback);
        }

        if let Some(secret) = &self.shared_secret {
            if task.auth_key.as_deref() != Some(secret.as_str()) {
                return terminate(
                    task,
                    ErrorKind::Unauthorized,
                    "The shared secret provided with the request is missing or does not match",
                    callback,
                );
            }
        }

        match task.task_type {
            TaskType::Data => self.data.process(task, modules, callback),
            TaskType::Functions => self.functions.process(task, modules, callback),
            TaskType::Auth => self.auth.process(task, modules, callback),
            // Handled above; the match stays exhaustive without a wildcard
            // so a new task type is a compile error here.
            TaskType::ServiceDiscovery => unreachable!("discovery handled before dispatch"),
        }
    }

    // Discovery bypasses dispatch, the secret gate included: the host uses
    // it to enumerate registered handlers without invoking any of them.
    fn discover<C>(&self, mut task: Task, callback: C)
    where
        C: FnOnce(Task),
    {
        task.discovery_objects = Some(DiscoveryObjects {
            data_link: DataLinkDiscovery {
                service_objects: self.data.service_object_names(),
            },
            business_logic: HandlerDiscovery {
                handlers: self.functions.handler_names(),
            },
            auth: HandlerDiscovery {
                handlers: self.auth.handler_names(),
            },
        });
        task.response.set_status(200);
        task.response.set_continue(false);
        callback(task);
    }
}

impl<M> Default for FlexService<M> {
    fn default() -> Self {
        Self::new()
    }
}
