//! flex_sdk — request-dispatch SDK for the Flex extension runtime.
//!
//! The host transport delivers opaque task envelopes describing inbound
//! HTTP-like operations (data CRUD, custom business logic,
//! authentication). This crate routes each task to a developer-registered
//! handler and translates the handler's fluent completion calls back into
//! a response envelope mutated on the original task.
//!
//! ## Quick start
//!
//! ```ignore
//! use flex_sdk::{FlexService, Task, TaskType};
//! use serde_json::json;
//!
//! let service: FlexService<()> = FlexService::new();
//!
//! service.data().service_object("widgets").on_insert(|ctx, mut complete, _modules| {
//!     complete.set_body(json!({ "_id": "w1", "name": ctx.body["name"] }))
//!         .created()
//!         .next();
//! });
//!
//! service.functions().register("sendReceipt", |ctx, mut complete, _modules| {
//!     complete.set_body(ctx.body).ok().done();
//! });
//!
//! // The host hands tasks in; the callback fires once per task with the
//! // completed envelope.
//! # let task = Task::new(TaskType::Data);
//! service.process(task, (), |task| {
//!     // serialize task back to the host
//! });
//! ```
//!
//! Handlers own their completion handler and may finish on any schedule —
//! inline, after async work, or from another thread. Exactly one of
//! `next()` / `done()` commits the result; repeats are reported through
//! `tracing` and ignored.

mod auth;
mod completion;
mod data;
mod errors;
mod functions;
mod normalize;
mod registry;
mod service;
mod task;

pub use auth::{AuthContext, AuthHandler, AuthRegistry};
pub use completion::{AuthCompletion, Completion};
pub use data::{
    infer_operation, DataContext, DataHandler, DataOperation, DataRegistry, InferError,
    InvalidOperation, ServiceObject,
};
pub use errors::{ErrorDetail, ErrorKind};
pub use functions::{FunctionsContext, FunctionsHandler, FunctionsRegistry};
pub use normalize::{normalize_slot, query_present, NormalizeError};
pub use registry::HandlerTable;
pub use service::FlexService;
pub use task::{
    DataLinkDiscovery, DiscoveryObjects, HandlerDiscovery, HookType, Request, Response, Task,
    TaskType, COUNT_ENDPOINT,
};

// HTTP transport (requires "http" feature)
#[cfg(feature = "http")]
pub mod http;

/// Register functions-handler modules using the convention pattern.
///
/// Each handler module must export:
/// - `NAME: &str` — the task name
/// - `handle(ctx, complete, modules)` — the handler
///
/// # Example
/// ```ignore
/// // src/handlers/send_receipt.rs
/// pub const NAME: &str = "sendReceipt";
/// pub fn handle(ctx: FunctionsContext, mut complete: Completion, _modules: ()) {
///     complete.set_body(ctx.body).ok().done();
/// }
///
/// flex_sdk::register_functions!(
///     service.functions(),
///     handlers::send_receipt,
///     handlers::order_shipped,
/// );
/// ```
#[macro_export]
macro_rules! register_functions {
    ($registry:expr, $( $($seg:ident)::+ ),+ $(,)?) => {
        {
            let registry = $registry;
            $(
                registry.register($($seg)::+::NAME, $($seg)::+::handle);
            )+
        }
    };
}
