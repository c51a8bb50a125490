//! Completion handlers — the fluent response builders handed to handler code.
//!
//! One completion handler is constructed per dispatched task. Non-terminal
//! methods stage a result and chain; exactly one of `next()` / `done()`
//! commits the staged result onto the task and invokes the dispatch
//! callback. A second terminal call is a protocol violation: it neither
//! re-mutates the committed response nor re-invokes the callback, and it is
//! reported through `tracing` so operators can find misbehaving handlers.

mod auth;
mod handler;

pub use auth::AuthCompletion;
pub use handler::Completion;

use crate::task::Task;

/// The single-use callback a completion handler fires on its first
/// terminal call. Receives the completed task; per-task errors are carried
/// in `task.response`, never as a separate error channel.
pub(crate) type Callback = Box<dyn FnOnce(Task) + Send>;

/// Where `next()` writes the staged result.
///
/// Functions pre-hooks and custom endpoints mutate the request so the
/// pipeline continues with the modified input; everything else (data,
/// post-hooks, auth) writes the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WriteMode {
    Request,
    Response,
}
