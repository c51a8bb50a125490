//! Task — the unit-of-work envelope exchanged with the host transport.
//!
//! The host delivers one `Task` per inbound call. The dispatcher and the
//! completion handler mutate it in place, then hand it back through the
//! dispatch callback; nothing is persisted.
//!
//! Wire shape (camelCase JSON):
//!
//! ```json
//! {
//!   "taskType": "data",
//!   "method": "POST",
//!   "request": {
//!     "serviceObjectName": "widgets",
//!     "headers": { "x-request-id": "abc" },
//!     "body": "{\"name\":\"sprocket\"}"
//!   },
//!   "response": { "body": null, "continue": false }
//! }
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The count-marker endpoint: `GET` against it selects the count operations.
pub const COUNT_ENDPOINT: &str = "_count";

/// Closed set of task kinds the host can deliver.
///
/// Routing switches over this enum — there is no stringly-typed dispatch,
/// and an unknown task type is rejected at deserialization time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskType {
    /// Data CRUD against a named service object.
    Data,
    /// Custom business logic invoked by task name.
    Functions,
    /// Authentication handlers invoked by task name.
    Auth,
    /// Registry enumeration; bypasses dispatch entirely.
    ServiceDiscovery,
}

/// For functions tasks: which pipeline stage this invocation represents.
///
/// Determines which side of the task (request vs. response) the handler
/// context reads from, and where `next()` writes back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HookType {
    Pre,
    Post,
    CustomEndpoint,
}

/// The inbound side of a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Request {
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    /// Raw body. May arrive as a JSON string; normalization parses it in
    /// place before any handler sees it.
    pub body: Value,
    /// Raw query. Same normalization rules as `body`.
    pub query: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_object_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_options: Option<Value>,
}

/// The outbound side of a task.
///
/// Mutated only through the setters (or by the completion handler), so the
/// committed-response invariants stay in one place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Response {
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    pub body: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// `true` tells the outer pipeline orchestrator to run subsequent hook
    /// stages; `false` means this response is final.
    #[serde(rename = "continue")]
    pub continue_: bool,
}

impl Response {
    pub fn set_body(&mut self, body: Value) {
        self.body = body;
    }

    pub fn set_status(&mut self, status: u16) {
        self.status_code = Some(status);
    }

    pub fn set_continue(&mut self, continue_: bool) {
        self.continue_ = continue_;
    }
}

/// Registered-handler enumeration returned for a service-discovery task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryObjects {
    pub data_link: DataLinkDiscovery,
    pub business_logic: HandlerDiscovery,
    pub auth: HandlerDiscovery,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataLinkDiscovery {
    pub service_objects: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerDiscovery {
    pub handlers: Vec<String>,
}

/// The unit of work.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub task_type: TaskType,
    /// Handler key for functions/auth tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
    /// HTTP-like verb; drives operation inference for data tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Optional sub-route marker (see [`COUNT_ENDPOINT`]).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hook_type: Option<HookType>,
    /// Pre-shared key credential, checked when the service is configured
    /// with a shared secret.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_key: Option<String>,
    #[serde(default)]
    pub request: Request,
    #[serde(default)]
    pub response: Response,
    /// Populated only for service-discovery tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discovery_objects: Option<DiscoveryObjects>,
}

impl Task {
    /// Create an empty task of the given type. Transports deserialize
    /// tasks from the wire; this is mainly for tests and embedding.
    pub fn new(task_type: TaskType) -> Self {
        Task {
            task_type,
            task_name: None,
            method: None,
            endpoint: None,
            hook_type: None,
            auth_key: None,
            request: Request::default(),
            response: Response::default(),
            discovery_objects: None,
        }
    }
}
