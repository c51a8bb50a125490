//! Operation inference — map a task's method/endpoint/body shape to a
//! named data operation.
//!
//! Pure decision function. Presence of an entity id or query means
//! "defined and non-null", the same rule for every method branch.

use std::error::Error;
use std::fmt;

use serde_json::Value;

use super::DataOperation;
use crate::task::COUNT_ENDPOINT;

/// The task's method/endpoint/shape did not identify any data operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InferError;

impl fmt::Display for InferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cannot determine data operation")
    }
}

impl Error for InferError {}

/// Deduce the operation for a data task.
///
/// `body` is the normalized request body; an array body turns a `POST`
/// into a bulk insert. An unknown method is an error, never a silent
/// default.
pub fn infer_operation(
    method: &str,
    endpoint: Option<&str>,
    entity_id_present: bool,
    query_present: bool,
    body: &Value,
) -> Result<DataOperation, InferError> {
    match method.to_ascii_uppercase().as_str() {
        "POST" => Ok(if body.is_array() {
            DataOperation::InsertMany
        } else {
            DataOperation::Insert
        }),
        "PUT" => Ok(DataOperation::Update),
        "DELETE" => Ok(if entity_id_present {
            DataOperation::DeleteById
        } else if query_present {
            DataOperation::DeleteByQuery
        } else {
            DataOperation::DeleteAll
        }),
        "GET" if endpoint == Some(COUNT_ENDPOINT) => Ok(if query_present {
            DataOperation::GetCountByQuery
        } else {
            DataOperation::GetCount
        }),
        "GET" => Ok(if entity_id_present {
            DataOperation::GetById
        } else if query_present {
            DataOperation::GetByQuery
        } else {
            DataOperation::GetAll
        }),
        _ => Err(InferError),
    }
}
