//! Request normalization — parse textual JSON bodies and queries in place.
//!
//! Hosts deliver `request.body` / `request.query` either as structured JSON
//! or as a JSON string. Handlers only ever see the structured form, so the
//! dispatchers normalize both slots before resolving a handler. A value
//! that is already structured (or absent) passes through untouched; a
//! string that fails to parse short-circuits the dispatch with a
//! BadRequest-class response.

use std::error::Error;
use std::fmt;

use serde_json::Value;

/// Which slot failed to parse. The `Display` text is the exact debug
/// message committed onto the terminal response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeError {
    Body,
    Query,
}

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizeError::Body => write!(f, "Request body is not JSON"),
            NormalizeError::Query => {
                write!(f, "Request query contains invalid JSON")
            }
        }
    }
}

impl Error for NormalizeError {}

/// Normalize one payload slot in place.
///
/// - structured value or `Null`: unchanged.
/// - empty / whitespace-only string: treated as absent (`Null`).
/// - other string: parsed as JSON; parse failure reports `slot`.
pub fn normalize_slot(value: &mut Value, slot: NormalizeError) -> Result<(), NormalizeError> {
    let raw = match value {
        Value::String(raw) => raw,
        _ => return Ok(()),
    };
    if raw.trim().is_empty() {
        *value = Value::Null;
        return Ok(());
    }
    match serde_json::from_str(raw) {
        Ok(parsed) => {
            *value = parsed;
            Ok(())
        }
        Err(_) => Err(slot),
    }
}

/// A query slot normalized to `Null` counts as "no query" for operation
/// inference and context building.
pub fn query_present(query: &Value) -> bool {
    !query.is_null()
}
