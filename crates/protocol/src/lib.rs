//! GraphQL wire envelope shared by the console gateway and its operations.
//!
//! Every remote call is one POST against a single endpoint carrying:
//! - `GraphQlRequest`: `{ "query": <document>, "variables": { .. } }`
//! - `GraphQlResponse`: `{ "data": { <operation>: .. }, "errors": [..] }`
//!
//! Documents are rendered from an [`OperationDescriptor`]; typed callers go
//! through the [`Operation`] trait instead of building descriptors by hand.

pub mod descriptor;
pub mod operation;
pub mod selection;

use serde::{Deserialize, Serialize};

pub use {
    descriptor::{OperationDescriptor, OperationKind, Upload, Variable, Variables},
    operation::Operation,
    selection::{Field, Selection},
};

// ── Constants ────────────────────────────────────────────────────────────────

/// Header carrying the bearer credential.
pub const AUTHORIZATION_HEADER: &str = "Authorization";
/// Scheme prefix used in the `Authorization` header.
pub const BEARER_SCHEME: &str = "Bearer";

/// Multipart field names from the GraphQL multipart request convention.
pub mod multipart {
    pub const OPERATIONS: &str = "operations";
    pub const MAP: &str = "map";
}

/// Format the `Authorization` header value for a token.
pub fn bearer_header_value(token: &str) -> String {
    format!("{BEARER_SCHEME} {token}")
}

// ── Envelope ─────────────────────────────────────────────────────────────────

/// Request body sent to the GraphQL endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlRequest {
    pub query: String,
    #[serde(default)]
    pub variables: serde_json::Map<String, serde_json::Value>,
    /// Files attached to `Upload` variables, keyed by variable name.
    #[serde(skip)]
    pub uploads: Vec<(String, Upload)>,
}

impl GraphQlRequest {
    pub fn has_uploads(&self) -> bool {
        !self.uploads.is_empty()
    }

    /// The `map` part of a multipart request: part index → variable path.
    pub fn upload_map(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .uploads
            .iter()
            .enumerate()
            .map(|(i, (name, _))| {
                (
                    i.to_string(),
                    serde_json::json!([format!("variables.{name}")]),
                )
            })
            .collect();
        serde_json::Value::Object(map)
    }
}

/// One entry of the GraphQL `errors` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

/// Response body returned by the GraphQL endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQlError>,
}

impl GraphQlResponse {
    /// The payload for the named root field, if the server returned one.
    ///
    /// A `null` root field counts as absent.
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.data
            .as_ref()
            .and_then(|data| data.get(name))
            .filter(|value| !value.is_null())
    }

    /// Take ownership of the payload for the named root field.
    pub fn take_field(&mut self, name: &str) -> Option<serde_json::Value> {
        self.data
            .as_mut()
            .and_then(|data| data.as_object_mut())
            .and_then(|data| data.remove(name))
            .filter(|value| !value.is_null())
    }

    /// Join all error messages into one line, for logging.
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}
