//! JSON-RPC 1.1 wire types used by the ProbModelSEED service
//!
//! Requests are plain objects `{ method, params, version, id }`. Responses
//! are decoded loosely as [`serde_json::Value`] by the client because their
//! classification depends on the envelope's shape (`result` list versus
//! `error` value), not on a fixed schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol version tag carried by every request envelope.
pub const JSON_RPC_VERSION: &str = "1.1";

/// A JSON-RPC 1.1 request envelope.
///
/// The `id` is a string of random decimal digits. It only tells concurrent
/// in-flight calls apart in logs and is never matched against the response.
///
/// # Examples
///
/// ```
/// use probmodelseed::rpc::types::RpcRequest;
///
/// let req = RpcRequest::new("ProbModelSEED.list_models", vec![]);
/// assert_eq!(req.version, "1.1");
/// assert!(req.id.chars().all(|c| c.is_ascii_digit()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Fully qualified method name, e.g. `ProbModelSEED.get_model`.
    pub method: String,
    /// Positional parameters; opaque to this client.
    pub params: Vec<Value>,
    /// Always [`JSON_RPC_VERSION`].
    pub version: String,
    /// Random decimal correlation id.
    pub id: String,
}

impl RpcRequest {
    /// Build a request envelope with a fresh random id.
    pub fn new(method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            params,
            version: JSON_RPC_VERSION.to_string(),
            id: generate_request_id(),
        }
    }
}

/// Generate a request id made only of decimal digits.
pub fn generate_request_id() -> String {
    rand::random::<u64>().to_string()
}
