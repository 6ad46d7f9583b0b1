//! Transport abstraction for ProbModelSEED calls
//!
//! The [`Transport`] trait is one operation: POST a serialized envelope and
//! hand back whatever the server replied, success status or not. Deciding
//! what the reply means (resolve, malformed response, service error) belongs
//! to the client, so every implementation reports replies the same way.
//!
//! - [`http::HttpTransport`] -- reqwest-backed implementation.
//! - [`fake::FakeTransport`] -- in-process fake used in tests (cfg(test)
//!   only).

use crate::error::Result;

/// An outbound HTTP POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    /// Endpoint the envelope is posted to.
    pub url: String,
    /// Serialized JSON-RPC envelope.
    pub body: String,
    /// Value of the `Authorization` header; omitted when `None`.
    pub authorization: Option<String>,
}

/// Whatever the server answered, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body, possibly empty.
    pub body: String,
}

impl HttpReply {
    /// Build a reply from a status and body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstraction over the HTTP stack used by the client.
///
/// `post` returns `Err` only when no reply was obtained at all (connection
/// refused, DNS failure, timeout, body read failure). Non-2xx replies are
/// `Ok`.
#[async_trait::async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Send one request and wait for the reply.
    async fn post(&self, request: OutboundRequest) -> Result<HttpReply>;
}

pub mod http;

#[cfg(test)]
pub mod fake;
