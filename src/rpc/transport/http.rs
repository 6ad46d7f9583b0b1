//! reqwest-backed HTTP transport
//!
//! Each call is a single POST with `Content-Type: application/json` and,
//! when the client resolved one, an `Authorization` header carrying the token
//! verbatim. There is no retry and no timeout unless one is configured.

use std::sync::Arc;
use std::time::Duration;

use crate::error::{ProbModelSeedError, Result};
use crate::rpc::transport::{HttpReply, OutboundRequest, Transport};

/// HTTP transport over a shared `reqwest::Client` connection pool.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use probmodelseed::rpc::transport::http::HttpTransport;
///
/// let transport = HttpTransport::new(Some(Duration::from_secs(60))).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: Arc<reqwest::Client>,
}

impl HttpTransport {
    /// Construct a transport.
    ///
    /// # Arguments
    ///
    /// * `timeout` - Optional per-request timeout. `None` leaves the HTTP
    ///   stack's default behaviour in place.
    ///
    /// # Errors
    ///
    /// Returns [`ProbModelSeedError::Http`] if the TLS backend cannot be
    /// initialised.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().map_err(ProbModelSeedError::Http)?;

        Ok(Self {
            http_client: Arc::new(http_client),
        })
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn post(&self, request: OutboundRequest) -> Result<HttpReply> {
        let mut req = self
            .http_client
            .post(request.url.as_str())
            .header("Content-Type", "application/json")
            .body(request.body);

        if let Some(token) = request.authorization {
            req = req.header("Authorization", token);
        }

        let response = req.send().await.map_err(ProbModelSeedError::Http)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(ProbModelSeedError::Http)?;

        tracing::trace!(status, bytes = body.len(), "ProbModelSEED reply received");
        Ok(HttpReply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_without_timeout() {
        assert!(HttpTransport::new(None).is_ok());
    }

    #[test]
    fn test_new_with_timeout() {
        assert!(HttpTransport::new(Some(Duration::from_secs(5))).is_ok());
    }

    #[tokio::test]
    async fn test_connection_refused_is_an_error() {
        let transport = HttpTransport::new(Some(Duration::from_secs(2))).unwrap();
        // Port 9 (discard) is essentially never listening on test hosts.
        let result = transport
            .post(OutboundRequest {
                url: "http://127.0.0.1:9/svc".to_string(),
                body: "{}".to_string(),
                authorization: None,
            })
            .await;
        assert!(result.is_err());
    }
}
