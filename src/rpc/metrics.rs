//! Call metrics for ProbModelSEED requests
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! embedding application installs a recorder.
//!
//! # Metrics
//!
//! - `probmodelseed_rpc_calls_total`: Counter of issued calls by method
//! - `probmodelseed_rpc_failures_total`: Counter of rejected calls by method
//!   and status
//! - `probmodelseed_rpc_duration_seconds`: Histogram of call latency by
//!   method and outcome

use std::time::Instant;

use metrics::{histogram, increment_counter};

use crate::error::RpcError;
use crate::rpc::methods::Method;

/// Metrics for a single call, started when the request is dispatched.
#[derive(Debug)]
pub struct CallMetrics {
    method: Method,
    start: Instant,
}

impl CallMetrics {
    /// Record the start of a call.
    pub fn start(method: Method) -> Self {
        increment_counter!("probmodelseed_rpc_calls_total", "method" => method.name());
        Self {
            method,
            start: Instant::now(),
        }
    }

    /// Record how the call settled.
    pub fn finish<T>(self, outcome: &std::result::Result<T, RpcError>) {
        let outcome_label = match outcome {
            Ok(_) => "ok",
            Err(e) => {
                increment_counter!(
                    "probmodelseed_rpc_failures_total",
                    "method" => self.method.name(),
                    "status" => e.status().to_string()
                );
                "error"
            }
        };

        histogram!(
            "probmodelseed_rpc_duration_seconds",
            self.start.elapsed().as_secs_f64(),
            "method" => self.method.name(),
            "outcome" => outcome_label
        );
    }
}
