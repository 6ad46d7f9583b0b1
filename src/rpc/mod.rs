//! ProbModelSEED JSON-RPC client support
//!
//! This module exposes the remote ProbModelSEED service as a typed async
//! client. Every remote operation funnels through one transport helper that
//! builds a JSON-RPC 1.1 envelope, POSTs it, and settles a pending call
//! exactly once.
//!
//! # Module Layout
//!
//! - `types`       -- JSON-RPC 1.1 request envelope and request ids
//! - `methods`     -- Catalog of remote method names
//! - `auth`        -- Static tokens, token providers and header resolution
//! - `token_store` -- Keyring persistence for the service token
//! - `client`      -- [`ProbModelSeedClient`], pending calls and callbacks
//! - `transport`   -- `Transport` trait and the reqwest implementation
//! - `metrics`     -- Per-method call counters and latency histograms

pub mod auth;
pub mod client;
pub mod methods;
pub mod metrics;
pub mod token_store;
pub mod transport;
pub mod types;

pub use auth::{AuthInfo, Authorization, TokenProvider};
pub use client::{
    AbortHandle, CallOutcome, Callbacks, PendingCall, ProbModelSeedClient, DEFAULT_SERVICE_URL,
};
pub use methods::{Method, Returns};
pub use types::RpcRequest;
