//! ProbModelSEED - async JSON-RPC client library
//!
//! This library exposes the remote ProbModelSEED metabolic-modeling service
//! (model reconstruction, flux balance analysis, gapfilling, model and media
//! management) as a typed async client.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `rpc`: Client, method catalog, authorization, transport and metrics
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//! - `commands`: Handlers behind the `probmodelseed` binary
//!
//! # Example
//!
//! ```no_run
//! use probmodelseed::rpc::{Callbacks, ProbModelSeedClient};
//! use probmodelseed::Config;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let client = ProbModelSeedClient::from_config(&config)?;
//!     let model = client
//!         .get_model(json!({"model": "/alice/home/models/m1"}), Callbacks::none())
//!         .await?;
//!     println!("{model}");
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod rpc;

// Re-export commonly used types
pub use config::Config;
pub use error::{ProbModelSeedError, Result, RpcError};
pub use rpc::{Authorization, Callbacks, Method, PendingCall, ProbModelSeedClient};
