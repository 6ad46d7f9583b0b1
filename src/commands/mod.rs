//! Command handlers for the CLI
//!
//! - `call`    -- Invoke any catalog method with a JSON payload
//! - `models`  -- `list-models` with table or JSON output
//! - `auth`    -- Keyring token login, logout and status
//! - `methods` -- Print the method catalog

use serde_json::Value;

use crate::error::{ProbModelSeedError, Result};
use crate::rpc::PendingCall;

pub mod auth;
pub mod call;
pub mod models;

/// Await a call, aborting it on Ctrl-C.
///
/// An interrupted call settles like any aborted exchange, so the caller
/// still sees a single rejection.
pub(crate) async fn await_call(mut pending: PendingCall) -> Result<Value> {
    let abort = pending.abort_handle();
    let id = pending.id().to_string();
    let method = pending.method();
    let mut interrupted = false;

    let outcome = loop {
        tokio::select! {
            outcome = &mut pending => break outcome,
            _ = tokio::signal::ctrl_c(), if !interrupted => {
                tracing::warn!(id = %id, "Interrupted, aborting {}", method);
                interrupted = true;
                abort.abort();
            }
        }
    };

    outcome.map_err(|e| ProbModelSeedError::Rpc(e).into())
}

/// Print a value as pretty JSON on stdout.
pub(crate) fn print_json(value: &Value) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).map_err(ProbModelSeedError::Serialization)?;
    println!("{}", rendered);
    Ok(())
}

pub mod methods {
    //! Method catalog listing.

    use prettytable::{row, Table};

    use crate::rpc::Method;

    /// Print every remote method with its wire name and arity.
    pub fn list_methods() {
        let mut table = Table::new();
        table.add_row(row!["Method", "Wire Name", "Input"]);

        for method in Method::ALL {
            let input = if method.takes_input() { "required" } else { "none" };
            table.add_row(row![method.name(), method.wire_name(), input]);
        }

        table.printstd();
    }
}
