//! Generic method invocation

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::Config;
use crate::error::{ProbModelSeedError, Result};
use crate::rpc::{Callbacks, Method, ProbModelSeedClient};

/// Invoke `method` and print its result as pretty JSON.
///
/// # Arguments
///
/// * `config` - Loaded configuration (endpoint and credentials)
/// * `method` - Bare or `ProbModelSEED.`-prefixed method name
/// * `input` - Inline JSON payload
/// * `input_file` - Path to a JSON payload; mutually exclusive with `input`
///
/// # Errors
///
/// Fails on an unknown method, unparseable input, an arity mismatch, or a
/// rejected call.
pub async fn run_call(
    config: &Config,
    method: &str,
    input: Option<String>,
    input_file: Option<PathBuf>,
) -> Result<()> {
    let method: Method = method.parse()?;
    let input = read_input(input.as_deref(), input_file.as_deref())?;

    tracing::info!("Calling {}", method.wire_name());
    let client = ProbModelSeedClient::from_config(config)?;
    let pending = client.call(method, input, Callbacks::none())?;
    let value = super::await_call(pending).await?;

    super::print_json(&value)
}

fn read_input(inline: Option<&str>, file: Option<&Path>) -> Result<Option<Value>> {
    let text = match (inline, file) {
        (Some(text), _) => text.to_string(),
        (None, Some(path)) => std::fs::read_to_string(path).map_err(|e| {
            ProbModelSeedError::InvalidInput(format!(
                "Failed to read input file {}: {}",
                path.display(),
                e
            ))
        })?,
        (None, None) => return Ok(None),
    };

    let value = serde_json::from_str(&text)
        .map_err(|e| ProbModelSeedError::InvalidInput(format!("Input is not valid JSON: {}", e)))?;
    Ok(Some(value))
}
