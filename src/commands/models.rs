//! Model listing command
//!
//! `list_models` returns an opaque JSON value. The table view flattens the
//! common shapes: a list of names, a list of objects, or a map from model
//! reference to an object of statistics.

use prettytable::{Cell, Row, Table};
use serde_json::Value;

use crate::config::Config;
use crate::error::Result;
use crate::rpc::{Callbacks, ProbModelSeedClient};

/// List the caller's models.
///
/// # Arguments
///
/// * `config` - Configuration containing endpoint and credentials
/// * `json` - Print the raw result as pretty JSON instead of a table
///
/// # Examples
///
/// ```no_run
/// use probmodelseed::config::Config;
/// use probmodelseed::commands::models::list_models;
///
/// # async fn example() -> anyhow::Result<()> {
/// list_models(&Config::default(), true).await?;
/// # Ok(())
/// # }
/// ```
pub async fn list_models(config: &Config, json: bool) -> Result<()> {
    tracing::info!("Listing models from {}", config.service.url);

    let client = ProbModelSeedClient::from_config(config)?;
    let models = super::await_call(client.list_models(Callbacks::none())).await?;

    if json {
        return super::print_json(&models);
    }

    let (headers, rows) = model_rows(&models);
    if rows.is_empty() {
        println!("No models found.");
        return Ok(());
    }

    output_models_table(&headers, &rows);
    Ok(())
}

fn output_models_table(headers: &[String], rows: &[Vec<String>]) {
    let mut table = Table::new();
    table.add_row(Row::new(headers.iter().map(|h| Cell::new(h)).collect()));
    for cells in rows {
        table.add_row(Row::new(cells.iter().map(|c| Cell::new(c)).collect()));
    }

    println!();
    table.printstd();
    println!("\n{} model(s)", rows.len());
}

/// A table column: the map key, the bare scalar record, or a record field.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Column {
    Ref,
    Model,
    Field(String),
}

/// Flatten a `list_models` result into table headers and rows.
///
/// A record field that shares a name with a present synthetic column is
/// shown under `"<name> (field)"` so neither value is lost.
fn model_rows(models: &Value) -> (Vec<String>, Vec<Vec<String>>) {
    let records: Vec<(Option<String>, &Value)> = match models {
        Value::Array(items) => items.iter().map(|item| (None, item)).collect(),
        Value::Object(map) => map.iter().map(|(k, v)| (Some(k.clone()), v)).collect(),
        Value::Null => Vec::new(),
        other => vec![(None, other)],
    };

    let mut columns: Vec<Column> = Vec::new();
    if records.iter().any(|(key, _)| key.is_some()) {
        columns.push(Column::Ref);
    }
    if records.iter().any(|(_, v)| !v.is_object()) {
        columns.push(Column::Model);
    }
    for (_, record) in &records {
        if let Value::Object(fields) = record {
            for field in fields.keys() {
                let column = Column::Field(field.clone());
                if !columns.contains(&column) {
                    columns.push(column);
                }
            }
        }
    }

    let headers = columns
        .iter()
        .map(|column| match column {
            Column::Ref => "ref".to_string(),
            Column::Model => "model".to_string(),
            Column::Field(name) => {
                let synthetic = match name.as_str() {
                    "ref" => Some(Column::Ref),
                    "model" => Some(Column::Model),
                    _ => None,
                };
                match synthetic {
                    Some(s) if columns.contains(&s) => format!("{} (field)", name),
                    _ => name.clone(),
                }
            }
        })
        .collect();

    let rows = records
        .iter()
        .map(|(key, record)| {
            columns
                .iter()
                .map(|column| match (column, record) {
                    (Column::Ref, _) => key.clone().unwrap_or_default(),
                    (Column::Model, v) if !v.is_object() => render_cell(v),
                    (Column::Field(name), Value::Object(fields)) => {
                        fields.get(name).map(render_cell).unwrap_or_default()
                    }
                    _ => String::new(),
                })
                .collect()
        })
        .collect();

    (headers, rows)
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
