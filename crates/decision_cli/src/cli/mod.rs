//! CLI commands for the decision schema engine.

pub mod compile;
pub mod config;
pub mod error;
pub mod legacy;
pub mod process;

use anyhow::{Context, Result};
use error::HelpfulError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;

/// Read and parse a JSON document.
pub fn read_json(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Err(HelpfulError::file_not_found(path).into());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).map_err(|e| HelpfulError::invalid_json(path, &e).into())
}

/// Read a JSON document that must be an object (form submissions).
pub fn read_json_object(path: &Path) -> Result<Map<String, Value>> {
    match read_json(path)? {
        Value::Object(map) => Ok(map),
        _ => Err(HelpfulError::new(format!("Expected a JSON object in {}", path.display()))
            .with_suggestion("TRY: Wrap the form fields in { ... }")
            .into()),
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", rendered);
    Ok(())
}
