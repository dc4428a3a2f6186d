//! Form submission commands: detection and runtime configuration

use super::{print_json, read_json_object};
use anyhow::Result;
use clap::Args;
use decision_schema::{EngineConfig, SchemaRegistry};
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Args)]
pub struct FormArgs {
    /// Form submission file (JSON object)
    pub file: PathBuf,
}

pub fn run_types(config: &EngineConfig) -> Result<()> {
    let registry = SchemaRegistry::from_config(config);
    for schema_type in registry.get_all_schema_types() {
        let marker = if &schema_type == registry.default_type() { " (default)" } else { "" };
        println!("{}{}", schema_type, marker);
    }
    Ok(())
}

pub fn run_detect(args: FormArgs, config: &EngineConfig) -> Result<()> {
    let form = read_json_object(&args.file)?;
    let registry = SchemaRegistry::from_config(config);
    let detected = registry.detect_schema_type(&Value::Object(form));
    println!("{}", detected);
    Ok(())
}

pub fn run_process(args: FormArgs, config: &EngineConfig) -> Result<()> {
    let form = read_json_object(&args.file)?;
    let registry = SchemaRegistry::from_config(config);
    let processed = registry.process_schema(&form);
    info!(
        "Processed form with schema '{}' ({} additional settings)",
        processed.schema_type,
        processed.voting_config.additional_config.len()
    );
    print_json(&processed)
}
