//! Engine configuration loading.
//!
//! ```toml
//! default_schema_type = "simple"
//!
//! [compiler]
//! required_system_fields = ["title"]
//!
//! [[definitions]]
//! schemaType = "ranked"
//! name = "Ranked Choice"
//! defaults = { maxVotesPerMember = 5 }
//! bindings = { maxVotesPerMember = { target = "instanceData.maxVotesPerMember" } }
//! ```

use super::error::HelpfulError;
use super::print_json;
use anyhow::{Context, Result};
use decision_schema::EngineConfig;
use std::path::Path;
use tracing::debug;

/// Load the engine configuration, or the defaults when no file is given.
pub fn load_engine_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    if !path.exists() {
        return Err(HelpfulError::file_not_found(path).into());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config = parse_engine_config(&contents).map_err(|e| HelpfulError::invalid_config(path, &e))?;
    debug!(
        "Loaded config from {} ({} extra definitions)",
        path.display(),
        config.definitions.len()
    );
    Ok(config)
}

pub fn parse_engine_config(contents: &str) -> Result<EngineConfig, toml::de::Error> {
    toml::from_str(contents)
}

/// Print the resolved configuration.
pub fn run(config: &EngineConfig) -> Result<()> {
    print_json(config)
}
