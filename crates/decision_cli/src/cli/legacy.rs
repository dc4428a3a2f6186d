//! Stored process schema and ballot commands

use super::{print_json, read_json};
use anyhow::{bail, Result};
use clap::Args;
use decision_schema::legacy::{
    create_schema_signature, extract_voting_config, validate_schema_structure,
    validate_vote_selection,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Stored process schema (JSON)
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct VotesArgs {
    /// Maximum number of selections
    #[arg(long)]
    pub max: u64,

    /// Proposal ids open for voting (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub available: Vec<String>,

    /// Proposal ids on the ballot (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub selected: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateOutput {
    #[serde(flatten)]
    validation: decision_schema::SchemaValidationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    voting_config: Option<decision_schema::LegacyVotingConfig>,
    signature: String,
}

pub fn run_validate(args: ValidateArgs) -> Result<()> {
    let schema = read_json(&args.file)?;
    let validation = validate_schema_structure(&schema);
    let voting_config = if validation.is_valid {
        extract_voting_config(&schema).ok()
    } else {
        None
    };
    let is_valid = validation.is_valid;

    print_json(&ValidateOutput {
        validation,
        voting_config,
        signature: create_schema_signature(&schema),
    })?;

    if !is_valid {
        bail!("Schema {} is invalid", args.file.display());
    }
    Ok(())
}

pub fn run_votes(args: VotesArgs) -> Result<()> {
    let result = validate_vote_selection(&args.selected, args.max, &args.available);
    print_json(&result)?;
    if !result.is_valid {
        bail!("Ballot rejected with {} error(s)", result.errors.len());
    }
    Ok(())
}
