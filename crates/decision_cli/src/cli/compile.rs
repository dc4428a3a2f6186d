//! Template compilation commands

use super::{print_json, read_json};
use anyhow::Result;
use clap::Args;
use decision_schema::{compile_rubric_schema, EngineConfig, FieldCompiler};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Template file (JSON)
    pub file: PathBuf,

    /// Include compilation diagnostics in the output (proposal templates)
    #[arg(long)]
    pub report: bool,
}

pub fn run_proposal(args: CompileArgs, config: &EngineConfig) -> Result<()> {
    let template = read_json(&args.file)?;
    let compiler = FieldCompiler::from_config(&config.compiler);

    if args.report {
        let compilation = compiler.compile_proposal_schema_report(&template);
        info!(
            "Compiled {} proposal fields ({} diagnostics)",
            compilation.fields.len(),
            compilation.diagnostics.len()
        );
        return print_json(&compilation);
    }

    let fields = compiler.compile_proposal_schema(&template);
    info!("Compiled {} proposal fields", fields.len());
    print_json(&fields)
}

pub fn run_rubric(args: CompileArgs) -> Result<()> {
    let template = read_json(&args.file)?;
    let fields = compile_rubric_schema(&template);
    info!("Compiled {} rubric fields", fields.len());
    print_json(&fields)
}
