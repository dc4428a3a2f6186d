//! Decision Schema command-line tool
//!
//! Reads templates, form submissions and stored process schemas from JSON
//! files and runs them through the engine. All file access lives here; the
//! engine crate is pure.

use anyhow::Result;
use clap::{Parser, Subcommand};
use decision_logging::{default_logs_dir, init_logging, LogConfig};
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;

#[derive(Parser, Debug)]
#[command(name = "decision-schema", about = "Decision process schema tooling")]
struct Cli {
    /// Enable verbose logging (debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Engine configuration file (TOML)
    #[arg(long, global = true, env = "DECISION_SCHEMA_CONFIG")]
    config: Option<PathBuf>,

    /// Write a daily log file to this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Also write a log file under the default logs directory
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List registered schema types
    Types,

    /// Show the resolved engine configuration
    Config,

    /// Compile a proposal template into field descriptors
    CompileProposal(cli::compile::CompileArgs),

    /// Compile a rubric template into field descriptors
    CompileRubric(cli::compile::CompileArgs),

    /// Detect the schema type of a form submission
    Detect(cli::process::FormArgs),

    /// Derive voting and proposal configuration from a form submission
    Process(cli::process::FormArgs),

    /// Validate a stored (flat) process schema and print its signature
    Validate(cli::legacy::ValidateArgs),

    /// Validate a ballot against a vote cap and the available proposals
    Votes(cli::legacy::VotesArgs),
}

fn run_command(cli: Cli) -> Result<()> {
    let config = cli::config::load_engine_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Types => cli::process::run_types(&config),
        Commands::Config => cli::config::run(&config),
        Commands::CompileProposal(args) => cli::compile::run_proposal(args, &config),
        Commands::CompileRubric(args) => cli::compile::run_rubric(args),
        Commands::Detect(args) => cli::process::run_detect(args, &config),
        Commands::Process(args) => cli::process::run_process(args, &config),
        Commands::Validate(args) => cli::legacy::run_validate(args),
        Commands::Votes(args) => cli::legacy::run_votes(args),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_dir = cli
        .log_dir
        .clone()
        .or_else(|| cli.log_file.then(default_logs_dir).flatten());
    let _log_guard = match init_logging(LogConfig {
        app_name: "decision-schema",
        verbose: cli.verbose,
        log_dir,
    }) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Warning: failed to initialize logging: {:#}", err);
            None
        }
    };

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:?}", err);
            ExitCode::from(1)
        }
    }
}
