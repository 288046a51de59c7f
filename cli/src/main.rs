#![deny(missing_docs)]

//! # Docflow CLI
//!
//! CI steps for the OpenAPI documentation pipeline.
//!
//! Supported Commands:
//! - `load-insert`: Finds and parses the `api-insert*.yaml` fragment.
//! - `update`: Merges the insert into the target OpenAPI document.
//! - `validate`: Validates every document in the docs directory.
//! - `render`: Builds HTML docs with `redocly`.
//! - `publish`: Commits and pushes the changes.
//! - `pipeline`: Runs all of the above in order.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use docflow_core::outputs::error_command;
use docflow_core::{AppResult, GithubOutputs, OpenApiValidator, ShellRunner, StepOutputs};
use tracing::{error, warn};

use crate::logging::LogFormat;

mod load_insert;
mod logging;
mod pipeline;
mod publish;
mod render;
mod update;
mod validate;

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI documentation pipeline steps")]
struct Cli {
    /// Log line format.
    #[clap(long, global = true, value_enum, env = "DOCFLOW_LOG_FORMAT", default_value_t)]
    log_format: LogFormat,

    /// File receiving step outputs; printed to stdout when unset.
    #[clap(long, global = true, env = "GITHUB_OUTPUT")]
    github_output: Option<PathBuf>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find the api-insert file and expose its path, route and components.
    LoadInsert(load_insert::LoadInsertArgs),
    /// Merge an insert into the target OpenAPI document.
    Update(update::UpdateArgs),
    /// Validate every OpenAPI document in a directory.
    Validate(validate::ValidateArgs),
    /// Render HTML docs for every OpenAPI document in a directory.
    Render(render::RenderArgs),
    /// Commit all changes and push them to a branch.
    Publish(publish::PublishArgs),
    /// Run every step in order.
    Pipeline(pipeline::PipelineArgs),
}

fn run(command: &Commands, outputs: &mut impl StepOutputs) -> AppResult<()> {
    let runner = ShellRunner;
    let validator = OpenApiValidator;

    match command {
        Commands::LoadInsert(args) => load_insert::execute(args, outputs),
        Commands::Update(args) => update::execute(args, outputs),
        Commands::Validate(args) => validate::execute(args, &validator),
        Commands::Render(args) => render::execute(args, &runner, outputs),
        Commands::Publish(args) => publish::execute(args, &runner).map(|_| ()),
        Commands::Pipeline(args) => pipeline::execute(args, &runner, &validator, outputs),
    }
}

fn main() -> ExitCode {
    // Must run before parsing so `.env` entries can feed clap's env fallbacks.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    logging::init(cli.log_format);

    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!("Failed to load .env: {e}");
        }
    }

    let mut outputs = GithubOutputs::new(cli.github_output.clone());
    let status = report(run(&cli.command, &mut outputs), &mut std::io::stdout());
    ExitCode::from(status)
}

/// Turns a step result into a process exit status.
///
/// Failures are logged and written to `out` as an `::error::` workflow
/// command; the status is then 1.
fn report(result: AppResult<()>, out: &mut impl Write) -> u8 {
    let Err(e) = result else {
        return 0;
    };

    error!("{e}");
    if let Err(io) = writeln!(out, "{}", error_command(&e)) {
        eprintln!("docflow: failed to report error: {io}");
    }
    1
}
