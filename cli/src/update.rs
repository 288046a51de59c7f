#![deny(missing_docs)]

//! # Update Step
//!
//! Merges the insert handed over by the load step into the target document.

use std::path::PathBuf;

use docflow_core::insert::InsertParams;
use docflow_core::outputs::names;
use docflow_core::{update_document, AppResult, StepOutputs};

/// Docs directory used when none is configured.
pub const DEFAULT_DOCS_DIR: &str = "FountainAI-Docs/docs";

/// Arguments for the update step.
///
/// The insert values use the plain variable names the workflow exports.
#[derive(clap::Args, Debug, Clone)]
pub struct UpdateArgs {
    /// Route key to insert (`api-insert-path` of the load step).
    #[clap(long, env = "path")]
    pub path: String,

    /// Route definition as JSON (`api-insert-route`).
    #[clap(long, env = "route")]
    pub route: String,

    /// Components fragment as JSON (`api-insert-components`).
    #[clap(long, env = "components", default_value = "{}")]
    pub components: String,

    /// Document file name inside the docs directory.
    #[clap(long, env = "target-file")]
    pub target_file: PathBuf,

    /// Directory holding the OpenAPI documents.
    #[clap(long, env = "INPUT_DOCS-DIR", default_value = DEFAULT_DOCS_DIR)]
    pub docs_dir: PathBuf,
}

/// Executes the update step.
pub fn execute(args: &UpdateArgs, outputs: &mut impl StepOutputs) -> AppResult<()> {
    let params = InsertParams::from_transport(&args.path, &args.route, &args.components)?;
    let target = args.docs_dir.join(&args.target_file);

    update_document(&target, &params)?;

    outputs.set_output(names::DOCS_DIR, &args.docs_dir.to_string_lossy())?;
    Ok(())
}
