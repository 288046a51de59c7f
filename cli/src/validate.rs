//! # Validate Step
//!
//! Runs the conformance check over every document in the docs directory.

use std::path::PathBuf;

use docflow_core::{validate_dir, AppResult, DocumentValidator};

/// Arguments for the validate step.
#[derive(clap::Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Directory holding the OpenAPI documents.
    #[clap(long, env = "INPUT_DOCS-DIR")]
    pub docs_dir: PathBuf,
}

/// Executes the validate step. Fails on the first invalid document.
pub fn execute(args: &ValidateArgs, validator: &impl DocumentValidator) -> AppResult<()> {
    let validated = validate_dir(&args.docs_dir, validator)?;
    tracing::info!(count = validated.len(), "all documents valid");
    Ok(())
}
