//! # Render Step
//!
//! Produces one HTML page per document via `redocly`.

use std::path::PathBuf;

use docflow_core::outputs::names;
use docflow_core::render::DEFAULT_OUTPUT_DIR;
use docflow_core::{render_docs, AppResult, CommandRunner, StepOutputs};

/// Arguments for the render step.
#[derive(clap::Args, Debug, Clone)]
pub struct RenderArgs {
    /// Directory holding the OpenAPI documents.
    #[clap(long, env = "INPUT_DOCS-DIR")]
    pub docs_dir: PathBuf,

    /// Directory receiving the rendered pages.
    #[clap(long, env = "INPUT_OUTPUT-DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,
}

/// Executes the render step.
pub fn execute(
    args: &RenderArgs,
    runner: &impl CommandRunner,
    outputs: &mut impl StepOutputs,
) -> AppResult<()> {
    render_docs(&args.docs_dir, &args.output_dir, runner)?;
    outputs.set_output(names::OUTPUT_DIR, &args.output_dir.to_string_lossy())?;
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use docflow_core::{MemoryOutputs, RecordingRunner};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_execute_sets_output_dir() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("pets.yaml"), "openapi: 3.0.0\n").unwrap();
        let out = dir.path().join("site");

        let args = RenderArgs {
            docs_dir: dir.path().to_path_buf(),
            output_dir: out.clone(),
        };
        let runner = RecordingRunner::new();
        let mut outputs = MemoryOutputs::new();
        execute(&args, &runner, &mut outputs).unwrap();

        assert_eq!(runner.calls().len(), 1);
        assert!(runner.calls()[0].ends_with("pets.html"));
        assert_eq!(
            outputs.get(names::OUTPUT_DIR),
            Some(&*out.to_string_lossy())
        );
    }

    #[test]
    fn test_execute_failure_sets_no_output() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("pets.yaml"), "openapi: 3.0.0\n").unwrap();

        let args = RenderArgs {
            docs_dir: dir.path().to_path_buf(),
            output_dir: dir.path().join("site"),
        };
        let runner = RecordingRunner::new().fail_on("redocly");
        let mut outputs = MemoryOutputs::new();

        assert!(execute(&args, &runner, &mut outputs).is_err());
        assert!(outputs.is_empty());
    }
}
