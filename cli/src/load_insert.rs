#![deny(missing_docs)]

//! # Load Insert Step
//!
//! Finds the `api-insert*.yaml` file and publishes its contents as step
//! outputs for the update step.

use std::path::PathBuf;

use docflow_core::insert::{find_insert_file, load_insert};
use docflow_core::outputs::names;
use docflow_core::{AppResult, StepOutputs};

/// Arguments for the load-insert step.
#[derive(clap::Args, Debug, Clone)]
pub struct LoadInsertArgs {
    /// Directory searched for the insert file.
    #[clap(long, env = "INPUT_SEARCH-DIR", default_value = ".")]
    pub dir: PathBuf,
}

/// Executes the load-insert step.
///
/// Outputs are only written once the insert has been parsed, so a failure
/// leaves no partial outputs behind.
pub fn execute(args: &LoadInsertArgs, outputs: &mut impl StepOutputs) -> AppResult<()> {
    let file = find_insert_file(&args.dir)?;
    let insert = load_insert(&file)?;
    let transport = insert.to_transport()?;

    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    outputs.set_output(names::API_INSERT_PATH, &transport.path)?;
    outputs.set_output(names::API_INSERT_ROUTE, &transport.route)?;
    outputs.set_output(names::API_INSERT_COMPONENTS, &transport.components)?;
    outputs.set_output(names::API_INSERT_FILE, &file_name)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docflow_core::{AppError, MemoryOutputs};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_execute_sets_outputs() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("api-insert-widgets.yaml"),
            "path: /widgets\nroute:\n  get: {summary: list}\ncomponents:\n  schemas:\n    Widget: {type: object}\n",
        )
        .unwrap();

        let mut outputs = MemoryOutputs::new();
        let args = LoadInsertArgs {
            dir: dir.path().to_path_buf(),
        };
        execute(&args, &mut outputs).unwrap();

        assert_eq!(outputs.get(names::API_INSERT_PATH), Some("/widgets"));
        assert_eq!(
            outputs.get(names::API_INSERT_ROUTE),
            Some(r#"{"get":{"summary":"list"}}"#)
        );
        assert_eq!(
            outputs.get(names::API_INSERT_COMPONENTS),
            Some(r#"{"schemas":{"Widget":{"type":"object"}}}"#)
        );
        assert_eq!(
            outputs.get(names::API_INSERT_FILE),
            Some("api-insert-widgets.yaml")
        );
    }

    #[test]
    fn test_execute_without_insert_produces_no_outputs() {
        let dir = tempdir().unwrap();
        let mut outputs = MemoryOutputs::new();
        let args = LoadInsertArgs {
            dir: dir.path().to_path_buf(),
        };

        let err = execute(&args, &mut outputs).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(outputs.is_empty());
    }
}
