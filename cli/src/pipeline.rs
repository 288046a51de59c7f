//! # Pipeline Command
//!
//! Runs load-insert, update, validate, render and publish in one process,
//! feeding each step's outputs into the next step's inputs.

use std::path::PathBuf;

use docflow_core::outputs::names;
use docflow_core::render::DEFAULT_OUTPUT_DIR;
use docflow_core::{AppResult, CommandRunner, DocumentValidator, MemoryOutputs, StepOutputs};
use tracing::info;

use crate::load_insert::{self, LoadInsertArgs};
use crate::publish::{self, PublishArgs};
use crate::render::{self, RenderArgs};
use crate::update::{self, UpdateArgs, DEFAULT_DOCS_DIR};
use crate::validate::{self, ValidateArgs};

/// Arguments for the full pipeline.
#[derive(clap::Args, Debug, Clone)]
pub struct PipelineArgs {
    /// Directory searched for the insert file.
    #[clap(long, default_value = ".")]
    pub dir: PathBuf,

    /// Directory holding the OpenAPI documents.
    #[clap(long, env = "INPUT_DOCS-DIR", default_value = DEFAULT_DOCS_DIR)]
    pub docs_dir: PathBuf,

    /// Document file name the insert is merged into.
    #[clap(long, env = "target-file")]
    pub target_file: PathBuf,

    /// Directory receiving the rendered pages.
    #[clap(long, env = "INPUT_OUTPUT-DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Branch to push to. Publishing is skipped when absent.
    #[clap(long, env = "INPUT_BRANCH-NAME")]
    pub branch_name: Option<String>,
}

/// Executes every step in order and forwards the collected outputs.
pub fn execute(
    args: &PipelineArgs,
    runner: &impl CommandRunner,
    validator: &impl DocumentValidator,
    outputs: &mut impl StepOutputs,
) -> AppResult<()> {
    let mut handoff = MemoryOutputs::new();

    info!(step = "load-insert", "running step");
    load_insert::execute(
        &LoadInsertArgs {
            dir: args.dir.clone(),
        },
        &mut handoff,
    )?;

    info!(step = "update", "running step");
    let update_args = UpdateArgs {
        path: handoff.require(names::API_INSERT_PATH)?.to_string(),
        route: handoff.require(names::API_INSERT_ROUTE)?.to_string(),
        components: handoff.require(names::API_INSERT_COMPONENTS)?.to_string(),
        target_file: args.target_file.clone(),
        docs_dir: args.docs_dir.clone(),
    };
    update::execute(&update_args, &mut handoff)?;

    let docs_dir = PathBuf::from(handoff.require(names::DOCS_DIR)?);

    info!(step = "validate", "running step");
    validate::execute(
        &ValidateArgs {
            docs_dir: docs_dir.clone(),
        },
        validator,
    )?;

    info!(step = "render", "running step");
    render::execute(
        &RenderArgs {
            docs_dir,
            output_dir: args.output_dir.clone(),
        },
        runner,
        &mut handoff,
    )?;

    match &args.branch_name {
        Some(branch) => {
            info!(step = "publish", "running step");
            let publish_args = PublishArgs {
                branch_name: branch.clone(),
                api_insert_file: handoff.require(names::API_INSERT_FILE)?.to_string(),
            };
            publish::execute(&publish_args, runner)?;
        }
        None => info!("no branch configured, skipping publish"),
    }

    handoff.forward_to(outputs)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use docflow_core::{load_yaml, AppError, OpenApiValidator, RecordingRunner};
    use std::fs;
    use tempfile::tempdir;

    fn workspace() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("api-insert.yaml"),
            r#"
path: /widgets
route:
  get:
    responses:
      '200':
        description: OK
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/Widget'
components:
  schemas:
    Widget:
      type: object
"#,
        )
        .unwrap();
        let docs = dir.path().join("docs");
        fs::create_dir(&docs).unwrap();
        fs::write(
            docs.join("openapi.yaml"),
            "openapi: 3.0.3\ninfo: {title: Widgets, version: 1.0.0}\npaths: {}\n",
        )
        .unwrap();
        dir
    }

    fn args(dir: &std::path::Path, branch: Option<&str>) -> PipelineArgs {
        PipelineArgs {
            dir: dir.to_path_buf(),
            docs_dir: dir.join("docs"),
            target_file: PathBuf::from("openapi.yaml"),
            output_dir: dir.join("site"),
            branch_name: branch.map(str::to_string),
        }
    }

    #[test]
    fn test_pipeline_runs_every_step() {
        let dir = workspace();
        let runner = RecordingRunner::new().respond("git status", "M  docs/openapi.yaml\n");
        let mut outputs = MemoryOutputs::new();

        execute(
            &args(dir.path(), Some("docs")),
            &runner,
            &OpenApiValidator,
            &mut outputs,
        )
        .unwrap();

        let doc = load_yaml(&dir.path().join("docs/openapi.yaml")).unwrap();
        assert!(doc["paths"]["/widgets"].is_mapping());

        let calls = runner.calls();
        assert!(calls[0].starts_with("redocly build-docs"));
        assert_eq!(
            calls.last().map(String::as_str),
            Some("git push origin docs")
        );
        assert!(calls
            .iter()
            .any(|c| c == "git commit -m Update OpenAPI documentation with api-insert.yaml"));

        assert_eq!(outputs.get(names::API_INSERT_FILE), Some("api-insert.yaml"));
        assert!(outputs.get(names::OUTPUT_DIR).is_some());
    }

    #[test]
    fn test_pipeline_without_branch_skips_publish() {
        let dir = workspace();
        let runner = RecordingRunner::new();

        execute(
            &args(dir.path(), None),
            &runner,
            &OpenApiValidator,
            &mut MemoryOutputs::new(),
        )
        .unwrap();

        assert!(runner.calls().iter().all(|c| !c.starts_with("git")));
    }

    #[test]
    fn test_pipeline_stops_before_render_on_invalid_docs() {
        let dir = workspace();
        fs::write(dir.path().join("docs/broken.yaml"), "openapi: 3.0.0\n").unwrap();
        let runner = RecordingRunner::new();
        let mut outputs = MemoryOutputs::new();

        let err = execute(
            &args(dir.path(), Some("docs")),
            &runner,
            &OpenApiValidator,
            &mut outputs,
        )
        .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(runner.calls().is_empty());
        assert!(outputs.is_empty());
    }
}
