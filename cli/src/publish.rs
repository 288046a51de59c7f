//! # Publish Step
//!
//! Commits and pushes the updated documents.

use docflow_core::{publish, AppResult, CommandRunner, PublishOutcome, PublishRequest};

/// Arguments for the publish step.
#[derive(clap::Args, Debug, Clone)]
pub struct PublishArgs {
    /// Branch to push to.
    #[clap(long, env = "INPUT_BRANCH-NAME")]
    pub branch_name: String,

    /// Insert file named in the commit message.
    #[clap(long, env = "INPUT_API-INSERT-FILE")]
    pub api_insert_file: String,
}

/// Executes the publish step.
pub fn execute(args: &PublishArgs, runner: &impl CommandRunner) -> AppResult<PublishOutcome> {
    let request = PublishRequest {
        branch: args.branch_name.clone(),
        insert_file: args.api_insert_file.clone(),
    };
    publish(&request, runner)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use docflow_core::RecordingRunner;

    #[test]
    fn test_execute_pushes_branch() {
        let args = PublishArgs {
            branch_name: "main".into(),
            api_insert_file: "api-insert.yaml".into(),
        };
        let runner = RecordingRunner::new().respond("git status", "M  docs/a.yaml\n");

        let outcome = execute(&args, &runner).unwrap();
        assert_eq!(outcome, PublishOutcome::Pushed);
        assert_eq!(
            runner.calls().last().map(String::as_str),
            Some("git push origin main")
        );
    }
}
