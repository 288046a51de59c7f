#![deny(missing_docs)]

//! # Command Runner
//!
//! Wraps invocation of external tools (`git`, `redocly`).
//!
//! Abstracted behind [`CommandRunner`] so steps can be exercised without the
//! tools being installed.

use crate::error::{AppError, AppResult};
use std::process::{Command, Output};
use tracing::debug;

/// Interface for executing an external command.
pub trait CommandRunner {
    /// Executes the command to completion and returns its output.
    fn run(&self, program: &str, args: &[&str]) -> AppResult<Output>;
}

/// Standard runner using `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, program: &str, args: &[&str]) -> AppResult<Output> {
        debug!(program, ?args, "running command");
        let output = Command::new(program).args(args).output()?;
        Ok(output)
    }
}

/// Runs a command and turns a non-zero exit into [`AppError::ExternalTool`].
pub fn run_checked<R: CommandRunner + ?Sized>(
    runner: &R,
    program: &str,
    args: &[&str],
) -> AppResult<Output> {
    let output = runner.run(program, args)?;

    if !output.status.success() {
        return Err(AppError::ExternalTool {
            command: command_line(program, args),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        debug!(program, stdout = %stdout.trim(), "command output");
    }

    Ok(output)
}

fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(all(unix, any(test, feature = "test-utils")))]
pub use recording::RecordingRunner;

#[cfg(all(unix, any(test, feature = "test-utils")))]
mod recording {
    use super::{command_line, CommandRunner};
    use crate::error::AppResult;
    use std::cell::RefCell;
    use std::os::unix::process::ExitStatusExt;
    use std::process::{ExitStatus, Output};

    /// In-memory runner that records every invocation instead of spawning it.
    ///
    /// Commands succeed with empty output unless scripted with
    /// [`RecordingRunner::respond`] or [`RecordingRunner::fail_on`]. Scripts
    /// match on a prefix of the space-joined command line.
    #[derive(Debug, Default)]
    pub struct RecordingRunner {
        calls: RefCell<Vec<String>>,
        responses: Vec<(String, String)>,
        failures: Vec<String>,
    }

    impl RecordingRunner {
        /// Creates a runner where every command succeeds silently.
        pub fn new() -> Self {
            Self::default()
        }

        /// Replies with `stdout` to commands starting with `prefix`.
        pub fn respond(mut self, prefix: &str, stdout: &str) -> Self {
            self.responses.push((prefix.to_string(), stdout.to_string()));
            self
        }

        /// Exits with status 1 for commands starting with `prefix`.
        pub fn fail_on(mut self, prefix: &str) -> Self {
            self.failures.push(prefix.to_string());
            self
        }

        /// Command lines seen so far, in invocation order.
        pub fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl CommandRunner for RecordingRunner {
        fn run(&self, program: &str, args: &[&str]) -> AppResult<Output> {
            let line = command_line(program, args);
            self.calls.borrow_mut().push(line.clone());

            if self.failures.iter().any(|p| line.starts_with(p.as_str())) {
                return Ok(Output {
                    status: ExitStatus::from_raw(1 << 8),
                    stdout: Vec::new(),
                    stderr: format!("{program}: scripted failure").into_bytes(),
                });
            }

            let stdout = self
                .responses
                .iter()
                .find(|(p, _)| line.starts_with(p.as_str()))
                .map(|(_, out)| out.clone().into_bytes())
                .unwrap_or_default();

            Ok(Output {
                status: ExitStatus::from_raw(0),
                stdout,
                stderr: Vec::new(),
            })
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_run_checked_success() {
        let runner = RecordingRunner::new().respond("git status", " M a.yaml\n");
        let output = run_checked(&runner, "git", &["status", "--porcelain"]).unwrap();
        assert_eq!(String::from_utf8_lossy(&output.stdout), " M a.yaml\n");
        assert_eq!(runner.calls(), vec!["git status --porcelain".to_string()]);
    }

    #[test]
    fn test_run_checked_failure_maps_to_external_tool() {
        let runner = RecordingRunner::new().fail_on("redocly");
        let err = run_checked(&runner, "redocly", &["build-docs", "a.yaml"]).unwrap_err();

        match err {
            AppError::ExternalTool {
                command, stderr, ..
            } => {
                assert_eq!(command, "redocly build-docs a.yaml");
                assert!(stderr.contains("scripted failure"));
            }
            other => panic!("Wrong error type: {other}"),
        }
    }

    #[test]
    fn test_shell_runner_executes() {
        // `true` exists on every unix; a missing binary would surface as Io.
        match ShellRunner.run("true", &[]) {
            Ok(output) => assert!(output.status.success()),
            Err(e) => assert!(matches!(e, AppError::Io(_))),
        }
    }

    #[test]
    fn test_shell_runner_missing_program_is_io_error() {
        let err = ShellRunner
            .run("docflow-definitely-not-installed", &[])
            .unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
