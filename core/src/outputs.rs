#![deny(missing_docs)]

//! # Step Outputs
//!
//! Named string outputs handed from one pipeline step to the next, and the
//! failure report understood by the CI runner.

use crate::error::{AppError, AppResult};
use indexmap::IndexMap;
use std::fs::OpenOptions;
use std::io::{self, Stdout, Write};
use std::path::PathBuf;

/// Output names shared by the steps.
pub mod names {
    /// Directory holding rendered pages.
    pub const OUTPUT_DIR: &str = "output-dir";
    /// Directory holding OpenAPI documents.
    pub const DOCS_DIR: &str = "docs-dir";
    /// Route key of the insert.
    pub const API_INSERT_PATH: &str = "api-insert-path";
    /// Route definition of the insert, as JSON.
    pub const API_INSERT_ROUTE: &str = "api-insert-route";
    /// Components fragment of the insert, as JSON.
    pub const API_INSERT_COMPONENTS: &str = "api-insert-components";
    /// File name of the insert.
    pub const API_INSERT_FILE: &str = "api-insert-file";
}

/// Sink for a step's named outputs.
pub trait StepOutputs {
    /// Records `value` under `name`.
    fn set_output(&mut self, name: &str, value: &str) -> AppResult<()>;
}

/// GitHub Actions output channel.
///
/// Appends to the `$GITHUB_OUTPUT` file when one is configured, otherwise
/// writes `name=value` lines to the fallback writer (stdout by default).
#[derive(Debug)]
pub struct GithubOutputs<W: Write = Stdout> {
    file: Option<PathBuf>,
    fallback: W,
}

impl GithubOutputs {
    /// Creates a sink writing to `file`, or to stdout when `None`.
    pub fn new(file: Option<PathBuf>) -> Self {
        Self::with_fallback(file, io::stdout())
    }
}

impl<W: Write> GithubOutputs<W> {
    /// Creates a sink writing to `file`, or to `fallback` when `None`.
    pub fn with_fallback(file: Option<PathBuf>, fallback: W) -> Self {
        Self { file, fallback }
    }

    /// The writer used when no output file is configured.
    pub fn fallback(&self) -> &W {
        &self.fallback
    }
}

impl<W: Write> StepOutputs for GithubOutputs<W> {
    fn set_output(&mut self, name: &str, value: &str) -> AppResult<()> {
        let Some(path) = &self.file else {
            writeln!(self.fallback, "{name}={value}")?;
            return Ok(());
        };

        let record = heredoc_record(name, value)?;
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(record.as_bytes())?;
        Ok(())
    }
}

/// Formats a multi-line safe `name<<DELIM` record.
fn heredoc_record(name: &str, value: &str) -> AppResult<String> {
    if name.contains('\n') || name.contains("<<") {
        return Err(AppError::General(format!("Invalid output name: {name:?}")));
    }

    let delimiter = (0..)
        .map(|n| format!("ghadelimiter_{n}"))
        .find(|d| !value.lines().any(|line| line == d))
        .unwrap_or_default();

    Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}

/// Ordered in-memory outputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryOutputs {
    values: IndexMap<String, String>,
}

impl MemoryOutputs {
    /// Creates an empty set of outputs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value recorded under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Value recorded under `name`, or `NotFound` naming the missing output.
    pub fn require(&self, name: &str) -> AppResult<&str> {
        self.get(name)
            .ok_or_else(|| AppError::NotFound(format!("Step output '{name}' was not produced")))
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copies every recorded output, in order, into `sink`.
    pub fn forward_to(&self, sink: &mut impl StepOutputs) -> AppResult<()> {
        for (name, value) in &self.values {
            sink.set_output(name, value)?;
        }
        Ok(())
    }
}

impl StepOutputs for MemoryOutputs {
    fn set_output(&mut self, name: &str, value: &str) -> AppResult<()> {
        self.values.insert(name.to_string(), value.to_string());
        Ok(())
    }
}

/// Formats an error as a GitHub Actions `::error::` workflow command.
pub fn error_command(err: &AppError) -> String {
    let message = err
        .to_string()
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error::{message}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_github_outputs_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("github_output");
        let mut outputs = GithubOutputs::new(Some(file.clone()));

        outputs.set_output(names::DOCS_DIR, "docs").unwrap();
        outputs
            .set_output(names::API_INSERT_ROUTE, "{\"get\":{}}")
            .unwrap();

        let written = fs::read_to_string(file).unwrap();
        assert_eq!(
            written,
            "docs-dir<<ghadelimiter_0\ndocs\nghadelimiter_0\n\
             api-insert-route<<ghadelimiter_0\n{\"get\":{}}\nghadelimiter_0\n"
        );
    }

    #[test]
    fn test_github_outputs_without_file_writes_name_value_lines() {
        let mut outputs = GithubOutputs::with_fallback(None, Vec::new());

        outputs.set_output(names::OUTPUT_DIR, "docs_output").unwrap();
        outputs
            .set_output(names::API_INSERT_FILE, "api-insert.yaml")
            .unwrap();

        assert_eq!(
            String::from_utf8_lossy(outputs.fallback()),
            "output-dir=docs_output\napi-insert-file=api-insert.yaml\n"
        );
    }

    #[test]
    fn test_heredoc_avoids_delimiter_collision() {
        let record = heredoc_record("x", "ghadelimiter_0\nmore").unwrap();
        assert!(record.starts_with("x<<ghadelimiter_1\n"));
    }

    #[test]
    fn test_memory_outputs() {
        let mut outputs = MemoryOutputs::new();
        assert!(outputs.is_empty());
        outputs.set_output("a", "1").unwrap();
        outputs.set_output("b", "2").unwrap();
        outputs.set_output("a", "3").unwrap();

        assert_eq!(outputs.get("a"), Some("3"));
        assert!(matches!(
            outputs.require("missing"),
            Err(AppError::NotFound(_))
        ));

        let mut copy = MemoryOutputs::new();
        outputs.forward_to(&mut copy).unwrap();
        assert_eq!(copy, outputs);
    }

    #[test]
    fn test_error_command_escapes() {
        let err = AppError::NotFound("line one\nline 100%".into());
        assert_eq!(error_command(&err), "::error::line one%0Aline 100%25");
    }
}
