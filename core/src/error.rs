//! # Error Handling
//!
//! Provides the unified `AppError` enum shared by every pipeline step.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// String payloads default to `General`; the other string-carrying variants
/// must be built explicitly.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// An expected insert file, target document or directory is missing.
    #[from(ignore)]
    #[display("{_0}")]
    NotFound(String),

    /// Malformed YAML/JSON or a structurally incomplete insert.
    #[from(ignore)]
    #[display("Parse Error: {_0}")]
    Parse(String),

    /// A document failed the OpenAPI conformance check.
    #[from(ignore)]
    #[display("Validation Error: {_0}")]
    Validation(String),

    /// An external command (git, redocly) exited non-zero.
    #[from(ignore)]
    #[display("Command `{command}` failed with {status}: {stderr}")]
    ExternalTool {
        /// The command line that was run.
        command: String,
        /// Exit status as reported by the OS.
        status: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_conversion() {
        let io_err = Error::new(ErrorKind::Other, "test");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_string_conversion() {
        let app_err: AppError = String::from("something wrong").into();
        match app_err {
            AppError::General(s) => assert_eq!(s, "something wrong"),
            _ => panic!("String should convert to AppError::General"),
        }
    }

    #[test]
    fn test_not_found_message_is_raw() {
        let err = AppError::NotFound("No api-insert file found".into());
        assert_eq!(err.to_string(), "No api-insert file found");
    }

    #[test]
    fn test_external_tool_display() {
        let err = AppError::ExternalTool {
            command: "git push origin main".into(),
            status: "exit status: 1".into(),
            stderr: "rejected".into(),
        };
        assert_eq!(
            err.to_string(),
            "Command `git push origin main` failed with exit status: 1: rejected"
        );
    }
}
