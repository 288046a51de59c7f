#![deny(missing_docs)]

//! # Docflow Core
//!
//! Core library for the OpenAPI documentation pipeline: load an API insert,
//! merge it into a document, validate, render and publish.

/// Shared error types.
pub mod error;

/// External command execution.
pub mod runner;

/// Directory scanning and YAML storage.
pub mod document;

/// API insert discovery and transport encoding.
pub mod insert;

/// Route and schema merge into OpenAPI documents.
pub mod merge;

/// OpenAPI conformance checks.
pub mod validate;

/// Static HTML docs generation.
pub mod render;

/// Commit and push of regenerated docs.
pub mod publish;

/// Named step outputs.
pub mod outputs;

pub use document::{list_documents, load_yaml, write_yaml};
pub use error::{AppError, AppResult};
pub use insert::{find_insert_file, load_insert, ApiInsert, InsertParams, InsertTransport};
pub use merge::{merge_insert, update_document};
pub use outputs::{GithubOutputs, MemoryOutputs, StepOutputs};
pub use publish::{publish, PublishOutcome, PublishRequest};
pub use render::render_docs;
#[cfg(all(unix, any(test, feature = "test-utils")))]
pub use runner::RecordingRunner;
pub use runner::{CommandRunner, ShellRunner};
pub use validate::{validate_dir, DocumentValidator, OpenApiValidator};
