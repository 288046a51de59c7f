#![deny(missing_docs)]

//! # API Insert Loading
//!
//! Locates the `api-insert*.yaml` fragment, parses it and converts it to the
//! string form handed between pipeline steps.
//!
//! The transport form mirrors what CI outputs can carry: the path as plain
//! text, the route and components as JSON.

use crate::document::{list_files, load_yaml, DOCUMENT_EXTENSION};
use crate::error::{AppError, AppResult};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// File name prefix identifying an API insert.
pub const INSERT_PREFIX: &str = "api-insert";

/// A route and its schemas, authored to be merged into an OpenAPI document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiInsert {
    /// URL-style route key, e.g. `/widgets/{id}`.
    pub path: String,
    /// Route definition placed under `paths[path]`.
    pub route: Value,
    /// Components fragment; only its `schemas` mapping is merged.
    #[serde(default = "empty_mapping")]
    pub components: Value,
}

fn empty_mapping() -> Value {
    Value::Mapping(Mapping::new())
}

/// Explicit merge parameters consumed by [`crate::merge`].
#[derive(Debug, Clone, PartialEq)]
pub struct InsertParams {
    /// Route key to set.
    pub path: String,
    /// Route definition to store at `path`.
    pub route: Value,
    /// Components fragment carrying the incoming `schemas`.
    pub components: Value,
}

/// String-encoded insert as exchanged between steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertTransport {
    /// Route key, verbatim.
    pub path: String,
    /// Route definition as JSON.
    pub route: String,
    /// Components fragment as JSON.
    pub components: String,
}

impl ApiInsert {
    /// Encodes the insert for hand-off to the next step.
    pub fn to_transport(&self) -> AppResult<InsertTransport> {
        Ok(InsertTransport {
            path: self.path.clone(),
            route: to_json(&self.route, "route")?,
            components: to_json(&self.components, "components")?,
        })
    }

    /// Merge parameters carrying this insert's values.
    pub fn to_params(&self) -> InsertParams {
        InsertParams {
            path: self.path.clone(),
            route: self.route.clone(),
            components: self.components.clone(),
        }
    }
}

impl InsertParams {
    /// Decodes the values produced by [`ApiInsert::to_transport`].
    pub fn from_transport(path: &str, route: &str, components: &str) -> AppResult<Self> {
        if path.is_empty() {
            return Err(AppError::Parse("Insert path must not be empty".into()));
        }

        Ok(Self {
            path: path.to_string(),
            route: from_json(route, "route")?,
            components: from_json(components, "components")?,
        })
    }

    /// The incoming `components.schemas` mapping, if the fragment has one.
    pub fn schemas(&self) -> Option<&Mapping> {
        self.components.get("schemas").and_then(Value::as_mapping)
    }
}

fn to_json(value: &Value, field: &str) -> AppResult<String> {
    serde_json::to_string(value)
        .map_err(|e| AppError::Parse(format!("Failed to encode insert {field}: {e}")))
}

fn from_json(raw: &str, field: &str) -> AppResult<Value> {
    serde_json::from_str(raw)
        .map_err(|e| AppError::Parse(format!("Invalid JSON for insert {field}: {e}")))
}

/// Returns `true` for names of the form `api-insert*.yaml`.
pub fn is_insert_file_name(name: &str) -> bool {
    name.starts_with(INSERT_PREFIX) && name.ends_with(&format!(".{DOCUMENT_EXTENSION}"))
}

/// Finds the insert file in `dir`.
///
/// When several files match, the lexically smallest name wins.
pub fn find_insert_file(dir: &Path) -> AppResult<PathBuf> {
    let mut candidates = list_files(dir, is_insert_file_name)?.into_iter();

    let Some(chosen) = candidates.next() else {
        return Err(AppError::NotFound("No api-insert file found".into()));
    };

    for ignored in candidates {
        warn!(
            chosen = %chosen.display(),
            ignored = %ignored.display(),
            "multiple api-insert files found"
        );
    }

    Ok(chosen)
}

/// Parses an insert file.
pub fn load_insert(path: &Path) -> AppResult<ApiInsert> {
    let value = load_yaml(path)?;
    let insert: ApiInsert = serde_yaml::from_value(value)
        .map_err(|e| AppError::Parse(format!("Invalid api insert {}: {}", path.display(), e)))?;

    if insert.path.trim().is_empty() {
        return Err(AppError::Parse(format!(
            "Invalid api insert {}: `path` must not be empty",
            path.display()
        )));
    }

    if insert.route.is_null() {
        return Err(AppError::Parse(format!(
            "Invalid api insert {}: missing field `route`",
            path.display()
        )));
    }

    info!(file = %path.display(), path = %insert.path, "loaded api insert");
    Ok(insert)
}
