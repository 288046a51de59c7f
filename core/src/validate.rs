#![deny(missing_docs)]

//! # OpenAPI Validation
//!
//! Conformance checks run over every document in the docs directory.
//!
//! The default [`OpenApiValidator`] requires:
//! - a parseable YAML document,
//! - an `openapi` version string of the 3.x line (Swagger 2.0 is rejected),
//! - for 3.0.x, a document that deserializes into the typed `openapiv3` model,
//! - for later 3.x releases, the root structure shared by every 3.x version:
//!   an `info` object with `title` and `version`, at least one of `paths`,
//!   `components` or `webhooks`, and path keys starting with `/`,
//! - every local `$ref` resolving to a node inside the document.

use crate::document::{list_documents, load_yaml};
use crate::error::{AppError, AppResult};
use percent_encoding::percent_decode_str;
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use tracing::info;

/// A conformance check for a single document on disk.
pub trait DocumentValidator {
    /// Returns `Ok(())` when the document at `path` is valid.
    fn validate(&self, path: &Path) -> AppResult<()>;
}

/// In-process OpenAPI 3.x validator.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenApiValidator;

impl DocumentValidator for OpenApiValidator {
    fn validate(&self, path: &Path) -> AppResult<()> {
        let doc = load_yaml(path)?;
        let file = path.display();
        let invalid = |msg: String| AppError::Validation(format!("{file}: {msg}"));

        let version = openapi_version(&doc).map_err(invalid)?;

        if version.starts_with("3.0.") {
            serde_yaml::from_value::<openapiv3::OpenAPI>(doc.clone())
                .map_err(|e| invalid(e.to_string()))?;
        } else {
            validate_root_structure(&doc).map_err(invalid)?;
        }

        if let Some(reference) = find_unresolved_ref(&doc, &doc) {
            return Err(invalid(format!("unresolved reference '{reference}'")));
        }

        Ok(())
    }
}

/// Extracts the `openapi` version string of a 3.x document.
fn openapi_version(doc: &Value) -> Result<&str, String> {
    match doc.get("openapi") {
        Some(Value::String(version)) if version.starts_with("3.") => Ok(version.as_str()),
        Some(Value::String(version)) => Err(format!("unsupported OpenAPI version '{version}'")),
        Some(Value::Number(n)) => Err(format!(
            "'openapi' version must be a string, found number {n} (quote it, e.g. '{n}.0')"
        )),
        Some(other) => Err(format!("'openapi' version must be a string, found {other:?}")),
        None if doc.get("swagger").is_some() => Err(
            "Swagger 2.0 documents are not supported; convert to OpenAPI 3.x".to_string(),
        ),
        None => Err("missing 'openapi' version field".to_string()),
    }
}

/// Root-level checks common to every OpenAPI 3.x release.
fn validate_root_structure(doc: &Value) -> Result<(), String> {
    let root = doc
        .as_mapping()
        .ok_or("document root must be a mapping")?;

    let info = root
        .get("info")
        .and_then(Value::as_mapping)
        .ok_or("missing required 'info' object")?;
    for field in ["title", "version"] {
        if !info.get(field).is_some_and(Value::is_string) {
            return Err(format!("'info.{field}' must be a string"));
        }
    }

    if ["paths", "components", "webhooks"]
        .iter()
        .all(|key| !root.contains_key(*key))
    {
        return Err(
            "document must define at least one of 'components', 'paths', or 'webhooks'".into(),
        );
    }

    for key in ["components", "webhooks"] {
        expect_optional_mapping(root, key)?;
    }

    if let Some(paths) = expect_optional_mapping(root, "paths")? {
        for (route, item) in paths {
            let route = route
                .as_str()
                .ok_or_else(|| format!("path key {route:?} must be a string"))?;
            if !route.starts_with('/') {
                return Err(format!("path '{route}' must start with '/'"));
            }
            if !item.is_mapping() {
                return Err(format!("path item '{route}' must be a mapping"));
            }
        }
    }

    Ok(())
}

fn expect_optional_mapping<'a>(root: &'a Mapping, key: &str) -> Result<Option<&'a Mapping>, String> {
    match root.get(key) {
        None => Ok(None),
        Some(Value::Mapping(map)) => Ok(Some(map)),
        Some(_) => Err(format!("'{key}' must be a mapping")),
    }
}

/// Validates every `.yaml` document in `dir` in name order.
///
/// Stops at the first failure; documents after it are not checked.
pub fn validate_dir(dir: &Path, validator: &impl DocumentValidator) -> AppResult<Vec<PathBuf>> {
    let mut validated = Vec::new();

    for document in list_documents(dir)? {
        validator.validate(&document)?;
        let name = document
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!("{name} is valid");
        validated.push(document);
    }

    Ok(validated)
}

/// Returns the first local `$ref` (`#/...`) that does not resolve.
///
/// External references are not fetched and are ignored.
fn find_unresolved_ref(root: &Value, node: &Value) -> Option<String> {
    match node {
        Value::Mapping(map) => map.iter().find_map(|(key, child)| {
            if key.as_str() == Some("$ref") {
                return child
                    .as_str()
                    .filter(|r| r.starts_with('#') && resolve_pointer(root, r).is_none())
                    .map(str::to_string);
            }
            find_unresolved_ref(root, child)
        }),
        Value::Sequence(items) => items.iter().find_map(|c| find_unresolved_ref(root, c)),
        Value::Tagged(tagged) => find_unresolved_ref(root, &tagged.value),
        _ => None,
    }
}

/// Resolves a `#/a/b` fragment against `root`.
fn resolve_pointer<'a>(root: &'a Value, reference: &str) -> Option<&'a Value> {
    let pointer = reference.strip_prefix('#')?;
    if pointer.is_empty() {
        return Some(root);
    }

    pointer
        .strip_prefix('/')?
        .split('/')
        .try_fold(root, |node, raw| {
            let segment = decode_pointer_segment(raw);
            match node {
                Value::Mapping(map) => map.get(segment.as_str()).or_else(|| {
                    map.iter()
                        .find(|(k, _)| scalar_key(k).as_deref() == Some(segment.as_str()))
                        .map(|(_, v)| v)
                }),
                Value::Sequence(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            }
        })
}

/// Decodes a JSON Pointer segment (handles `~1`, `~0` and URI escapes).
fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}

// Unquoted YAML keys such as `200:` load as numbers.
fn scalar_key(key: &Value) -> Option<String> {
    match key {
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
