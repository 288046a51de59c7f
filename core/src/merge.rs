#![deny(missing_docs)]

//! # Document Merge
//!
//! Inserts a route into an OpenAPI document and shallow-merges the insert's
//! schemas into `components.schemas`.
//!
//! Keys are overwritten in place, so re-applying the same insert leaves the
//! document unchanged and existing key order is kept.

use crate::document::{load_yaml, write_yaml};
use crate::error::{AppError, AppResult};
use crate::insert::InsertParams;
use serde_yaml::{Mapping, Value};
use std::path::Path;
use tracing::info;

/// Merges `params` into `doc`.
///
/// Missing (or non-mapping) `paths`, `components` and `components.schemas`
/// are replaced by empty mappings first, so any starting document is accepted.
pub fn merge_insert(doc: &mut Value, params: &InsertParams) {
    let root = as_mapping(doc);

    let paths = child_mapping(root, "paths");
    paths.insert(Value::from(params.path.as_str()), params.route.clone());

    let components = child_mapping(root, "components");
    let schemas = child_mapping(components, "schemas");
    if let Some(incoming) = params.schemas() {
        for (name, schema) in incoming {
            schemas.insert(name.clone(), schema.clone());
        }
    }
}

/// Loads `target`, merges `params` into it and writes it back in place.
pub fn update_document(target: &Path, params: &InsertParams) -> AppResult<()> {
    if !target.exists() {
        return Err(AppError::NotFound(format!(
            "Target document not found: {}",
            target.display()
        )));
    }

    let mut doc = load_yaml(target)?;
    merge_insert(&mut doc, params);
    write_yaml(target, &doc)?;

    info!(
        target = %target.display(),
        path = %params.path,
        schemas = params.schemas().map_or(0, Mapping::len),
        "merged api insert"
    );
    Ok(())
}

fn as_mapping(value: &mut Value) -> &mut Mapping {
    if !value.is_mapping() {
        *value = Value::Mapping(Mapping::new());
    }
    match value {
        Value::Mapping(map) => map,
        _ => unreachable!("value was just replaced by a mapping"),
    }
}

fn child_mapping<'a>(parent: &'a mut Mapping, key: &str) -> &'a mut Mapping {
    if !parent.get(key).is_some_and(Value::is_mapping) {
        parent.insert(Value::from(key), Value::Mapping(Mapping::new()));
    }
    match parent.get_mut(key) {
        Some(Value::Mapping(map)) => map,
        _ => unreachable!("`{key}` was just set to a mapping"),
    }
}
