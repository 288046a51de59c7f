#![deny(missing_docs)]

//! # Document Storage
//!
//! Directory scanning and YAML load/store for OpenAPI documents and inserts.
//!
//! Listings are always sorted by file name so every step visits documents in
//! a deterministic order regardless of the platform's directory order.

use crate::error::{AppError, AppResult};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension of every document the pipeline recognises.
pub const DOCUMENT_EXTENSION: &str = "yaml";

/// Lists the regular files directly inside `dir` whose name satisfies `accept`.
///
/// Sub-directories are not descended into.
pub fn list_files(dir: &Path, accept: impl Fn(&str) -> bool) -> AppResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(AppError::NotFound(format!(
            "Directory not found: {}",
            dir.display()
        )));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_str().is_some_and(&accept) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Lists every `.yaml` document directly inside `dir`, sorted by name.
pub fn list_documents(dir: &Path) -> AppResult<Vec<PathBuf>> {
    let suffix = format!(".{DOCUMENT_EXTENSION}");
    list_files(dir, |name| name.ends_with(&suffix))
}

/// Reads and parses a YAML file.
///
/// An empty file yields `Value::Null`.
pub fn load_yaml(path: &Path) -> AppResult<Value> {
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str(&content)
        .map_err(|e| AppError::Parse(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Serializes `value` as YAML and overwrites `path` with it.
pub fn write_yaml(path: &Path, value: &Value) -> AppResult<()> {
    let content = serde_yaml::to_string(value)
        .map_err(|e| AppError::Parse(format!("Failed to serialize {}: {}", path.display(), e)))?;
    fs::write(path, content)?;
    Ok(())
}

/// File name of `path` without the `.yaml` extension.
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
