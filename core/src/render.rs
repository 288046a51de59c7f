//! # Docs Rendering
//!
//! Builds one static HTML page per OpenAPI document with `redocly build-docs`.

use crate::document::{base_name, list_documents};
use crate::error::AppResult;
use crate::runner::{run_checked, CommandRunner};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default directory receiving rendered pages.
pub const DEFAULT_OUTPUT_DIR: &str = "docs_output";

/// Renders every document in `docs_dir` to `<output_dir>/<base>.html`.
///
/// Creates `output_dir` when missing. The first generator failure aborts the
/// remaining documents. Returns the rendered page paths.
pub fn render_docs<R: CommandRunner + ?Sized>(
    docs_dir: &Path,
    output_dir: &Path,
    runner: &R,
) -> AppResult<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;

    let mut rendered = Vec::new();
    for document in list_documents(docs_dir)? {
        let page = output_dir.join(format!("{}.html", base_name(&document)));
        let source = document.to_string_lossy();
        let target = page.to_string_lossy();

        run_checked(
            runner,
            "redocly",
            &["build-docs", &*source, "--output", &*target],
        )?;

        info!(source = %source, page = %target, "rendered docs");
        rendered.push(page);
    }

    Ok(rendered)
}
