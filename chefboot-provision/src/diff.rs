//! Unified diff of what `provision` would write.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use similar::TextDiff;

use chefboot_core::Context;
use chefboot_renderer::TemplateEngine;

use crate::error::io_err;
use crate::pipeline::{relative_to, ProvisionRequest};
use crate::ProvisionError;

/// A single rendered file diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: PathBuf,
    pub unified_diff: String,
}

/// Render the request's template and compare it to the file on disk.
///
/// A missing file compares as empty. Returns `None` when the contents match.
/// No files are written.
pub fn diff_rendered(
    engine: &TemplateEngine,
    request: &ProvisionRequest,
    ctx: &Context,
) -> Result<Option<FileDiff>, ProvisionError> {
    let path = request.target_path();
    let rendered = normalize_line_endings(&engine.render(request.kind, ctx)?);
    let existing = read_existing_or_empty(&path)?;
    if existing == rendered {
        return Ok(None);
    }

    let relative = relative_to(&path, &request.root);
    let old_header = format!("a/{}", relative.display());
    let new_header = format!("b/{}", relative.display());
    let unified = TextDiff::from_lines(&existing, &rendered)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string();

    Ok(Some(FileDiff {
        path,
        unified_diff: unified,
    }))
}

fn read_existing_or_empty(path: &Path) -> Result<String, ProvisionError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(normalize_line_endings(&content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(io_err(path, err)),
    }
}

fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n")
}
