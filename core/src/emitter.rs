//! Writes translated procedures to disk.
//!
//! One file per procedure at `{out_dir}/{schema}_{name}.rs`: a doc
//! header reproducing the procedure's catalog metadata and original
//! source, then the fence-stripped translation. Last write wins.

use crate::{catalog::StoredProcedure, error::CoreResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Remove a leading fence line (with optional language tag) and a
/// trailing fence if present. Text without fences passes through
/// unchanged apart from outer whitespace.
pub fn strip_code_fences(text: &str) -> String {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```") {
        // Drop the whole opening line; it may carry a language tag.
        body = match rest.split_once('\n') {
            Some((_, after)) => after,
            None => "",
        };
    }
    if let Some(rest) = body.trim_end().strip_suffix("```") {
        body = rest;
    }
    body.trim().to_string()
}

/// Write one translated procedure. Creates `out_dir` if absent and
/// overwrites any existing file at the target path.
pub fn emit(out_dir: &Path, proc: &StoredProcedure, translated: &str) -> CoreResult<PathBuf> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(format!("{}_{}.rs", proc.schema, proc.name));

    let mut content = String::new();
    content.push_str(&format!("//! PostgreSQL stored procedure: {}\n", proc.name));
    content.push_str(&format!("//! Schema: {}\n", proc.schema));
    content.push_str(&format!("//! Arguments: {}\n", proc.arguments));
    content.push_str(&format!("//! Return type: {}\n", proc.return_type));
    content.push_str("//!\n//! Original definition:\n//!\n");
    for line in proc.definition.lines() {
        if line.is_empty() {
            content.push_str("//!\n");
        } else {
            content.push_str(&format!("//! {line}\n"));
        }
    }
    content.push('\n');
    content.push_str(&strip_code_fences(translated));
    content.push('\n');

    fs::write(&path, content)?;
    Ok(path)
}
