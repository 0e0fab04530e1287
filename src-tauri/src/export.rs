// src-tauri/src/export.rs
// build_context / build_prompt_from_files.

use crate::error::{CoreError, CoreResult};
use crate::path_store::PathStore;
use crate::redactor;
use crate::settings::Settings;
use crate::state_overlay::StateOverlay;
use crate::types::Sensitivity;
use crate::utils::normalize_path;
use rayon::prelude::*;
use std::fs;

const CONTEXT_SEPARATOR: &str = "---CONTEXT:";

/// `build_context(template_id, custom_instructions, file_paths)`.
/// `template_id` is accepted for forward compatibility with a future
/// template set but only the default (bare concatenation) body is built;
/// templating itself is out of scope.
pub fn build_context(
    path_store: &PathStore,
    overlay: &StateOverlay,
    settings: &Settings,
    _template_id: Option<&str>,
    custom_instructions: &str,
    file_paths: &[String],
) -> CoreResult<String> {
    if custom_instructions.trim().is_empty() && file_paths.is_empty() {
        return Err(CoreError::EmptyRequest);
    }

    if file_paths.is_empty() {
        return Ok(custom_instructions.to_string());
    }

    let patterns = settings.ordered_patterns();
    let blocks: Vec<CoreResult<String>> = file_paths
        .par_iter()
        .map(|path| build_file_block(path_store, overlay, settings, &patterns, path))
        .collect();

    let mut out = String::new();
    if !custom_instructions.trim().is_empty() {
        out.push_str(custom_instructions);
        out.push_str("\n\n");
    }
    out.push_str(CONTEXT_SEPARATOR);
    out.push('\n');
    for block in blocks {
        out.push_str(&block?);
    }

    Ok(out)
}

fn build_file_block(
    path_store: &PathStore,
    overlay: &StateOverlay,
    settings: &Settings,
    patterns: &[crate::types::Pattern],
    path: &str,
) -> CoreResult<String> {
    let normalized = normalize_path(path);
    let node = path_store
        .get(&normalized)
        .ok_or_else(|| CoreError::NotFound(normalized.clone()))?;

    if node.is_dir {
        return Ok(String::new()); // directories are not exported
    }

    let content = fs::read_to_string(&normalized)
        .map_err(|e| CoreError::ScanFailed { path: normalized.clone(), reason: e.to_string() })?;

    let is_sensitive = overlay.get(&normalized).sensitive == Sensitivity::Marked;
    let body = if settings.sensitive_data_enabled && is_sensitive {
        redactor::redact(&content, patterns)
    } else {
        content
    };

    Ok(format!("\n### {}\n{}\n", normalized, body))
}

/// Restricts `paths` to those whose overlay sensitivity is `Marked`.
pub fn sensitive_marked_paths(overlay: &StateOverlay, paths: &[String]) -> Vec<String> {
    paths
        .iter()
        .map(|p| normalize_path(p))
        .filter(|p| overlay.get(p).sensitive == Sensitivity::Marked)
        .collect()
}
