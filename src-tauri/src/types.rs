// src-tauri/src/types.rs
use serde::{Deserialize, Serialize};

/// A single indexed filesystem entry, owned by `PathStore`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Node {
    pub path: String,
    pub parent_path: Option<String>,
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    pub mtime: i64,
    pub fingerprint: Option<String>,
    pub child_count: usize,
    /// True for a directory materialized as a common ancestor of two or
    /// more anchors, rather than one the user explicitly indexed.
    #[serde(default)]
    pub synthetic: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    Unchecked,
    Checked,
    Indeterminate,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Expansion {
    Collapsed,
    Expanded,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sensitivity {
    Plain,
    Marked,
}

/// Per-path overlay state: selection, expansion, sensitivity, kept
/// independent of `PathStore` so it survives re-indexing.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OverlayEntry {
    pub selection: Selection,
    pub expansion: Expansion,
    pub sensitive: Sensitivity,
    /// True once the user has explicitly collapsed this directory in the
    /// current session; overrides auto-expansion laws until cleared by an
    /// explicit user toggle.
    pub explicit_collapse: bool,
}

impl Default for OverlayEntry {
    fn default() -> Self {
        OverlayEntry {
            selection: Selection::Unchecked,
            expansion: Expansion::Collapsed,
            sensitive: Sensitivity::Plain,
            explicit_collapse: false,
        }
    }
}

/// A configured redaction pattern.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Pattern {
    pub id: String,
    pub name: String,
    pub regex: String,
    pub placeholder: String,
    pub enabled: bool,
    pub builtin: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
    pub pattern_id: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ScanFileResult {
    pub marked: bool,
    pub matches: Vec<MatchSpan>,
}

/// A single `(path, depth)` row as produced by `FlatView`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FlatRow {
    pub path: String,
    pub depth: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IndexingProgress {
    pub current_path: String,
    pub done: Option<usize>,
    pub total: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct BuildPromptRequest {
    pub template_id: Option<String>,
    #[serde(default)]
    pub custom_instructions: String,
    #[serde(default)]
    pub file_paths: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BuildPromptResponse {
    pub prompt: String,
}
