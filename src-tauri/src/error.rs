// src-tauri/src/error.rs
use thiserror::Error;

/// Error kinds surfaced across the command surface.
#[derive(Error, Debug, Clone)]
pub enum CoreError {
    #[error("failed to scan '{path}': {reason}")]
    ScanFailed { path: String, reason: String },

    #[error("path not found: {0}")]
    NotFound(String),

    #[error("export request has neither instructions nor files")]
    EmptyRequest,

    #[error("pattern '{0}' failed to compile: {1}")]
    PatternInvalid(String, String),

    #[error("settings store error: {0}")]
    Settings(String),

    #[error("invariant violated: {0}")]
    InvariantViolated(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Per-entry scan diagnostics, accumulated rather than propagated as command errors.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "path")]
pub enum ScanDiagnostic {
    SkippedLarge(String),
    SkippedBinary(String),
    SkippedPermission(String),
}
