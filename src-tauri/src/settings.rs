// src-tauri/src/settings.rs
// The single Settings value owned by the command loop.

use crate::types::Pattern;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Settings {
    pub sensitive_data_enabled: bool,
    pub prevent_selection_enabled: bool,
    pub custom_patterns: Vec<Pattern>,
    pub builtin_overrides: HashMap<String, bool>,
    pub ignore_patterns: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            sensitive_data_enabled: false,
            prevent_selection_enabled: false,
            custom_patterns: Vec::new(),
            builtin_overrides: HashMap::new(),
            ignore_patterns: Vec::new(),
        }
    }
}

impl Settings {
    /// Builtin patterns in insertion order, followed by custom patterns,
    /// with each builtin's `enabled` flag resolved through `builtin_overrides`.
    /// Order matters: overlapping matches at the same start offset resolve
    /// "earliest-added wins".
    pub fn ordered_patterns(&self) -> Vec<Pattern> {
        let mut patterns: Vec<Pattern> = crate::redactor::builtin_patterns()
            .iter()
            .cloned()
            .map(|mut p| {
                if let Some(&enabled) = self.builtin_overrides.get(&p.id) {
                    p.enabled = enabled;
                }
                p
            })
            .collect();
        patterns.extend(self.custom_patterns.iter().cloned());
        patterns
    }
}
