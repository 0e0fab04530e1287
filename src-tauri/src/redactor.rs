// src-tauri/src/redactor.rs
// Pattern-based content matching and substitution.

use crate::error::{CoreError, CoreResult};
use crate::types::{MatchSpan, Pattern, ScanFileResult};
use once_cell::sync::Lazy;
use regex::Regex;

/// Fixed builtin patterns, each individually overridable through
/// `Settings.builtin_overrides`, held as a process-wide singleton via
/// `once_cell::sync::Lazy`.
static BUILTIN_PATTERNS: Lazy<Vec<Pattern>> = Lazy::new(|| {
    vec![
        Pattern {
            id: "builtin.aws_access_key".into(),
            name: "AWS Access Key".into(),
            regex: r"AKIA[0-9A-Z]{16}".into(),
            placeholder: "[REDACTED_AWS_KEY]".into(),
            enabled: true,
            builtin: true,
        },
        Pattern {
            id: "builtin.private_key_block".into(),
            name: "Private Key Block".into(),
            regex: r"-----BEGIN [A-Z ]*PRIVATE KEY-----[\s\S]*?-----END [A-Z ]*PRIVATE KEY-----".into(),
            placeholder: "[REDACTED_PRIVATE_KEY]".into(),
            enabled: true,
            builtin: true,
        },
        Pattern {
            id: "builtin.generic_api_key".into(),
            name: "Generic API Key Assignment".into(),
            regex: r#"(?i)(api[_-]?key|secret)["']?\s*[:=]\s*["'][A-Za-z0-9_\-]{16,}["']"#.into(),
            placeholder: "[REDACTED_API_KEY]".into(),
            enabled: true,
            builtin: true,
        },
        Pattern {
            id: "builtin.email".into(),
            name: "Email Address".into(),
            regex: r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}".into(),
            placeholder: "[REDACTED_EMAIL]".into(),
            enabled: false,
            builtin: true,
        },
    ]
});

pub fn builtin_patterns() -> &'static [Pattern] {
    &BUILTIN_PATTERNS
}

pub fn compile(pattern: &Pattern) -> CoreResult<Regex> {
    Regex::new(&pattern.regex).map_err(|e| CoreError::PatternInvalid(pattern.name.clone(), e.to_string()))
}

/// Checks `content` against every enabled pattern; `marked` is the
/// disjunction of any enabled pattern matching.
/// Invalid patterns are skipped rather than treated as fatal.
pub fn scan_content(content: &str, patterns: &[Pattern]) -> ScanFileResult {
    let mut matches = Vec::new();
    for pattern in patterns.iter().filter(|p| p.enabled) {
        let Ok(re) = compile(pattern) else { continue };
        for m in re.find_iter(content) {
            matches.push(MatchSpan {
                start: m.start(),
                end: m.end(),
                pattern_id: pattern.id.clone(),
            });
        }
    }
    ScanFileResult {
        marked: !matches.is_empty(),
        matches,
    }
}

/// Replaces every match of every enabled pattern with its placeholder.
/// Overlapping matches resolve earliest-start, then earliest-added pattern
/// (patterns are evaluated in `patterns` order).
pub fn redact(content: &str, patterns: &[Pattern]) -> String {
    let mut spans: Vec<(usize, usize, &str)> = Vec::new();
    for pattern in patterns.iter().filter(|p| p.enabled) {
        let Ok(re) = compile(pattern) else { continue };
        for m in re.find_iter(content) {
            spans.push((m.start(), m.end(), pattern.placeholder.as_str()));
        }
    }

    // Stable sort by start keeps insertion (pattern-declaration) order among
    // equal-start matches, giving "earliest-added wins".
    spans.sort_by_key(|&(start, _, _)| start);

    let mut out = String::with_capacity(content.len());
    let mut cursor = 0usize;
    for (start, end, placeholder) in spans {
        if start < cursor {
            continue; // overlaps a previously applied (earlier-added) match
        }
        out.push_str(&content[cursor..start]);
        out.push_str(placeholder);
        cursor = end.max(start);
    }
    out.push_str(&content[cursor..]);
    out
}
