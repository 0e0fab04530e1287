// src-tauri/src/utils.rs
// Path canonicalization shared by every module that touches PathStore keys.

/// Normalizes a user- or filesystem-supplied path into the internal comparison form:
/// backslashes become forward slashes, a drive-letter prefix (`C:/`) is lowercased,
/// and a trailing slash is removed. Other path segments are left case-preserved.
pub fn normalize_path(raw: &str) -> String {
    let slashed = raw.replace('\\', "/");
    let mut out = if let Some(rest) = drive_prefix_len(&slashed) {
        let (prefix, tail) = slashed.split_at(rest);
        format!("{}{}", prefix.to_lowercase(), tail)
    } else {
        slashed
    };

    while out.len() > 1 && out.ends_with('/') {
        out.pop();
    }
    out
}

/// Length of a `C:` / `C:/` style drive prefix at the start of `path`, if any.
fn drive_prefix_len(path: &str) -> Option<usize> {
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        Some(2)
    } else {
        None
    }
}

/// Returns the normalized path of the filesystem parent of `path`, or `None` if
/// `path` is already a root (no remaining `/` separator).
pub fn parent_of(path: &str) -> Option<String> {
    let path = path.trim_end_matches('/');
    match path.rfind('/') {
        Some(0) => Some("/".to_string()),
        Some(idx) => Some(path[..idx].to_string()),
        None => None,
    }
}

/// Final path component ("name") of a normalized path.
pub fn name_of(path: &str) -> String {
    let path = path.trim_end_matches('/');
    match path.rfind('/') {
        Some(idx) => path[idx + 1..].to_string(),
        None => path.to_string(),
    }
}

/// True if `ancestor` is a proper ancestor of, or equal to, `descendant` under
/// normalized-path prefix comparison.
pub fn is_ancestor_or_self(ancestor: &str, descendant: &str) -> bool {
    if ancestor == descendant {
        return true;
    }
    let prefix = if ancestor.ends_with('/') {
        ancestor.to_string()
    } else {
        format!("{}/", ancestor)
    };
    descendant.starts_with(&prefix)
}

/// True if `ancestor` is a *proper* ancestor of `descendant`.
pub fn is_proper_ancestor(ancestor: &str, descendant: &str) -> bool {
    ancestor != descendant && is_ancestor_or_self(ancestor, descendant)
}

/// Lowest common ancestor directory of two normalized paths, walking upward
/// by path segment until a shared prefix is found. Returns `None` when the
/// paths share no directory segment (different drives, or no common root
/// beyond the filesystem root).
pub fn common_ancestor(a: &str, b: &str) -> Option<String> {
    let a_segs: Vec<&str> = a.split('/').filter(|s| !s.is_empty()).collect();
    let b_segs: Vec<&str> = b.split('/').filter(|s| !s.is_empty()).collect();

    let mut shared = Vec::new();
    for (x, y) in a_segs.iter().zip(b_segs.iter()) {
        if x == y {
            shared.push(*x);
        } else {
            break;
        }
    }

    if shared.is_empty() {
        return None;
    }

    let leading_slash = a.starts_with('/');
    let joined = shared.join("/");
    Some(if leading_slash {
        format!("/{}", joined)
    } else {
        joined
    })
}

/// A stable per-session content fingerprint derived from size and mtime.
/// Cheap and sufficient for change detection within a session; not a
/// cryptographic digest (see DESIGN.md).
pub fn fingerprint_of(size: u64, mtime: i64) -> String {
    format!("{:x}-{:x}", size, mtime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_backslashes_and_drive_letter() {
        assert_eq!(normalize_path("C:\\Users\\a\\b\\"), "c:/Users/a/b");
    }

    #[test]
    fn preserves_non_drive_case() {
        assert_eq!(normalize_path("/Home/User/File.txt"), "/Home/User/File.txt");
    }

    #[test]
    fn parent_of_root_is_none() {
        assert_eq!(parent_of("/p"), Some("/".to_string()));
        assert_eq!(parent_of("/"), None);
    }

    #[test]
    fn ancestor_checks() {
        assert!(is_proper_ancestor("/p", "/p/t1/plan.ts"));
        assert!(!is_proper_ancestor("/p", "/pother/plan.ts"));
        assert!(is_ancestor_or_self("/p", "/p"));
    }

    #[test]
    fn common_ancestor_of_siblings() {
        assert_eq!(common_ancestor("/p/t1", "/p/t2"), Some("/p".to_string()));
        assert_eq!(common_ancestor("/a/b", "/c/d"), None);
    }
}
