// src-tauri/src/scanner.rs
// Multi-anchor indexing: walks input paths into a staged PathStore,
// committing only on success.

use crate::error::{CoreError, CoreResult, ScanDiagnostic};
use crate::ignore_handler::CompiledIgnorePatterns;
use crate::path_store::PathStore;
use crate::root_set::RootSet;
use crate::scan_state::CancelToken;
use crate::types::{IndexingProgress, Node};
use crate::utils::{name_of, normalize_path, parent_of};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const MAX_DEPTH: usize = 30;
const MAX_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const PROGRESS_THROTTLE: Duration = Duration::from_millis(50);

pub struct ScanOutcome {
    pub indexed_paths: Vec<String>,
    pub diagnostics: Vec<ScanDiagnostic>,
}

/// Indexes every path in `input_paths`, each becoming its own anchor
/// candidate (root-set coalescing happens afterwards, not here). Directory
/// anchors are walked recursively, consulting `ignore` at each descendant
/// (the anchor itself is never filtered — a user-chosen path is always
/// indexed even if it matches an ignore pattern).
///
/// A file anchor whose path already falls under an existing `root_set` root
/// has its intervening directory chain materialized up to that root, so it
/// stays reachable from `PathStore::children_of` instead of becoming an
/// orphaned node with no parent. A file anchor outside every existing root
/// keeps `parent_path: None`, exactly as before.
///
/// Fingerprints are left `None`; they're computed lazily on first read,
/// not during the walk. If `cancel` fires or any
/// anchor can't be read, nothing is merged into `path_store` — the staged
/// nodes are simply dropped, so a cancelled scan leaves prior state intact.
pub fn index(
    path_store: &mut PathStore,
    root_set: &RootSet,
    ignore: &CompiledIgnorePatterns,
    cancel: &CancelToken,
    input_paths: &[String],
    mut on_progress: impl FnMut(IndexingProgress),
) -> CoreResult<ScanOutcome> {
    let mut staged = PathStore::new();
    let mut diagnostics = Vec::new();
    let mut indexed_paths = Vec::new();
    let mut last_emit = Instant::now() - PROGRESS_THROTTLE;

    for raw in input_paths {
        let normalized = normalize_path(raw);
        let path = PathBuf::from(&normalized);

        let is_file_anchor = fs::symlink_metadata(&path).map(|m| m.is_file()).unwrap_or(false);
        let anchor_parent = if is_file_anchor {
            resolve_anchor_parent_chain(&mut staged, path_store, root_set, &normalized)
        } else {
            None
        };

        walk(
            &mut staged,
            ignore,
            cancel,
            &path,
            anchor_parent.as_deref(),
            0,
            true,
            &mut diagnostics,
            &mut indexed_paths,
            &mut last_emit,
            &mut on_progress,
        )?;
    }

    on_progress(IndexingProgress {
        current_path: "Indexing complete".into(),
        done: Some(indexed_paths.len()),
        total: Some(indexed_paths.len()),
    });

    for node in staged.all_nodes() {
        path_store.upsert(node.clone());
    }

    Ok(ScanOutcome {
        indexed_paths,
        diagnostics,
    })
}

/// If `file_path` falls under an already-established `root_set` root,
/// materializes every missing directory Node between that root and
/// `file_path`'s immediate parent, and returns the immediate parent's path.
/// Returns `None` when no existing root covers `file_path`, leaving the
/// caller to anchor the file with no parent as before.
fn resolve_anchor_parent_chain(
    staged: &mut PathStore,
    path_store: &PathStore,
    root_set: &RootSet,
    file_path: &str,
) -> Option<String> {
    let root = root_set.root_for(file_path)?.to_string();
    if !path_store.contains(&root) {
        return None;
    }

    let mut missing = Vec::new();
    let mut existing_ancestor = root.clone();
    let mut current = parent_of(file_path);
    while let Some(dir) = current {
        if dir == root || path_store.contains(&dir) || staged.contains(&dir) {
            existing_ancestor = dir;
            break;
        }
        current = parent_of(&dir);
        missing.push(dir);
    }
    missing.reverse();

    let mut parent = existing_ancestor;
    for dir in missing {
        let mtime = fs::symlink_metadata(&dir).ok().map(|m| mtime_of(&m)).unwrap_or(0);
        staged.upsert(Node {
            path: dir.clone(),
            parent_path: Some(parent.clone()),
            name: name_of(&dir),
            is_dir: true,
            size: 0,
            mtime,
            fingerprint: None,
            child_count: 0,
            synthetic: false,
        });
        parent = dir;
    }
    Some(parent)
}

#[allow(clippy::too_many_arguments)]
fn walk(
    staged: &mut PathStore,
    ignore: &CompiledIgnorePatterns,
    cancel: &CancelToken,
    path: &Path,
    parent_path: Option<&str>,
    depth: usize,
    is_anchor: bool,
    diagnostics: &mut Vec<ScanDiagnostic>,
    indexed_paths: &mut Vec<String>,
    last_emit: &mut Instant,
    on_progress: &mut impl FnMut(IndexingProgress),
) -> CoreResult<()> {
    if cancel.is_cancelled() {
        return Err(CoreError::ScanFailed {
            path: path.display().to_string(),
            reason: "scan cancelled".into(),
        });
    }
    if depth > MAX_DEPTH {
        return Ok(());
    }

    let normalized = normalize_path(&path.to_string_lossy());

    if !is_anchor && ignore.is_ignored(path, path.is_dir()) {
        return Ok(());
    }

    let meta = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) => {
            if is_anchor {
                return Err(CoreError::ScanFailed {
                    path: normalized,
                    reason: e.to_string(),
                });
            }
            diagnostics.push(ScanDiagnostic::SkippedPermission(normalized));
            return Ok(());
        }
    };

    if meta.is_dir() {
        staged.upsert(Node {
            path: normalized.clone(),
            parent_path: parent_path.map(String::from),
            name: name_of(&normalized),
            is_dir: true,
            size: 0,
            mtime: mtime_of(&meta),
            fingerprint: None,
            child_count: 0,
            synthetic: false,
        });

        if last_emit.elapsed() >= PROGRESS_THROTTLE {
            on_progress(IndexingProgress {
                current_path: normalized.clone(),
                done: Some(indexed_paths.len()),
                total: None,
            });
            *last_emit = Instant::now();
        }

        let entries = match fs::read_dir(path) {
            Ok(e) => e,
            Err(_) => {
                diagnostics.push(ScanDiagnostic::SkippedPermission(normalized));
                return Ok(());
            }
        };
        for entry in entries.flatten() {
            walk(
                staged,
                ignore,
                cancel,
                &entry.path(),
                Some(&normalized),
                depth + 1,
                false,
                diagnostics,
                indexed_paths,
                last_emit,
                on_progress,
            )?;
        }
    } else if meta.is_file() {
        if meta.len() > MAX_FILE_SIZE_BYTES {
            diagnostics.push(ScanDiagnostic::SkippedLarge(normalized));
            return Ok(());
        }
        staged.upsert(Node {
            path: normalized.clone(),
            parent_path: parent_path.map(String::from),
            name: name_of(&normalized),
            is_dir: false,
            size: meta.len(),
            mtime: mtime_of(&meta),
            fingerprint: None,
            child_count: 0,
            synthetic: false,
        });
        indexed_paths.push(normalized);
    }
    // Anything else (symlink, socket, fifo, ...) is neither a file nor a
    // directory in this model and is silently skipped.

    Ok(())
}

fn mtime_of(meta: &fs::Metadata) -> i64 {
    meta.modified()
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_ignores(root: &Path) -> CompiledIgnorePatterns {
        CompiledIgnorePatterns::new(root, &[])
    }

    #[test]
    fn indexes_directory_recursively() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::File::create(dir.path().join("sub").join("a.txt"))
            .unwrap()
            .write_all(b"hello")
            .unwrap();

        let mut store = PathStore::new();
        let ignore = no_ignores(dir.path());
        let cancel = CancelToken::new();
        let root = dir.path().to_string_lossy().to_string();

        let root_set = RootSet::new();
        let outcome = index(&mut store, &root_set, &ignore, &cancel, &[root.clone()], |_| {}).unwrap();

        assert_eq!(outcome.indexed_paths.len(), 1);
        assert!(store.contains(&root));
        assert_eq!(store.get(&root).unwrap().child_count, 1);
    }

    #[test]
    fn cancelled_scan_leaves_store_untouched() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::File::create(dir.path().join("a.txt")).unwrap();

        let mut store = PathStore::new();
        let ignore = no_ignores(dir.path());
        let cancel = CancelToken::new();
        cancel.cancel();
        let root = dir.path().to_string_lossy().to_string();

        let root_set = RootSet::new();
        let result = index(&mut store, &root_set, &ignore, &cancel, &[root], |_| {});
        assert!(result.is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn oversized_file_is_skipped_as_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let big_path = dir.path().join("big.bin");
        let mut f = std::fs::File::create(&big_path).unwrap();
        f.set_len(MAX_FILE_SIZE_BYTES + 1).unwrap();

        let mut store = PathStore::new();
        let ignore = no_ignores(dir.path());
        let cancel = CancelToken::new();
        let root = dir.path().to_string_lossy().to_string();

        let root_set = RootSet::new();
        let outcome = index(&mut store, &root_set, &ignore, &cancel, &[root], |_| {}).unwrap();
        assert!(outcome.indexed_paths.is_empty());
        assert!(matches!(
            outcome.diagnostics.as_slice(),
            [ScanDiagnostic::SkippedLarge(_)]
        ));
    }

    #[test]
    fn file_anchor_materializes_chain_to_existing_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("a")).unwrap();
        std::fs::write(dir.path().join("a").join("x.txt"), "x").unwrap();
        std::fs::create_dir(dir.path().join("b")).unwrap();
        std::fs::write(dir.path().join("b").join("y.txt"), "y").unwrap();
        std::fs::create_dir_all(dir.path().join("proj").join("sub")).unwrap();
        std::fs::write(dir.path().join("proj").join("sub").join("f.txt"), "f").unwrap();

        let mut store = PathStore::new();
        let ignore = no_ignores(dir.path());
        let cancel = CancelToken::new();
        let a = dir.path().join("a").to_string_lossy().to_string();
        let b = dir.path().join("b").to_string_lossy().to_string();

        let mut root_set = RootSet::new();
        index(&mut store, &root_set, &ignore, &cancel, &[a.clone(), b.clone()], |_| {}).unwrap();
        root_set.add_anchor(&a);
        root_set.add_anchor(&b);
        root_set.recompute(&mut store);

        let root = dir.path().to_string_lossy().to_string();
        assert_eq!(root_set.roots(), &[root.clone()]);

        let file_path = normalize_path(
            &dir.path().join("proj").join("sub").join("f.txt").to_string_lossy(),
        );
        index(&mut store, &root_set, &ignore, &cancel, &[file_path.clone()], |_| {}).unwrap();

        let sub_path = normalize_path(&dir.path().join("proj").join("sub").to_string_lossy());
        let proj_path = normalize_path(&dir.path().join("proj").to_string_lossy());

        assert_eq!(
            store.get(&file_path).unwrap().parent_path.as_deref(),
            Some(sub_path.as_str())
        );
        assert_eq!(
            store.get(&sub_path).unwrap().parent_path.as_deref(),
            Some(proj_path.as_str())
        );
        assert_eq!(store.get(&proj_path).unwrap().parent_path.as_deref(), Some(root.as_str()));
        assert!(store.children_of(&sub_path).iter().any(|n| n.path == file_path));
    }
}
