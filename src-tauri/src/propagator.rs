// src-tauri/src/propagator.rs
// Selection propagation (tristate) and auto-expansion laws.

use crate::path_store::PathStore;
use crate::settings::Settings;
use crate::state_overlay::StateOverlay;
use crate::types::{Expansion, Selection, Sensitivity};
use crate::utils::normalize_path;

/// Walks `path_store` bottom-up from `dir_path`, returning whether the
/// subtree has any descendant file, and whether all of them are checked /
/// unchecked respectively.
fn scan_subtree(path_store: &PathStore, overlay: &StateOverlay, dir_path: &str) -> (bool, bool, bool) {
    let mut has_file = false;
    let mut all_checked = true;
    let mut all_unchecked = true;

    for child in path_store.children_of(dir_path) {
        if child.is_dir {
            let (cf, cac, cau) = scan_subtree(path_store, overlay, &child.path);
            if cf {
                has_file = true;
                all_checked &= cac;
                all_unchecked &= cau;
            }
        } else {
            has_file = true;
            match overlay.get(&child.path).selection {
                Selection::Checked => all_unchecked = false,
                Selection::Unchecked => all_checked = false,
                Selection::Indeterminate => unreachable!("files never carry indeterminate selection"),
            }
        }
    }

    (has_file, all_checked, all_unchecked)
}

fn aggregate_selection(path_store: &PathStore, overlay: &StateOverlay, dir_path: &str) -> Selection {
    let (has_file, all_checked, all_unchecked) = scan_subtree(path_store, overlay, dir_path);
    if !has_file {
        Selection::Unchecked
    } else if all_checked {
        Selection::Checked
    } else if all_unchecked {
        Selection::Unchecked
    } else {
        Selection::Indeterminate
    }
}

/// Recomputes and persists the selection of a single directory from its
/// descendants (invariant 5), without descending into subdirectories.
pub fn recompute_directory(path_store: &PathStore, overlay: &mut StateOverlay, dir_path: &str) {
    let sel = aggregate_selection(path_store, overlay, dir_path);
    overlay.set_selection(dir_path, sel);
}

/// Recomputes every directory in the subtree rooted at `dir_path`, post-order,
/// so each directory's persisted selection reflects invariant 5.
pub fn recompute_subtree(path_store: &PathStore, overlay: &mut StateOverlay, dir_path: &str) {
    let child_dirs: Vec<String> = path_store
        .children_of(dir_path)
        .into_iter()
        .filter(|c| c.is_dir)
        .map(|c| c.path.clone())
        .collect();
    for child in child_dirs {
        recompute_subtree(path_store, overlay, &child);
    }
    recompute_directory(path_store, overlay, dir_path);
}

/// Recomputes `start_dir` and every ancestor up to the root, in order.
pub fn propagate_up(path_store: &PathStore, overlay: &mut StateOverlay, start_dir: &str) {
    let mut current = Some(start_dir.to_string());
    while let Some(dir) = current {
        recompute_directory(path_store, overlay, &dir);
        current = path_store.get(&dir).and_then(|n| n.parent_path.clone());
    }
}

/// Applies `toggle_selection(path)` and propagates to fixpoint.
pub fn toggle_selection(
    path_store: &PathStore,
    overlay: &mut StateOverlay,
    settings: &Settings,
    path: &str,
) {
    let path = normalize_path(path);
    let Some(node) = path_store.get(&path) else {
        return;
    };

    if node.is_dir {
        toggle_directory(path_store, overlay, settings, &path);
    } else {
        toggle_file(path_store, overlay, settings, &path);
    }
}

fn toggle_file(path_store: &PathStore, overlay: &mut StateOverlay, settings: &Settings, path: &str) {
    let entry = overlay.get(path);
    if settings.prevent_selection_enabled && entry.sensitive == Sensitivity::Marked {
        return; // invariant 6: not eligible for selection
    }

    let new_sel = match entry.selection {
        Selection::Checked => Selection::Unchecked,
        _ => Selection::Checked,
    };
    overlay.set_selection(path, new_sel);

    if let Some(parent) = path_store.get(path).and_then(|n| n.parent_path.clone()) {
        propagate_up(path_store, overlay, &parent);
    }
}

fn toggle_directory(path_store: &PathStore, overlay: &mut StateOverlay, settings: &Settings, path: &str) {
    recompute_directory(path_store, overlay, path);
    let current = overlay.get(path).selection;
    let target = if current == Selection::Checked {
        Selection::Unchecked
    } else {
        Selection::Checked
    };

    for file in path_store.descendant_files(path) {
        if target == Selection::Checked
            && settings.prevent_selection_enabled
            && overlay.get(&file.path).sensitive == Sensitivity::Marked
        {
            continue; // excluded from auto-check; stays unchecked
        }
        overlay.set_selection(&file.path, target);
    }

    recompute_subtree(path_store, overlay, path);
    if let Some(parent) = path_store.get(path).and_then(|n| n.parent_path.clone()) {
        propagate_up(path_store, overlay, &parent);
    }
}

/// Sets expansion, honoring user-initiated explicit-collapse stickiness.
pub fn set_expansion(overlay: &mut StateOverlay, path: &str, expanded: bool) {
    let expansion = if expanded {
        Expansion::Expanded
    } else {
        Expansion::Collapsed
    };
    overlay.set_expansion(path, expansion, true);
}

/// Auto-expands every directory from `leaf_dir` up to and including `stop_at`,
/// unless the user has explicitly collapsed it this session.
fn auto_expand_chain(path_store: &PathStore, overlay: &mut StateOverlay, leaf_dir: &str, stop_at: &str) {
    let mut current = Some(leaf_dir.to_string());
    loop {
        let Some(dir) = current else { break };
        if !overlay.is_explicitly_collapsed(&dir) {
            overlay.set_expansion(&dir, Expansion::Expanded, false);
        }
        if dir == stop_at {
            break;
        }
        current = path_store.get(&dir).and_then(|n| n.parent_path.clone());
    }
}

/// Scan-complete expansion law: auto-expand every directory from `scan_root`
/// down to each newly discovered file's parent chain.
pub fn expand_on_scan_complete(
    path_store: &PathStore,
    overlay: &mut StateOverlay,
    scan_root: &str,
    new_file_paths: &[String],
) {
    for file_path in new_file_paths {
        if let Some(parent) = path_store.get(file_path).and_then(|n| n.parent_path.clone()) {
            auto_expand_chain(path_store, overlay, &parent, scan_root);
        }
    }
}

/// Root-shift preservation law: when `new_roots` admits an ancestor of a
/// path in `old_roots`, auto-expand the newly introduced directories on the
/// path down to the previously visible root; new siblings default collapsed.
pub fn on_root_shift(path_store: &PathStore, overlay: &mut StateOverlay, old_roots: &[String], new_roots: &[String]) {
    for new_root in new_roots {
        if old_roots.contains(new_root) {
            continue;
        }
        for old_root in old_roots {
            if crate::utils::is_proper_ancestor(new_root, old_root) {
                auto_expand_chain(path_store, overlay, old_root, new_root);
            }
        }
    }
}

/// Checked-ancestor expansion law: every directory with >=1 checked
/// descendant file is expanded, unless explicitly collapsed.
pub fn expand_checked_ancestors(path_store: &PathStore, overlay: &mut StateOverlay) {
    let checked_files: Vec<String> = path_store
        .all_nodes()
        .filter(|n| !n.is_dir && overlay.get(&n.path).selection == Selection::Checked)
        .map(|n| n.path.clone())
        .collect();

    for file_path in checked_files {
        if let Some(parent) = path_store.get(&file_path).and_then(|n| n.parent_path.clone()) {
            let mut current = Some(parent);
            while let Some(dir) = current {
                if !overlay.is_explicitly_collapsed(&dir) {
                    overlay.set_expansion(&dir, Expansion::Expanded, false);
                }
                current = path_store.get(&dir).and_then(|n| n.parent_path.clone());
            }
        }
    }
}

/// Runs every propagation law to fixpoint after a committed mutation.
/// Selection propagation is already fixpoint-exact after a single pass
/// (bottom-up aggregation is idempotent); expansion laws are monotonic
/// (only ever add `Expanded`), so a single pass over each is sufficient.
pub fn run_to_fixpoint(
    path_store: &PathStore,
    overlay: &mut StateOverlay,
    scan_context: Option<(&str, &[String])>,
    root_shift: Option<(&[String], &[String])>,
) {
    if let Some((scan_root, new_files)) = scan_context {
        expand_on_scan_complete(path_store, overlay, scan_root, new_files);
    }
    if let Some((old_roots, new_roots)) = root_shift {
        on_root_shift(path_store, overlay, old_roots, new_roots);
    }
    expand_checked_ancestors(path_store, overlay);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Node;

    fn dir(path: &str, parent: Option<&str>) -> Node {
        Node {
            path: path.to_string(),
            parent_path: parent.map(String::from),
            name: crate::utils::name_of(path),
            is_dir: true,
            size: 0,
            mtime: 0,
            fingerprint: None,
            child_count: 0,
            synthetic: false,
        }
    }

    fn file(path: &str, parent: &str) -> Node {
        Node {
            path: path.to_string(),
            parent_path: Some(parent.to_string()),
            name: crate::utils::name_of(path),
            is_dir: false,
            size: 1,
            mtime: 1,
            fingerprint: Some("x".into()),
            child_count: 0,
            synthetic: false,
        }
    }

    fn sample_store() -> PathStore {
        let mut store = PathStore::new();
        store.upsert(dir("/p", None));
        store.upsert(file("/p/a.txt", "/p"));
        store.upsert(file("/p/b.txt", "/p"));
        store.upsert(file("/p/c.txt", "/p"));
        store
    }

    #[test]
    fn tristate_propagation_scenario_3() {
        let store = sample_store();
        let settings = Settings::default();
        let mut overlay = StateOverlay::new();

        toggle_selection(&store, &mut overlay, &settings, "/p/b.txt");
        assert_eq!(overlay.get("/p").selection, Selection::Indeterminate);

        toggle_selection(&store, &mut overlay, &settings, "/p/a.txt");
        toggle_selection(&store, &mut overlay, &settings, "/p/c.txt");
        assert_eq!(overlay.get("/p").selection, Selection::Checked);

        toggle_selection(&store, &mut overlay, &settings, "/p");
        assert_eq!(overlay.get("/p/a.txt").selection, Selection::Unchecked);
        assert_eq!(overlay.get("/p/b.txt").selection, Selection::Unchecked);
        assert_eq!(overlay.get("/p/c.txt").selection, Selection::Unchecked);
        assert_eq!(overlay.get("/p").selection, Selection::Unchecked);
    }

    #[test]
    fn toggle_toggle_is_identity_for_files() {
        let store = sample_store();
        let settings = Settings::default();
        let mut overlay = StateOverlay::new();

        toggle_selection(&store, &mut overlay, &settings, "/p/a.txt");
        toggle_selection(&store, &mut overlay, &settings, "/p/a.txt");
        assert_eq!(overlay.get("/p/a.txt").selection, Selection::Unchecked);
    }

    #[test]
    fn sensitive_prevented_file_excluded_from_directory_check() {
        let store = sample_store();
        let mut settings = Settings::default();
        settings.prevent_selection_enabled = true;
        let mut overlay = StateOverlay::new();
        overlay.set_sensitive("/p/b.txt", Sensitivity::Marked);

        toggle_selection(&store, &mut overlay, &settings, "/p");
        assert_eq!(overlay.get("/p/a.txt").selection, Selection::Checked);
        assert_eq!(overlay.get("/p/c.txt").selection, Selection::Checked);
        assert_eq!(overlay.get("/p/b.txt").selection, Selection::Unchecked);
        assert_eq!(overlay.get("/p").selection, Selection::Indeterminate);
    }

    #[test]
    fn checked_ancestor_expansion_law() {
        let store = sample_store();
        let settings = Settings::default();
        let mut overlay = StateOverlay::new();
        toggle_selection(&store, &mut overlay, &settings, "/p/a.txt");

        expand_checked_ancestors(&store, &mut overlay);
        assert_eq!(overlay.get("/p").expansion, Expansion::Expanded);
    }

    #[test]
    fn explicit_collapse_overrides_checked_ancestor_expansion() {
        let store = sample_store();
        let settings = Settings::default();
        let mut overlay = StateOverlay::new();
        set_expansion(&mut overlay, "/p", false);
        toggle_selection(&store, &mut overlay, &settings, "/p/a.txt");

        expand_checked_ancestors(&store, &mut overlay);
        assert_eq!(overlay.get("/p").expansion, Expansion::Collapsed);
    }
}
