// src-tauri/src/flat_view.rs
// Ordered, lazily-materialized row list for virtualized rendering.

use crate::path_store::PathStore;
use crate::root_set::RootSet;
use crate::state_overlay::StateOverlay;
use crate::types::{Expansion, FlatRow};

/// Produces the flattened `(path, depth)` sequence. With no query, expansion
/// comes from the overlay. With a non-empty query, only nodes whose name
/// contains it (case-insensitive) are shown, together with every ancestor
/// needed to nest them — those ancestors are displayed expanded regardless
/// of overlay state, and the overlay itself is never mutated.
pub fn flatten(
    path_store: &PathStore,
    root_set: &RootSet,
    overlay: &StateOverlay,
    query: Option<&str>,
) -> Vec<FlatRow> {
    let mut roots: Vec<String> = root_set.roots().to_vec();
    roots.sort_by_key(|p| p.to_lowercase());

    let mut rows = Vec::new();
    match query.map(str::trim).filter(|q| !q.is_empty()) {
        None => {
            for root in &roots {
                walk_expanded(path_store, overlay, root, 0, &mut rows);
            }
        }
        Some(q) => {
            let needle = q.to_lowercase();
            for root in &roots {
                walk_filtered(path_store, root, 0, &needle, &mut rows);
            }
        }
    }
    rows
}

fn walk_expanded(path_store: &PathStore, overlay: &StateOverlay, path: &str, depth: usize, rows: &mut Vec<FlatRow>) {
    let Some(node) = path_store.get(path) else { return };
    rows.push(FlatRow {
        path: path.to_string(),
        depth,
    });

    if node.is_dir && overlay.get(path).expansion == Expansion::Expanded {
        for child in path_store.children_of(path) {
            walk_expanded(path_store, overlay, &child.path.clone(), depth + 1, rows);
        }
    }
}

/// Returns true if `path` (or a descendant) matched `needle`, pushing rows
/// for itself and matching descendants when it did.
fn walk_filtered(path_store: &PathStore, path: &str, depth: usize, needle: &str, rows: &mut Vec<FlatRow>) -> bool {
    let Some(node) = path_store.get(path) else { return false };
    let self_matches = node.name.to_lowercase().contains(needle);

    if !node.is_dir {
        if self_matches {
            rows.push(FlatRow {
                path: path.to_string(),
                depth,
            });
        }
        return self_matches;
    }

    let mut child_rows = Vec::new();
    let mut any_child_matches = false;
    for child in path_store.children_of(path) {
        if walk_filtered(path_store, &child.path.clone(), depth + 1, needle, &mut child_rows) {
            any_child_matches = true;
        }
    }

    if self_matches || any_child_matches {
        rows.push(FlatRow {
            path: path.to_string(),
            depth,
        });
        rows.extend(child_rows);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Expansion, Node};

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

    fn scenario_1_store() -> (PathStore, RootSet) {
        let mut store = PathStore::new();
        store.upsert(dir("/p", None));
        store.upsert(dir("/p/t1", Some("/p")));
        store.upsert(file("/p/t1/plan.ts", "/p/t1"));
        store.upsert(dir("/p/t2", Some("/p")));
        store.upsert(file("/p/t2/spec.ts", "/p/t2"));

        let mut roots = RootSet::new();
        roots.add_anchor("/p/t1");
        roots.add_anchor("/p/t2");
        roots.recompute(&mut store);
        (store, roots)
    }

    #[test]
    fn synthetic_parent_coalescing_scenario_1() {
        let (store, roots) = scenario_1_store();
        let mut overlay = StateOverlay::new();
        for p in ["/p", "/p/t1", "/p/t2"] {
            overlay.set_expansion(p, Expansion::Expanded, false);
        }

        let rows = flatten(&store, &roots, &overlay, None);
        let expected = vec![
            ("/p", 0),
            ("/p/t1", 1),
            ("/p/t1/plan.ts", 2),
            ("/p/t2", 1),
            ("/p/t2/spec.ts", 2),
        ];
        let actual: Vec<(&str, usize)> = rows.iter().map(|r| (r.path.as_str(), r.depth)).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn search_filter_scenario_5() {
        let mut store = PathStore::new();
        store.upsert(dir("/src", None));
        store.upsert(file("/src/app.ts", "/src"));
        store.upsert(file("/src/app.test.ts", "/src"));
        store.upsert(dir("/docs", None));
        store.upsert(file("/docs/readme.md", "/docs"));

        let mut roots = RootSet::new();
        roots.add_anchor("/src");
        roots.add_anchor("/docs");
        roots.recompute(&mut store);

        // overlay has no expansion set; filtered mode must show src expanded anyway.
        let overlay = StateOverlay::new();
        let rows = flatten(&store, &roots, &overlay, Some("app"));
        let actual: Vec<(&str, usize)> = rows.iter().map(|r| (r.path.as_str(), r.depth)).collect();
        assert_eq!(
            actual,
            vec![("/src", 0), ("/src/app.test.ts", 1), ("/src/app.ts", 1)]
        );
    }

    #[test]
    fn filtering_does_not_mutate_overlay() {
        let (store, roots) = scenario_1_store();
        let mut overlay = StateOverlay::new();
        overlay.set_expansion("/p", Expansion::Collapsed, true);

        flatten(&store, &roots, &overlay, Some("plan"));
        assert_eq!(overlay.get("/p").expansion, Expansion::Collapsed);
    }
}
