// src-tauri/src/tree_model.rs
// Pure derived view over PathStore + RootSet. Owns no state.

use crate::path_store::PathStore;
use crate::root_set::RootSet;
use crate::types::Node;
use crate::utils::normalize_path;

/// Children of `parent_path`, or the RootSet roots when `parent_path` is `None`.
pub fn children(path_store: &PathStore, root_set: &RootSet, parent_path: Option<&str>) -> Vec<Node> {
    match parent_path {
        Some(p) => path_store
            .children_of(p)
            .into_iter()
            .cloned()
            .collect(),
        None => {
            let mut roots: Vec<&Node> = root_set
                .roots()
                .iter()
                .filter_map(|r| path_store.get(r))
                .collect();
            roots.sort_by_key(|n| n.path.to_lowercase());
            roots.into_iter().cloned().collect()
        }
    }
}

pub fn tree_roots(path_store: &PathStore, root_set: &RootSet) -> Vec<Node> {
    children(path_store, root_set, None)
}

pub fn is_synthetic(path_store: &PathStore, path: &str) -> bool {
    path_store
        .get(&normalize_path(path))
        .map(|n| n.synthetic)
        .unwrap_or(false)
}
