// src-tauri/src/path_store.rs
// Content-addressed, single-writer store of indexed Nodes keyed by normalized path.

use crate::types::Node;
use crate::utils::{is_ancestor_or_self, normalize_path, parent_of};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct PathStore {
    nodes: HashMap<String, Node>,
}

impl PathStore {
    pub fn new() -> Self {
        PathStore {
            nodes: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Inserts or overwrites a Node by path, keeping the parent's
    /// `child_count` consistent with invariant 3.
    pub fn upsert(&mut self, mut node: Node) {
        node.path = normalize_path(&node.path);
        if let Some(parent) = &mut node.parent_path {
            *parent = normalize_path(parent);
        }
        let existed = self.nodes.contains_key(&node.path);
        let parent_path = node.parent_path.clone();

        self.nodes.insert(node.path.clone(), node);

        if !existed {
            if let Some(parent) = parent_path {
                self.recount_children(&parent);
            }
        }
    }

    /// Removes the Node at `path`. If `recursive`, also removes every
    /// descendant currently in the store.
    pub fn remove(&mut self, path: &str, recursive: bool) {
        let path = normalize_path(path);
        let parent = self.nodes.get(&path).and_then(|n| n.parent_path.clone());

        if recursive {
            let victims: Vec<String> = self
                .nodes
                .keys()
                .filter(|p| is_ancestor_or_self(&path, p))
                .cloned()
                .collect();
            for v in victims {
                self.nodes.remove(&v);
            }
        } else {
            self.nodes.remove(&path);
        }

        if let Some(parent) = parent {
            self.recount_children(&parent);
        }
    }

    pub fn get(&self, path: &str) -> Option<&Node> {
        self.nodes.get(&normalize_path(path))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.nodes.contains_key(&normalize_path(path))
    }

    pub fn all_paths(&self) -> impl Iterator<Item = &String> {
        self.nodes.keys()
    }

    pub fn all_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Children of `parent_path`, directories first then files, then
    /// case-insensitive lexicographic by name, ties broken by path.
    pub fn children_of(&self, parent_path: &str) -> Vec<&Node> {
        let parent_path = normalize_path(parent_path);
        let mut out: Vec<&Node> = self
            .nodes
            .values()
            .filter(|n| n.parent_path.as_deref() == Some(parent_path.as_str()))
            .collect();
        sort_siblings(&mut out);
        out
    }

    pub fn contains_descendant(&self, ancestor: &str, descendant: &str) -> bool {
        let ancestor = normalize_path(ancestor);
        let descendant = normalize_path(descendant);
        is_ancestor_or_self(&ancestor, &descendant) && self.nodes.contains_key(&descendant)
    }

    /// Every descendant file path under `root` (inclusive search, files only).
    pub fn descendant_files(&self, root: &str) -> Vec<&Node> {
        let root = normalize_path(root);
        self.nodes
            .values()
            .filter(|n| !n.is_dir && is_ancestor_or_self(&root, &n.path))
            .collect()
    }

    pub fn descendant_dirs(&self, root: &str) -> Vec<&Node> {
        let root = normalize_path(root);
        self.nodes
            .values()
            .filter(|n| n.is_dir && is_ancestor_or_self(&root, &n.path))
            .collect()
    }

    fn recount_children(&mut self, parent_path: &str) {
        let count = self
            .nodes
            .values()
            .filter(|n| n.parent_path.as_deref() == Some(parent_path))
            .count();
        if let Some(parent) = self.nodes.get_mut(parent_path) {
            parent.child_count = count;
        }
    }

    /// Ensures a synthetic directory Node exists at `path` (created if absent).
    pub fn ensure_synthetic_dir(&mut self, path: &str) {
        let path = normalize_path(path);
        if self.nodes.contains_key(&path) {
            return;
        }
        let parent_path = parent_of(&path).filter(|p| self.nodes.contains_key(p));
        let name = crate::utils::name_of(&path);
        self.nodes.insert(
            path.clone(),
            Node {
                path: path.clone(),
                parent_path,
                name,
                is_dir: true,
                size: 0,
                mtime: 0,
                fingerprint: None,
                child_count: 0,
                synthetic: true,
            },
        );
    }

    /// Checks invariants 1-3 (path uniqueness is implicit in the map key; we
    /// verify parent existence/kind and child_count here). Returns the first
    /// violation found, if any.
    pub fn check_invariants(&self) -> Option<String> {
        for node in self.nodes.values() {
            if let Some(parent_path) = &node.parent_path {
                match self.nodes.get(parent_path) {
                    None => {
                        return Some(format!(
                            "node '{}' has parent_path '{}' not present in PathStore",
                            node.path, parent_path
                        ))
                    }
                    Some(parent) if !parent.is_dir => {
                        return Some(format!(
                            "node '{}' has parent '{}' that is not a directory",
                            node.path, parent_path
                        ))
                    }
                    _ => {}
                }
            }
            if node.is_dir {
                let actual = self
                    .nodes
                    .values()
                    .filter(|n| n.parent_path.as_deref() == Some(node.path.as_str()))
                    .count();
                if actual != node.child_count {
                    return Some(format!(
                        "directory '{}' child_count {} does not match actual {}",
                        node.path, node.child_count, actual
                    ));
                }
            }
        }
        None
    }
}

fn sort_siblings(nodes: &mut [&Node]) {
    nodes.sort_by(|a, b| match (a.is_dir, b.is_dir) {
        (true, false) => std::cmp::Ordering::Less,
        (false, true) => std::cmp::Ordering::Greater,
        _ => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.path.cmp(&b.path)),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir(path: &str, parent: Option<&str>) -> Node {
        Node {
            path: path.to_string(),
            parent_path: parent.map(|p| p.to_string()),
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
            size: 10,
            mtime: 1,
            fingerprint: Some("x".into()),
            child_count: 0,
            synthetic: false,
        }
    }

    #[test]
    fn child_count_tracks_inserts_and_removes() {
        let mut store = PathStore::new();
        store.upsert(dir("/p", None));
        store.upsert(file("/p/a.txt", "/p"));
        store.upsert(file("/p/b.txt", "/p"));
        assert_eq!(store.get("/p").unwrap().child_count, 2);

        store.remove("/p/a.txt", false);
        assert_eq!(store.get("/p").unwrap().child_count, 1);
    }

    #[test]
    fn children_ordering_dirs_before_files_case_insensitive() {
        let mut store = PathStore::new();
        store.upsert(dir("/p", None));
        store.upsert(file("/p/Zeta.txt", "/p"));
        store.upsert(dir("/p/alpha", Some("/p")));
        store.upsert(file("/p/beta.txt", "/p"));

        let names: Vec<&str> = store
            .children_of("/p")
            .into_iter()
            .map(|n| n.name.as_str())
            .collect();
        assert_eq!(names, vec!["alpha", "beta.txt", "Zeta.txt"]);
    }

    #[test]
    fn recursive_remove_drops_descendants() {
        let mut store = PathStore::new();
        store.upsert(dir("/p", None));
        store.upsert(dir("/p/t1", Some("/p")));
        store.upsert(file("/p/t1/plan.ts", "/p/t1"));

        store.remove("/p", true);
        assert!(store.get("/p").is_none());
        assert!(store.get("/p/t1").is_none());
        assert!(store.get("/p/t1/plan.ts").is_none());
    }

    #[test]
    fn invariant_check_catches_missing_parent() {
        let mut store = PathStore::new();
        store.upsert(file("/p/a.txt", "/p"));
        assert!(store.check_invariants().is_some());
    }
}
