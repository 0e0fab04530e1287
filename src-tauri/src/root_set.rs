// src-tauri/src/root_set.rs
// Minimal covering set of root anchor paths.

use crate::path_store::PathStore;
use crate::utils::{common_ancestor, is_proper_ancestor, normalize_path};

#[derive(Debug, Default, Clone)]
pub struct RootSet {
    /// Paths the user has explicitly indexed, in first-seen order.
    anchors: Vec<String>,
    /// The computed minimal covering set.
    roots: Vec<String>,
}

impl RootSet {
    pub fn new() -> Self {
        RootSet::default()
    }

    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    pub fn add_anchor(&mut self, path: &str) {
        let path = normalize_path(path);
        if !self.anchors.contains(&path) {
            self.anchors.push(path);
        }
    }

    pub fn remove_anchor(&mut self, path: &str) {
        let path = normalize_path(path);
        self.anchors.retain(|a| a != &path);
    }

    pub fn clear(&mut self) {
        self.anchors.clear();
        self.roots.clear();
    }

    /// Recomputes `roots` from the anchors still present in `store`,
    /// synthesizing any coalesced ancestor directories as needed.
    /// Returns the previous root set, so callers can diff for root-shift
    /// auto-expansion.
    pub fn recompute(&mut self, store: &mut PathStore) -> Vec<String> {
        let previous = self.roots.clone();

        let active: Vec<String> = self
            .anchors
            .iter()
            .filter(|a| store.contains(a))
            .cloned()
            .collect();

        let maximal = remove_subsumed(active);
        let groups = group_by_shared_ancestor(&maximal);

        let mut new_roots = Vec::new();
        for group in groups {
            if group.len() == 1 {
                new_roots.push(group.into_iter().next().unwrap());
                continue;
            }
            let mut iter = group.into_iter();
            let first = iter.next().unwrap();
            let root = iter.fold(Some(first), |acc, next| {
                acc.and_then(|a| common_ancestor(&a, &next))
            });
            match root {
                Some(root) => {
                    store.ensure_synthetic_dir(&root);
                    new_roots.push(root);
                }
                None => {
                    // Defensive: grouping guarantees Some, but never panic on a
                    // missing common ancestor — fall back to treating members
                    // as independent roots rather than losing them.
                }
            }
        }

        new_roots.sort_by_key(|p| p.to_lowercase());
        new_roots.dedup();
        self.roots = new_roots;
        previous
    }

    /// The unique root that is an ancestor of (or equal to) `path`, if any.
    pub fn root_for(&self, path: &str) -> Option<&str> {
        let path = normalize_path(path);
        self.roots
            .iter()
            .find(|r| crate::utils::is_ancestor_or_self(r, &path))
            .map(|s| s.as_str())
    }
}

/// Drops every candidate that has a proper ancestor among the candidates.
fn remove_subsumed(mut candidates: Vec<String>) -> Vec<String> {
    candidates.sort();
    let snapshot = candidates.clone();
    candidates.retain(|c| !snapshot.iter().any(|other| is_proper_ancestor(other, c)));
    candidates
}

/// Union-find grouping of anchors that share any directory segment prefix.
fn group_by_shared_ancestor(anchors: &[String]) -> Vec<Vec<String>> {
    let n = anchors.len();
    let mut parent: Vec<usize> = (0..n).collect();

    fn find(parent: &mut [usize], x: usize) -> usize {
        if parent[x] != x {
            parent[x] = find(parent, parent[x]);
        }
        parent[x]
    }

    for i in 0..n {
        for j in (i + 1)..n {
            if common_ancestor(&anchors[i], &anchors[j]).is_some() {
                let ri = find(&mut parent, i);
                let rj = find(&mut parent, j);
                if ri != rj {
                    parent[ri] = rj;
                }
            }
        }
    }

    let mut groups: std::collections::HashMap<usize, Vec<String>> = std::collections::HashMap::new();
    for i in 0..n {
        let root = find(&mut parent, i);
        groups.entry(root).or_default().push(anchors[i].clone());
    }
    groups.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Node;

    fn dir_node(path: &str, parent: Option<&str>) -> Node {
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

    fn file_node(path: &str, parent: &str) -> Node {
        Node {
            path: path.to_string(),
            parent_path: Some(parent.to_string()),
            name: crate::utils::name_of(path),
            is_dir: false,
            size: 1,
            mtime: 1,
            fingerprint: Some("f".into()),
            child_count: 0,
            synthetic: false,
        }
    }

    #[test]
    fn coalesces_siblings_into_synthetic_root() {
        let mut store = PathStore::new();
        store.upsert(dir_node("/p/t1", None));
        store.upsert(file_node("/p/t1/plan.ts", "/p/t1"));
        store.upsert(dir_node("/p/t2", None));
        store.upsert(file_node("/p/t2/spec.ts", "/p/t2"));

        let mut roots = RootSet::new();
        roots.add_anchor("/p/t1");
        roots.add_anchor("/p/t2");
        roots.recompute(&mut store);

        assert_eq!(roots.roots(), &["/p".to_string()]);
        assert!(store.get("/p").unwrap().synthetic);
    }

    #[test]
    fn disjoint_anchors_remain_separate_roots() {
        let mut store = PathStore::new();
        store.upsert(dir_node("/a", None));
        store.upsert(dir_node("/b", None));

        let mut roots = RootSet::new();
        roots.add_anchor("/a");
        roots.add_anchor("/b");
        roots.recompute(&mut store);

        let mut r = roots.roots().to_vec();
        r.sort();
        assert_eq!(r, vec!["/a".to_string(), "/b".to_string()]);
    }

    #[test]
    fn root_shift_upward_when_ancestor_explicitly_indexed() {
        let mut store = PathStore::new();
        store.upsert(dir_node("/workspace", None));
        store.upsert(dir_node("/workspace/proj", Some("/workspace")));
        store.upsert(dir_node("/workspace/proj/src", Some("/workspace/proj")));
        store.upsert(file_node("/workspace/proj/src/a.ts", "/workspace/proj/src"));
        store.upsert(dir_node("/workspace/proj/docs", Some("/workspace/proj")));
        store.upsert(file_node("/workspace/proj/docs/b.md", "/workspace/proj/docs"));

        let mut roots = RootSet::new();
        roots.add_anchor("/workspace/proj/src/a.ts");
        roots.add_anchor("/workspace/proj/docs/b.md");
        let before = roots.recompute(&mut store);
        assert_eq!(before, Vec::<String>::new());
        assert_eq!(roots.roots(), &["/workspace/proj".to_string()]);

        roots.add_anchor("/workspace");
        let previous = roots.recompute(&mut store);
        assert_eq!(previous, vec!["/workspace/proj".to_string()]);
        assert_eq!(roots.roots(), &["/workspace".to_string()]);
    }
}
