// src-tauri/src/state_overlay.rs
// Per-path selection/expansion/sensitive state, independent of PathStore.

use crate::path_store::PathStore;
use crate::types::{Expansion, OverlayEntry, Selection, Sensitivity};
use crate::utils::normalize_path;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct StateOverlay {
    entries: HashMap<String, OverlayEntry>,
    /// Paths whose backing Node left PathStore, pending one more refresh
    /// cycle before the overlay entry is dropped.
    pending_gc: std::collections::HashSet<String>,
}

impl StateOverlay {
    pub fn new() -> Self {
        StateOverlay::default()
    }

    pub fn get(&self, path: &str) -> OverlayEntry {
        self.entries
            .get(&normalize_path(path))
            .cloned()
            .unwrap_or_default()
    }

    pub fn entry_mut(&mut self, path: &str) -> &mut OverlayEntry {
        let path = normalize_path(path);
        self.pending_gc.remove(&path);
        self.entries.entry(path).or_default()
    }

    pub fn set_selection(&mut self, path: &str, selection: Selection) {
        self.entry_mut(path).selection = selection;
    }

    pub fn set_expansion(&mut self, path: &str, expansion: Expansion, user_initiated: bool) {
        let entry = self.entry_mut(path);
        entry.expansion = expansion;
        if user_initiated {
            entry.explicit_collapse = expansion == Expansion::Collapsed;
        }
    }

    pub fn set_sensitive(&mut self, path: &str, sensitivity: Sensitivity) {
        self.entry_mut(path).sensitive = sensitivity;
    }

    pub fn is_explicitly_collapsed(&self, path: &str) -> bool {
        self.entries
            .get(&normalize_path(path))
            .map(|e| e.explicit_collapse)
            .unwrap_or(false)
    }

    pub fn clear_all_selections(&mut self) {
        for entry in self.entries.values_mut() {
            entry.selection = Selection::Unchecked;
        }
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
        self.pending_gc.clear();
    }

    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Advances overlay garbage collection by one refresh cycle: entries
    /// whose path is absent from `store` and were already pending get
    /// dropped; entries newly absent this cycle get marked pending.
    pub fn reconcile(&mut self, store: &PathStore) {
        let missing: Vec<String> = self
            .entries
            .keys()
            .filter(|p| !store.contains(p))
            .cloned()
            .collect();

        let mut still_pending = std::collections::HashSet::new();
        for path in missing {
            if self.pending_gc.contains(&path) {
                self.entries.remove(&path);
            } else {
                still_pending.insert(path);
            }
        }
        self.pending_gc = still_pending;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Node;

    fn file(path: &str) -> Node {
        Node {
            path: path.to_string(),
            parent_path: None,
            name: path.to_string(),
            is_dir: false,
            size: 1,
            mtime: 1,
            fingerprint: None,
            child_count: 0,
            synthetic: false,
        }
    }

    #[test]
    fn gc_drops_after_one_full_cycle_missing() {
        let mut overlay = StateOverlay::new();
        let mut store = PathStore::new();
        store.upsert(file("/p/a.txt"));
        overlay.set_selection("/p/a.txt", Selection::Checked);

        store.remove("/p/a.txt", false);
        overlay.reconcile(&store);
        assert_eq!(overlay.get("/p/a.txt").selection, Selection::Checked);

        overlay.reconcile(&store);
        assert_eq!(overlay.get("/p/a.txt").selection, Selection::Unchecked);
    }

    #[test]
    fn gc_clears_pending_mark_on_reappearance() {
        let mut overlay = StateOverlay::new();
        let mut store = PathStore::new();
        store.upsert(file("/p/a.txt"));
        overlay.set_selection("/p/a.txt", Selection::Checked);

        store.remove("/p/a.txt", false);
        overlay.reconcile(&store);

        store.upsert(file("/p/a.txt"));
        overlay.entry_mut("/p/a.txt"); // reappearance clears the pending mark
        overlay.reconcile(&store);
        assert_eq!(overlay.get("/p/a.txt").selection, Selection::Checked);
    }

    #[test]
    fn toggle_idempotence_via_selection_flip() {
        let mut overlay = StateOverlay::new();
        overlay.set_selection("/p/a.txt", Selection::Checked);
        overlay.set_selection("/p/a.txt", Selection::Unchecked);
        assert_eq!(overlay.get("/p/a.txt").selection, Selection::Unchecked);
    }
}
