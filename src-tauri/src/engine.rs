// src-tauri/src/engine.rs
// Single-writer command engine: owns PathStore, RootSet, StateOverlay and
// Settings, and sequences every mutation through propagation and overlay GC.

use crate::error::{CoreError, CoreResult, ScanDiagnostic};
use crate::export;
use crate::flat_view;
use crate::ignore_handler::CompiledIgnorePatterns;
use crate::path_store::PathStore;
use crate::propagator;
use crate::redactor;
use crate::root_set::RootSet;
use crate::scan_state::CancelToken;
use crate::scanner;
use crate::settings::Settings;
use crate::state_overlay::StateOverlay;
use crate::tree_model;
use crate::types::{
    BuildPromptRequest, BuildPromptResponse, FlatRow, IndexingProgress, Node, OverlayEntry,
    Pattern, ScanFileResult, Sensitivity,
};
use crate::utils::normalize_path;
use std::path::Path;

pub struct Engine {
    path_store: PathStore,
    root_set: RootSet,
    overlay: StateOverlay,
    settings: Settings,
    model_version: u64,
    cancel: CancelToken,
}

impl Engine {
    pub fn new(settings: Settings) -> Self {
        Engine {
            path_store: PathStore::new(),
            root_set: RootSet::new(),
            overlay: StateOverlay::new(),
            settings,
            model_version: 0,
            cancel: CancelToken::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn model_version(&self) -> u64 {
        self.model_version
    }

    fn bump(&mut self) {
        self.model_version += 1;
    }

    /// Requests cancellation of whatever `index` call is currently running.
    /// A no-op if none is in flight; harmless if it races a completion.
    pub fn request_cancel(&self) {
        self.cancel.cancel();
    }

    /// `index(paths)`. Each path becomes its own anchor.
    /// Runs the scan, recomputes the root set, then applies the
    /// scan-complete and root-shift auto-expansion laws per newly
    /// introduced root.
    pub fn index(
        &mut self,
        input_paths: Vec<String>,
        on_progress: impl FnMut(IndexingProgress),
    ) -> CoreResult<Vec<ScanDiagnostic>> {
        self.cancel = CancelToken::new();
        let ignore = CompiledIgnorePatterns::new(Path::new("/"), &self.settings.ignore_patterns);

        let outcome = scanner::index(
            &mut self.path_store,
            &self.root_set,
            &ignore,
            &self.cancel,
            &input_paths,
            on_progress,
        )?;

        for p in &input_paths {
            self.root_set.add_anchor(p);
        }
        let old_roots = self.root_set.recompute(&mut self.path_store);
        let new_roots = self.root_set.roots().to_vec();

        for root in &new_roots {
            let files_under_root: Vec<String> = outcome
                .indexed_paths
                .iter()
                .filter(|p| self.path_store.contains_descendant(root, p))
                .cloned()
                .collect();
            propagator::expand_on_scan_complete(
                &self.path_store,
                &mut self.overlay,
                root,
                &files_under_root,
            );
        }
        propagator::on_root_shift(&self.path_store, &mut self.overlay, &old_roots, &new_roots);
        propagator::expand_checked_ancestors(&self.path_store, &mut self.overlay);
        self.overlay.reconcile(&self.path_store);
        self.bump();

        Ok(outcome.diagnostics)
    }

    /// `clear_index()`: drops every indexed node, root and
    /// overlay entry. A clean slate, not a GC cycle.
    pub fn clear_index(&mut self) {
        self.path_store = PathStore::new();
        self.root_set.clear();
        self.overlay.clear_all();
        self.bump();
    }

    /// `clear_context()`: unchecks every selection without
    /// touching expansion or sensitivity state.
    pub fn clear_context(&mut self) {
        self.overlay.clear_all_selections();
        self.bump();
    }

    pub fn toggle_selection(&mut self, path: &str) {
        propagator::toggle_selection(&self.path_store, &mut self.overlay, &self.settings, path);
        propagator::expand_checked_ancestors(&self.path_store, &mut self.overlay);
        self.bump();
    }

    pub fn set_expansion(&mut self, path: &str, expanded: bool) {
        propagator::set_expansion(&mut self.overlay, path, expanded);
        propagator::expand_checked_ancestors(&self.path_store, &mut self.overlay);
        self.bump();
    }

    pub fn set_sensitive_data_enabled(&mut self, enabled: bool) {
        self.settings.sensitive_data_enabled = enabled;
        self.bump();
    }

    pub fn set_prevent_selection_enabled(&mut self, enabled: bool) {
        self.settings.prevent_selection_enabled = enabled;
        self.bump();
    }

    pub fn set_builtin_pattern_enabled(&mut self, pattern_id: &str, enabled: bool) {
        self.settings
            .builtin_overrides
            .insert(pattern_id.to_string(), enabled);
        self.rescan_all_sensitivity();
        self.bump();
    }

    pub fn add_custom_pattern(&mut self, pattern: Pattern) -> CoreResult<()> {
        redactor::compile(&pattern)?;
        self.settings.custom_patterns.push(pattern);
        self.rescan_all_sensitivity();
        self.bump();
        Ok(())
    }

    pub fn update_custom_pattern(&mut self, id: &str, mut fields: Pattern) -> CoreResult<()> {
        fields.id = id.to_string();
        redactor::compile(&fields)?;
        let slot = self
            .settings
            .custom_patterns
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;
        *slot = fields;
        self.rescan_all_sensitivity();
        self.bump();
        Ok(())
    }

    pub fn delete_custom_pattern(&mut self, pattern_id: &str) {
        self.settings.custom_patterns.retain(|p| p.id != pattern_id);
        self.rescan_all_sensitivity();
        self.bump();
    }

    /// Re-evaluates sensitivity for every currently indexed file against the
    /// active pattern set. Bounded to one read and one pattern pass per
    /// indexed file; a file that can't be read keeps its previous sensitivity
    /// rather than failing the whole rescan.
    fn rescan_all_sensitivity(&mut self) {
        let patterns = self.settings.ordered_patterns();
        let file_paths: Vec<String> = self
            .path_store
            .all_nodes()
            .filter(|n| !n.is_dir)
            .map(|n| n.path.clone())
            .collect();

        for path in file_paths {
            let Ok(content) = std::fs::read_to_string(&path) else {
                continue;
            };
            let result = redactor::scan_content(&content, &patterns);
            self.overlay.set_sensitive(
                &path,
                if result.marked {
                    Sensitivity::Marked
                } else {
                    Sensitivity::Plain
                },
            );
        }
    }

    pub fn get_sensitive_patterns(&self) -> Vec<Pattern> {
        self.settings.ordered_patterns()
    }

    pub fn get_tree_roots(&self) -> Vec<Node> {
        tree_model::tree_roots(&self.path_store, &self.root_set)
    }

    pub fn get_children(&self, parent_path: Option<&str>) -> Vec<Node> {
        tree_model::children(&self.path_store, &self.root_set, parent_path)
    }

    pub fn get_flat_rows(&self, query: Option<&str>) -> Vec<FlatRow> {
        flat_view::flatten(&self.path_store, &self.root_set, &self.overlay, query)
    }

    pub fn overlay_entry(&self, path: &str) -> OverlayEntry {
        self.overlay.get(path)
    }

    /// Reads `path` off disk, scans it against the active pattern set, and
    /// records the resulting sensitivity in the overlay.
    pub fn scan_sensitive_content(&mut self, path: &str) -> CoreResult<ScanFileResult> {
        let normalized = normalize_path(path);
        let content = std::fs::read_to_string(&normalized).map_err(|e| CoreError::ScanFailed {
            path: normalized.clone(),
            reason: e.to_string(),
        })?;
        let patterns = self.settings.ordered_patterns();
        let result = redactor::scan_content(&content, &patterns);
        self.overlay.set_sensitive(
            &normalized,
            if result.marked {
                Sensitivity::Marked
            } else {
                Sensitivity::Plain
            },
        );
        self.bump();
        Ok(result)
    }

    pub fn get_sensitive_marked_paths(&self, paths: &[String]) -> Vec<String> {
        export::sensitive_marked_paths(&self.overlay, paths)
    }

    pub fn build_prompt(&self, request: &BuildPromptRequest) -> CoreResult<BuildPromptResponse> {
        let prompt = export::build_context(
            &self.path_store,
            &self.overlay,
            &self.settings,
            request.template_id.as_deref(),
            &request.custom_instructions,
            &request.file_paths,
        )?;
        Ok(BuildPromptResponse { prompt })
    }
}
