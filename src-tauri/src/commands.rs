// src-tauri/src/commands.rs
// Thin Tauri command wrappers over Engine.

use crate::app_settings;
use crate::db::AppState;
use crate::error::ScanDiagnostic;
use crate::engine::Engine;
use crate::types::{BuildPromptRequest, BuildPromptResponse, FlatRow, Node, OverlayEntry, Pattern, ScanFileResult};
use std::sync::{Arc, Mutex};
use tauri::{command, Emitter, State, Window};

pub struct EngineState(pub Arc<Mutex<Engine>>);

fn persist_settings(app_state: &State<AppState>, engine: &Engine) {
    let conn = match app_state.conn.lock() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "settings DB lock poisoned, skipping persist");
            return;
        }
    };
    if let Err(e) = app_settings::save_settings(&conn, engine.settings()) {
        tracing::warn!(error = %e, "failed to persist settings");
    }
}

fn notify_tree_changed(window: &Window) {
    let _ = window.emit("refresh-file-tree", ());
}

fn notify_sensitive_settings_changed(window: &Window) {
    let _ = window.emit("sensitive-settings-changed", ());
}

#[command(async)]
pub async fn index(
    window: Window,
    state: State<'_, EngineState>,
    paths: Vec<String>,
) -> Result<Vec<ScanDiagnostic>, String> {
    let engine_arc = state.0.clone();
    let window_clone = window.clone();

    let result = tauri::async_runtime::spawn_blocking(move || {
        let mut engine = engine_arc.lock().map_err(|e| e.to_string())?;
        engine.index(paths, |progress| {
            let _ = window_clone.emit("indexing-progress", progress);
        }).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| format!("indexing task panicked: {}", e))?;

    if result.is_ok() {
        notify_tree_changed(&window);
    }
    result
}

#[command]
pub fn cancel_scan(state: State<'_, EngineState>) -> Result<(), String> {
    let engine = state.0.lock().map_err(|e| e.to_string())?;
    engine.request_cancel();
    Ok(())
}

#[command]
pub fn clear_index(window: Window, state: State<'_, EngineState>) -> Result<(), String> {
    let mut engine = state.0.lock().map_err(|e| e.to_string())?;
    engine.clear_index();
    drop(engine);
    notify_tree_changed(&window);
    Ok(())
}

#[command]
pub fn clear_context(window: Window, state: State<'_, EngineState>) -> Result<(), String> {
    let mut engine = state.0.lock().map_err(|e| e.to_string())?;
    engine.clear_context();
    drop(engine);
    notify_tree_changed(&window);
    Ok(())
}

#[command]
pub fn toggle_selection(window: Window, state: State<'_, EngineState>, path: String) -> Result<(), String> {
    let mut engine = state.0.lock().map_err(|e| e.to_string())?;
    engine.toggle_selection(&path);
    drop(engine);
    notify_tree_changed(&window);
    Ok(())
}

#[command]
pub fn set_expansion(window: Window, state: State<'_, EngineState>, path: String, expanded: bool) -> Result<(), String> {
    let mut engine = state.0.lock().map_err(|e| e.to_string())?;
    engine.set_expansion(&path, expanded);
    drop(engine);
    notify_tree_changed(&window);
    Ok(())
}

#[command]
pub fn set_sensitive_data_enabled(
    window: Window,
    engine_state: State<'_, EngineState>,
    app_state: State<'_, AppState>,
    enabled: bool,
) -> Result<(), String> {
    let mut engine = engine_state.0.lock().map_err(|e| e.to_string())?;
    engine.set_sensitive_data_enabled(enabled);
    persist_settings(&app_state, &engine);
    drop(engine);
    notify_sensitive_settings_changed(&window);
    Ok(())
}

#[command]
pub fn set_prevent_selection(
    window: Window,
    engine_state: State<'_, EngineState>,
    app_state: State<'_, AppState>,
    enabled: bool,
) -> Result<(), String> {
    let mut engine = engine_state.0.lock().map_err(|e| e.to_string())?;
    engine.set_prevent_selection_enabled(enabled);
    persist_settings(&app_state, &engine);
    drop(engine);
    notify_sensitive_settings_changed(&window);
    Ok(())
}

#[command]
pub fn set_builtin_pattern_enabled(
    window: Window,
    engine_state: State<'_, EngineState>,
    app_state: State<'_, AppState>,
    pattern_id: String,
    enabled: bool,
) -> Result<(), String> {
    let mut engine = engine_state.0.lock().map_err(|e| e.to_string())?;
    engine.set_builtin_pattern_enabled(&pattern_id, enabled);
    persist_settings(&app_state, &engine);
    drop(engine);
    notify_sensitive_settings_changed(&window);
    Ok(())
}

#[command]
pub fn add_custom_pattern(
    window: Window,
    engine_state: State<'_, EngineState>,
    app_state: State<'_, AppState>,
    pattern: Pattern,
) -> Result<(), String> {
    let mut engine = engine_state.0.lock().map_err(|e| e.to_string())?;
    engine.add_custom_pattern(pattern).map_err(|e| e.to_string())?;
    persist_settings(&app_state, &engine);
    drop(engine);
    notify_sensitive_settings_changed(&window);
    Ok(())
}

#[command]
pub fn update_custom_pattern(
    window: Window,
    engine_state: State<'_, EngineState>,
    app_state: State<'_, AppState>,
    id: String,
    fields: Pattern,
) -> Result<(), String> {
    let mut engine = engine_state.0.lock().map_err(|e| e.to_string())?;
    engine.update_custom_pattern(&id, fields).map_err(|e| e.to_string())?;
    persist_settings(&app_state, &engine);
    drop(engine);
    notify_sensitive_settings_changed(&window);
    Ok(())
}

#[command]
pub fn delete_custom_pattern(
    window: Window,
    engine_state: State<'_, EngineState>,
    app_state: State<'_, AppState>,
    pattern_id: String,
) -> Result<(), String> {
    let mut engine = engine_state.0.lock().map_err(|e| e.to_string())?;
    engine.delete_custom_pattern(&pattern_id);
    persist_settings(&app_state, &engine);
    drop(engine);
    notify_sensitive_settings_changed(&window);
    Ok(())
}

#[command]
pub fn get_sensitive_patterns(state: State<'_, EngineState>) -> Result<Vec<Pattern>, String> {
    let engine = state.0.lock().map_err(|e| e.to_string())?;
    Ok(engine.get_sensitive_patterns())
}

#[command]
pub fn get_tree_roots(state: State<'_, EngineState>) -> Result<Vec<Node>, String> {
    let engine = state.0.lock().map_err(|e| e.to_string())?;
    Ok(engine.get_tree_roots())
}

#[command]
pub fn get_children(state: State<'_, EngineState>, parent_path: Option<String>) -> Result<Vec<Node>, String> {
    let engine = state.0.lock().map_err(|e| e.to_string())?;
    Ok(engine.get_children(parent_path.as_deref()))
}

#[command]
pub fn get_flat_rows(state: State<'_, EngineState>, query: Option<String>) -> Result<Vec<FlatRow>, String> {
    let engine = state.0.lock().map_err(|e| e.to_string())?;
    Ok(engine.get_flat_rows(query.as_deref()))
}

#[command]
pub fn get_overlay_entry(state: State<'_, EngineState>, path: String) -> Result<OverlayEntry, String> {
    let engine = state.0.lock().map_err(|e| e.to_string())?;
    Ok(engine.overlay_entry(&path))
}

#[command]
pub fn get_sensitive_marked_paths(state: State<'_, EngineState>, paths: Vec<String>) -> Result<Vec<String>, String> {
    let engine = state.0.lock().map_err(|e| e.to_string())?;
    Ok(engine.get_sensitive_marked_paths(&paths))
}

#[command]
pub fn scan_sensitive_content(state: State<'_, EngineState>, path: String) -> Result<ScanFileResult, String> {
    let mut engine = state.0.lock().map_err(|e| e.to_string())?;
    engine.scan_sensitive_content(&path).map_err(|e| e.to_string())
}

#[command(async)]
pub async fn build_prompt_from_files(
    state: State<'_, EngineState>,
    request: BuildPromptRequest,
) -> Result<BuildPromptResponse, String> {
    let engine_arc = state.0.clone();
    tauri::async_runtime::spawn_blocking(move || {
        let engine = engine_arc.lock().map_err(|e| e.to_string())?;
        engine.build_prompt(&request).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| format!("build_prompt task panicked: {}", e))?
}
