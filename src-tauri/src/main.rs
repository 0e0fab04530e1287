#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

// src-tauri/src/main.rs

mod app_settings;
mod commands;
mod db;
mod engine;
mod error;
mod export;
mod flat_view;
mod ignore_handler;
mod path_store;
mod propagator;
mod redactor;
mod root_set;
mod scan_state;
mod scanner;
mod settings;
mod state_overlay;
mod tree_model;
mod types;
mod utils;

use commands::EngineState;
use db::{init_connection, init_db_tables, AppState};
use engine::Engine;
use std::sync::{Arc, Mutex};
use tauri::Manager;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let context = tauri::generate_context!();

    tauri::Builder::default()
        .setup(|app| {
            let app_handle = app.handle().clone();

            let conn = match init_connection(&app_handle) {
                Ok(c) => c,
                Err(e) => {
                    tracing::error!(error = %e, "DB connection failed during setup");
                    panic!("DB connection failed: {}", e);
                }
            };

            if let Err(e) = init_db_tables(&conn) {
                tracing::error!(error = %e, "DB table init failed during setup");
                panic!("DB table init failed: {}", e);
            }

            let settings = app_settings::load_settings(&conn);
            app.manage(AppState { conn: Arc::new(Mutex::new(conn)) });
            app.manage(EngineState(Arc::new(Mutex::new(Engine::new(settings)))));

            Ok(())
        })
        .plugin(tauri_plugin_dialog::init())
        .invoke_handler(tauri::generate_handler![
            commands::index,
            commands::cancel_scan,
            commands::clear_index,
            commands::clear_context,
            commands::toggle_selection,
            commands::set_expansion,
            commands::set_sensitive_data_enabled,
            commands::set_prevent_selection,
            commands::set_builtin_pattern_enabled,
            commands::add_custom_pattern,
            commands::update_custom_pattern,
            commands::delete_custom_pattern,
            commands::get_sensitive_patterns,
            commands::get_tree_roots,
            commands::get_children,
            commands::get_flat_rows,
            commands::get_overlay_entry,
            commands::get_sensitive_marked_paths,
            commands::scan_sensitive_content,
            commands::build_prompt_from_files,
        ])
        .run(context)
        .expect("error while running tauri application");
}
