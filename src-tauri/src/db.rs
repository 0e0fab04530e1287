// src-tauri/src/db.rs
// SQLite-backed settings persistence, stored next to the executable.

use rusqlite::Connection;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tauri::AppHandle;
use tracing::info;

pub struct AppState {
    pub conn: Arc<Mutex<Connection>>,
}

fn get_db_path(_app_handle: &AppHandle) -> Result<PathBuf, String> {
    let exe_path = env::current_exe()
        .map_err(|e| format!("failed to get current executable path: {}", e))?;

    let exe_dir = exe_path
        .parent()
        .ok_or_else(|| format!("failed to get parent directory of executable: {}", exe_path.display()))?;

    if !exe_dir.exists() {
        fs::create_dir_all(exe_dir)
            .map_err(|e| format!("failed to create directory for database '{}': {}", exe_dir.display(), e))?;
    }

    Ok(exe_dir.join("code_context_builder.db"))
}

pub fn init_connection(app_handle: &AppHandle) -> Result<Connection, String> {
    let db_path = get_db_path(app_handle)?;
    info!(path = %db_path.display(), "opening settings database");
    Connection::open(&db_path).map_err(|e| format!("failed to open database at '{}': {}", db_path.display(), e))
}

/// Single key/value table backing `settings::Settings`. Each
/// field is stored as its own JSON-encoded value, keyed by name — the same
/// generic key/value shape this app's settings storage has always used.
pub fn init_db_tables(conn: &Connection) -> Result<(), String> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS app_settings (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL
        );
        "#,
    )
    .map_err(|e| format!("failed to initialize database tables: {}", e))?;
    info!("settings table ready");
    Ok(())
}
