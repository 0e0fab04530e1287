// src-tauri/src/app_settings.rs
// Loads and saves the single `Settings` value against the `app_settings`
// key/value table.

use crate::settings::Settings;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use tracing::warn;

const KEY_SENSITIVE_ENABLED: &str = "sensitive_data_enabled";
const KEY_PREVENT_SELECTION: &str = "sensitive_prevent_selection";
const KEY_CUSTOM_PATTERNS: &str = "sensitive_custom_patterns";
const KEY_BUILTIN_OVERRIDES: &str = "sensitive_builtin_overrides";
const KEY_IGNORE_PATTERNS: &str = "ignore_patterns";

fn get_raw(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM app_settings WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
}

fn set_raw(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO app_settings (key, value) VALUES (?1, ?2)",
        params![key, value],
    )?;
    Ok(())
}

fn load_json<T: serde::de::DeserializeOwned + Default>(conn: &Connection, key: &str) -> T {
    match get_raw(conn, key) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(key, error = %e, "failed to parse stored setting, using default");
            T::default()
        }),
        Ok(None) => T::default(),
        Err(e) => {
            warn!(key, error = %e, "failed to read stored setting, using default");
            T::default()
        }
    }
}

/// Reads every stored field into a `Settings` value, falling back to
/// defaults for anything missing or unparsable.
pub fn load_settings(conn: &Connection) -> Settings {
    let sensitive_data_enabled = load_json(conn, KEY_SENSITIVE_ENABLED);
    let prevent_selection_enabled = load_json(conn, KEY_PREVENT_SELECTION);
    let custom_patterns = load_json(conn, KEY_CUSTOM_PATTERNS);
    let builtin_overrides: HashMap<String, bool> = load_json(conn, KEY_BUILTIN_OVERRIDES);
    let ignore_patterns = load_json(conn, KEY_IGNORE_PATTERNS);

    Settings {
        sensitive_data_enabled,
        prevent_selection_enabled,
        custom_patterns,
        builtin_overrides,
        ignore_patterns,
    }
}

/// Persists every field of `settings`, one row per field.
pub fn save_settings(conn: &Connection, settings: &Settings) -> Result<(), String> {
    set_raw(
        conn,
        KEY_SENSITIVE_ENABLED,
        &serde_json::to_string(&settings.sensitive_data_enabled).unwrap(),
    )
    .map_err(|e| e.to_string())?;
    set_raw(
        conn,
        KEY_PREVENT_SELECTION,
        &serde_json::to_string(&settings.prevent_selection_enabled).unwrap(),
    )
    .map_err(|e| e.to_string())?;
    set_raw(
        conn,
        KEY_CUSTOM_PATTERNS,
        &serde_json::to_string(&settings.custom_patterns).unwrap(),
    )
    .map_err(|e| e.to_string())?;
    set_raw(
        conn,
        KEY_BUILTIN_OVERRIDES,
        &serde_json::to_string(&settings.builtin_overrides).unwrap(),
    )
    .map_err(|e| e.to_string())?;
    set_raw(
        conn,
        KEY_IGNORE_PATTERNS,
        &serde_json::to_string(&settings.ignore_patterns).unwrap(),
    )
    .map_err(|e| e.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Pattern;

    fn memory_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_db_tables(&conn).unwrap();
        conn
    }

    #[test]
    fn missing_settings_round_trip_to_defaults() {
        let conn = memory_conn();
        let settings = load_settings(&conn);
        assert!(!settings.sensitive_data_enabled);
        assert!(settings.custom_patterns.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let conn = memory_conn();
        let mut settings = Settings::default();
        settings.sensitive_data_enabled = true;
        settings.custom_patterns.push(Pattern {
            id: "x".into(),
            name: "x".into(),
            regex: "x".into(),
            placeholder: "[X]".into(),
            enabled: true,
            builtin: false,
        });

        save_settings(&conn, &settings).unwrap();
        let reloaded = load_settings(&conn);
        assert!(reloaded.sensitive_data_enabled);
        assert_eq!(reloaded.custom_patterns.len(), 1);
    }
}
