//! Integration tests for the JSON settings store.

use netease_webplayer::services::settings_store::{
    KeyValueStore, SettingsStore, SettingsStoreTrait,
};
use netease_webplayer::types::errors::SettingsError;
use netease_webplayer::types::settings::{ShellSettings, DEFAULT_CAPTURE_INTERVAL_MS};
use serde_json::{json, Value};
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> SettingsStore {
    SettingsStore::new(Some(dir.path().join("settings.json")))
}

#[test]
fn set_value_persists_across_instances() {
    let dir = TempDir::new().unwrap();
    let mut store = store_in(&dir);
    store.set_value("general.close_to_tray", Value::Bool(false)).unwrap();
    store.set_value("playback.capture_interval_ms", json!(2500)).unwrap();

    let reopened = SettingsStore::open(Some(dir.path().join("settings.json")));
    assert!(!reopened.get_settings().general.close_to_tray);
    assert_eq!(reopened.get_settings().playback.capture_interval_ms, 2500);
}

#[test]
fn save_creates_missing_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("settings.json");
    let store = SettingsStore::new(Some(path.clone()));

    store.save().unwrap();

    assert!(path.exists());
}

#[test]
fn partial_file_keeps_defaults_for_missing_fields() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{"general":{"close_to_tray":false}}"#).unwrap();

    let store = SettingsStore::open(Some(path));

    let settings = store.get_settings();
    assert!(!settings.general.close_to_tray);
    assert_eq!(settings.playback.capture_interval_ms, DEFAULT_CAPTURE_INTERVAL_MS);
    assert_eq!(settings.window, ShellSettings::default().window);
}

#[test]
fn open_falls_back_to_defaults_on_malformed_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = SettingsStore::open(Some(path));

    assert_eq!(store.get_settings(), &ShellSettings::default());
}

#[test]
fn reset_restores_defaults_on_disk() {
    let dir = TempDir::new().unwrap();
    let mut store = store_in(&dir);
    store.set_value("window.width", json!(640)).unwrap();

    store.reset().unwrap();

    let mut reopened = store_in(&dir);
    assert_eq!(reopened.load().unwrap(), ShellSettings::default());
}

#[test]
fn key_value_store_reads_and_writes_dot_paths() {
    let dir = TempDir::new().unwrap();
    let mut store = store_in(&dir);

    KeyValueStore::set(&mut store, "window.title", json!("Player")).unwrap();

    assert_eq!(store.get("window.title"), Some(json!("Player")));
    assert_eq!(store.get("window"), Some(json!({"title": "Player", "width": 1200, "height": 800})));
    assert_eq!(store.get("window.title.more"), None);
}

#[test]
fn nested_key_through_scalar_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut store = store_in(&dir);

    let err = store.set_value("window.width.value", json!(1)).unwrap_err();

    assert!(matches!(err, SettingsError::InvalidKey(_)));
}

#[test]
fn mistyped_value_is_rejected_and_not_saved() {
    let dir = TempDir::new().unwrap();
    let mut store = store_in(&dir);

    let err = store.set_value("window.width", json!("wide")).unwrap_err();

    assert!(matches!(err, SettingsError::InvalidValue(_)));
    assert!(!store.get_config_path().exists());
}
