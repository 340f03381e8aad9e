//! Window lifecycle: close behaviour, tray toggling and persistence.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use netease_webplayer::services::settings_store::KeyValueStore;
use netease_webplayer::shell::lifecycle::{CloseAction, TrayToggle, WindowLifecycle};
use netease_webplayer::types::errors::SettingsError;
use netease_webplayer::types::settings::ShellSettings;
use rstest::rstest;
use serde_json::Value;

/// In-memory store whose contents stay observable after it is boxed.
#[derive(Clone, Default)]
struct MemoryStore {
    values: Arc<Mutex<HashMap<String, Value>>>,
    writes: Arc<Mutex<usize>>,
    fail: bool,
}

impl MemoryStore {
    fn value(&self, key: &str) -> Option<Value> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.value(key)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        if self.fail {
            return Err(SettingsError::IoError("read-only".to_string()));
        }
        *self.writes.lock().unwrap() += 1;
        self.values.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }
}

fn lifecycle(close_to_tray: bool, store: &MemoryStore) -> WindowLifecycle {
    let mut settings = ShellSettings::default();
    settings.general.close_to_tray = close_to_tray;
    WindowLifecycle::new(settings, Box::new(store.clone()))
}

#[test]
fn close_hides_to_tray_by_default() {
    let store = MemoryStore::default();
    let mut lc = WindowLifecycle::new(ShellSettings::default(), Box::new(store.clone()));

    assert_eq!(lc.on_close_requested(), CloseAction::HideToTray);
    assert_eq!(store.writes(), 0);
}

#[test]
fn close_exits_and_persists_when_tray_disabled() {
    let store = MemoryStore::default();
    let mut lc = lifecycle(false, &store);

    assert_eq!(lc.on_close_requested(), CloseAction::Exit);
    assert_eq!(store.value("general.close_to_tray"), Some(Value::Bool(false)));
}

#[test]
fn changing_close_behaviour_takes_effect_and_persists() {
    let store = MemoryStore::default();
    let mut lc = lifecycle(true, &store);

    lc.set_close_to_tray(false);

    assert!(!lc.close_to_tray());
    assert!(!lc.settings().general.close_to_tray);
    assert_eq!(store.value("general.close_to_tray"), Some(Value::Bool(false)));
    assert_eq!(lc.on_close_requested(), CloseAction::Exit);
}

#[test]
fn store_failure_does_not_block_exit() {
    let store = MemoryStore { fail: true, ..MemoryStore::default() };
    let mut lc = lifecycle(false, &store);

    assert_eq!(lc.on_close_requested(), CloseAction::Exit);
}

#[test]
fn shutdown_persists_close_behaviour() {
    let store = MemoryStore::default();
    let mut lc = lifecycle(true, &store);

    lc.shutdown();

    assert_eq!(store.value("general.close_to_tray"), Some(Value::Bool(true)));
}

#[rstest]
#[case(false, false, TrayToggle::Show)]
#[case(false, true, TrayToggle::Show)]
#[case(true, true, TrayToggle::Show)]
#[case(true, false, TrayToggle::Hide)]
fn tray_activation_toggles_window(
    #[case] visible: bool,
    #[case] minimized: bool,
    #[case] expected: TrayToggle,
) {
    let lc = lifecycle(true, &MemoryStore::default());
    assert_eq!(lc.on_tray_activated(visible, minimized), expected);
}
