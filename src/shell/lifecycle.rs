//! Main window lifecycle: what closing the window and clicking the tray do.

use serde_json::Value;
use tracing::{info, warn};

use crate::services::settings_store::KeyValueStore;
use crate::types::settings::ShellSettings;

const CLOSE_TO_TRAY_KEY: &str = "general.close_to_tray";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseAction {
    HideToTray,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayToggle {
    Show,
    Hide,
}

/// Owns the shell settings and decides window-level behaviour.
///
/// The settings are injected at construction; changes go back out through
/// the key-value store.
pub struct WindowLifecycle {
    settings: ShellSettings,
    store: Box<dyn KeyValueStore>,
}

impl WindowLifecycle {
    pub fn new(settings: ShellSettings, store: Box<dyn KeyValueStore>) -> Self {
        Self { settings, store }
    }

    pub fn settings(&self) -> &ShellSettings {
        &self.settings
    }

    pub fn close_to_tray(&self) -> bool {
        self.settings.general.close_to_tray
    }

    /// Changes the close behaviour and persists it immediately.
    pub fn set_close_to_tray(&mut self, close_to_tray: bool) {
        self.settings.general.close_to_tray = close_to_tray;
        self.persist();
    }

    /// Hides to the tray when configured to, otherwise saves and exits.
    pub fn on_close_requested(&mut self) -> CloseAction {
        if self.close_to_tray() {
            CloseAction::HideToTray
        } else {
            self.persist();
            CloseAction::Exit
        }
    }

    /// A hidden or minimised window is brought back; a visible one is hidden.
    pub fn on_tray_activated(&self, visible: bool, minimized: bool) -> TrayToggle {
        if !visible || minimized {
            TrayToggle::Show
        } else {
            TrayToggle::Hide
        }
    }

    pub fn shutdown(&mut self) {
        self.persist();
        info!("window lifecycle shut down");
    }

    fn persist(&mut self) {
        let value = Value::Bool(self.settings.general.close_to_tray);
        if let Err(e) = self.store.set(CLOSE_TO_TRAY_KEY, value) {
            warn!(error = %e, "failed to persist close behaviour");
        }
    }
}
