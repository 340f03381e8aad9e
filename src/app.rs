//! App core for the player shell.
//!
//! Central struct holding the shell components and managing their lifecycle.

use std::sync::Arc;

use tracing::info;

use crate::media::MediaDispatcher;
use crate::playback::state_file::StateFile;
use crate::playback::sync::PlaybackSync;
use crate::services::settings_store::{KeyValueStore, SettingsStore};
use crate::shell::lifecycle::WindowLifecycle;
use crate::shell::navigation::NavigationGuard;
use crate::types::settings::ShellSettings;

pub struct App {
    pub lifecycle: WindowLifecycle,
    pub dispatcher: Arc<MediaDispatcher>,
    pub playback: PlaybackSync,
    pub navigation: NavigationGuard,
}

impl App {
    /// Creates the app from the on-disk settings, the platform media chain
    /// and the record in the platform data directory.
    pub fn new() -> Self {
        use crate::services::settings_store::SettingsStoreTrait;

        let store = SettingsStore::open(None);
        let settings = store.get_settings().clone();
        let state_file = StateFile::in_data_dir(&settings.playback.state_file_name);

        Self::with_parts(settings, Box::new(store), MediaDispatcher::system(), state_file)
    }

    /// Assembles the app from explicit parts.
    pub fn with_parts(
        settings: ShellSettings,
        store: Box<dyn KeyValueStore>,
        dispatcher: MediaDispatcher,
        state_file: StateFile,
    ) -> Self {
        let navigation = NavigationGuard::new(
            settings.general.player_url.clone(),
            settings.general.allowed_host.clone(),
        );

        Self {
            lifecycle: WindowLifecycle::new(settings, store),
            dispatcher: Arc::new(dispatcher),
            playback: PlaybackSync::new(state_file),
            navigation,
        }
    }

    pub fn settings(&self) -> &ShellSettings {
        self.lifecycle.settings()
    }

    pub fn startup(&self) {
        info!(
            player_url = %self.navigation.player_url(),
            state_file = %self.playback.state_file().path().display(),
            backends = ?self.dispatcher.backend_names(),
            "player shell starting"
        );
    }

    /// Stops the restore loop from accepting late replies and persists
    /// settings. The capture timer is owned by the UI layer and stopped there.
    pub fn shutdown(&mut self) {
        self.playback.shutdown();
        self.lifecycle.shutdown();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
