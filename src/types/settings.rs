use serde::{Deserialize, Serialize};

pub const DEFAULT_PLAYER_URL: &str = "https://music.163.com/st/webplayer";
pub const DEFAULT_ALLOWED_HOST: &str = "music.163.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120 Safari/537.36";
pub const DEFAULT_CAPTURE_INTERVAL_MS: u64 = 4000;
pub const DEFAULT_STATE_FILE_NAME: &str = "player_state.json";

/// Top-level shell settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ShellSettings {
    pub general: GeneralSettings,
    pub playback: PlaybackSettings,
    pub window: WindowSettings,
}

/// Player page and close behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneralSettings {
    /// Closing the main window hides it to the tray instead of quitting.
    pub close_to_tray: bool,
    pub player_url: String,
    /// Navigations leaving this host are sent back to `player_url`.
    pub allowed_host: String,
    pub user_agent: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            close_to_tray: true,
            player_url: DEFAULT_PLAYER_URL.to_string(),
            allowed_host: DEFAULT_ALLOWED_HOST.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Snapshot/restore loop settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlaybackSettings {
    pub capture_interval_ms: u64,
    pub state_file_name: String,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            capture_interval_ms: DEFAULT_CAPTURE_INTERVAL_MS,
            state_file_name: DEFAULT_STATE_FILE_NAME.to_string(),
        }
    }
}

/// Main window geometry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "网易云音乐 Web 播放器".to_string(),
            width: 1200,
            height: 800,
        }
    }
}
