//! Synthetic media-key backend.
//!
//! Opens a connection to the display/input server, resolves the hardware
//! media key for the command and injects a key-down/key-up pair. Used only
//! after the session bus backend failed.

use super::MediaBackend;
use crate::types::command::MediaCommand;
use crate::types::errors::DispatchError;

/// Source of input-server connections.
pub trait InputServer: Send + Sync {
    fn open(&self) -> Result<Box<dyn InputConnection>, DispatchError>;
}

/// An open connection able to inject key events.
pub trait InputConnection {
    /// Resolves a keysym to a key code. `0` means the key is not mapped.
    fn key_code(&mut self, keysym: u32) -> u32;

    /// Injects a press immediately followed by a release of `key_code`.
    fn tap(&mut self, key_code: u32) -> Result<(), DispatchError>;
}

/// Media backend that fakes hardware media key presses.
pub struct SyntheticKeyBackend<S: InputServer> {
    server: S,
}

impl<S: InputServer> SyntheticKeyBackend<S> {
    pub fn new(server: S) -> Self {
        Self { server }
    }
}

impl<S: InputServer> MediaBackend for SyntheticKeyBackend<S> {
    fn name(&self) -> &'static str {
        "media-keys"
    }

    fn send(&self, command: MediaCommand) -> Result<(), DispatchError> {
        let mut conn = self.server.open()?;
        let keysym = command.keysym();
        let code = conn.key_code(keysym);
        if code == 0 {
            return Err(DispatchError::KeyUnresolved(format!("{:#x}", keysym)));
        }
        conn.tap(code)
    }
}

#[cfg(target_os = "linux")]
pub use enigo_input::EnigoInputServer;

#[cfg(target_os = "linux")]
mod enigo_input {
    use enigo::{Direction, Enigo, Key, Keyboard, Settings};

    use super::{InputConnection, InputServer};
    use crate::types::errors::DispatchError;

    /// [`InputServer`] backed by `enigo` on X11.
    pub struct EnigoInputServer;

    impl InputServer for EnigoInputServer {
        fn open(&self) -> Result<Box<dyn InputConnection>, DispatchError> {
            let enigo = Enigo::new(&Settings::default())
                .map_err(|e| DispatchError::DisplayUnavailable(e.to_string()))?;
            Ok(Box::new(EnigoConnection { enigo }))
        }
    }

    struct EnigoConnection {
        enigo: Enigo,
    }

    impl InputConnection for EnigoConnection {
        // enigo maps keysyms to key codes itself (remapping a spare code
        // when the keyboard has none), so any non-zero keysym resolves.
        fn key_code(&mut self, keysym: u32) -> u32 {
            keysym
        }

        fn tap(&mut self, key_code: u32) -> Result<(), DispatchError> {
            self.enigo
                .key(Key::Other(key_code), Direction::Click)
                .map_err(|e| DispatchError::InjectionFailed(e.to_string()))
        }
    }
}
