//! Media command dispatcher.
//!
//! Relays `PlayPause` / `Next` / `Previous` to whatever currently owns audio
//! playback. Backends are tried in priority order and the first one that
//! accepts the command wins; the dispatcher itself keeps no state between
//! calls.

pub mod keys;
pub mod mpris;

use tracing::{debug, warn};

use crate::types::command::MediaCommand;
use crate::types::errors::DispatchError;

/// One way of delivering a media command to the system.
pub trait MediaBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Delivers `command`. `Ok` means the backend accepted it.
    fn send(&self, command: MediaCommand) -> Result<(), DispatchError>;
}

/// Ordered fallback chain over media backends.
pub struct MediaDispatcher {
    backends: Vec<Box<dyn MediaBackend>>,
}

impl MediaDispatcher {
    /// Creates a dispatcher trying `backends` front to back.
    pub fn new(backends: Vec<Box<dyn MediaBackend>>) -> Self {
        Self { backends }
    }

    /// The platform chain: session bus first, synthetic media keys second.
    ///
    /// On platforms without either backend the chain is empty and every
    /// dispatch returns `false`.
    pub fn system() -> Self {
        #[allow(unused_mut)]
        let mut backends: Vec<Box<dyn MediaBackend>> = Vec::new();

        #[cfg(target_os = "linux")]
        {
            backends.push(Box::new(mpris::MprisBackend::new(
                mpris::ZbusSessionBus::new(),
            )));
            backends.push(Box::new(keys::SyntheticKeyBackend::new(
                keys::EnigoInputServer,
            )));
        }

        Self::new(backends)
    }

    /// Names of the configured backends, in priority order.
    pub fn backend_names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Sends `command` to the first backend that accepts it.
    ///
    /// Returns `false` once every backend has been exhausted.
    pub fn dispatch(&self, command: MediaCommand) -> bool {
        for backend in &self.backends {
            match backend.send(command) {
                Ok(()) => {
                    debug!(backend = backend.name(), %command, "media command delivered");
                    return true;
                }
                Err(e) => {
                    debug!(backend = backend.name(), %command, error = %e, "media backend declined");
                }
            }
        }
        warn!(%command, "{} failed", command);
        false
    }
}
