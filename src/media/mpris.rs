//! Session-bus media backend (MPRIS).
//!
//! Every dispatch lists the names registered on the session bus, picks the
//! first one in the `org.mpris.MediaPlayer2.` namespace and calls the
//! command's method on its player interface. The discovered name is never
//! cached.

use tracing::debug;

use super::MediaBackend;
use crate::types::command::MediaCommand;
use crate::types::errors::DispatchError;

pub const MPRIS_NAME_PREFIX: &str = "org.mpris.MediaPlayer2.";
pub const MPRIS_OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
pub const MPRIS_PLAYER_INTERFACE: &str = "org.mpris.MediaPlayer2.Player";

/// The two session-bus operations the backend needs.
pub trait SessionBus: Send + Sync {
    /// All names currently registered on the bus, in bus order.
    fn list_names(&self) -> Result<Vec<String>, DispatchError>;

    /// Calls a zero-argument method on `service`'s MPRIS player interface.
    fn call_player_method(&self, service: &str, method: &str) -> Result<(), DispatchError>;
}

/// Returns the first media-player service in list order.
pub fn discover_player(names: &[String]) -> Option<&str> {
    names
        .iter()
        .map(String::as_str)
        .find(|name| name.starts_with(MPRIS_NAME_PREFIX))
}

/// Media backend relaying commands over a [`SessionBus`].
pub struct MprisBackend<B: SessionBus> {
    bus: B,
}

impl<B: SessionBus> MprisBackend<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }
}

impl<B: SessionBus> MediaBackend for MprisBackend<B> {
    fn name(&self) -> &'static str {
        "mpris"
    }

    fn send(&self, command: MediaCommand) -> Result<(), DispatchError> {
        let names = self.bus.list_names()?;
        let service = discover_player(&names).ok_or(DispatchError::NoActivePlayer)?;
        debug!(service, method = command.method_name(), "calling mpris player");
        self.bus.call_player_method(service, command.method_name())
    }
}

#[cfg(target_os = "linux")]
pub use zbus_bus::ZbusSessionBus;

#[cfg(target_os = "linux")]
mod zbus_bus {
    use std::sync::Mutex;

    use zbus::blocking::fdo::DBusProxy;
    use zbus::blocking::Connection;

    use super::{SessionBus, MPRIS_OBJECT_PATH, MPRIS_PLAYER_INTERFACE};
    use crate::types::errors::DispatchError;

    /// [`SessionBus`] over the real D-Bus session bus.
    ///
    /// The connection is opened lazily and dropped again after a failed
    /// call so the next dispatch reconnects.
    pub struct ZbusSessionBus {
        conn: Mutex<Option<Connection>>,
    }

    impl ZbusSessionBus {
        pub fn new() -> Self {
            Self {
                conn: Mutex::new(None),
            }
        }

        fn connection(&self) -> Result<Connection, DispatchError> {
            let mut guard = self
                .conn
                .lock()
                .map_err(|_| DispatchError::BusUnavailable("connection lock poisoned".to_string()))?;
            if let Some(conn) = guard.as_ref() {
                return Ok(conn.clone());
            }
            let conn = Connection::session()
                .map_err(|e| DispatchError::BusUnavailable(e.to_string()))?;
            *guard = Some(conn.clone());
            Ok(conn)
        }

        fn forget_connection(&self) {
            if let Ok(mut guard) = self.conn.lock() {
                *guard = None;
            }
        }
    }

    impl Default for ZbusSessionBus {
        fn default() -> Self {
            Self::new()
        }
    }

    impl SessionBus for ZbusSessionBus {
        fn list_names(&self) -> Result<Vec<String>, DispatchError> {
            let conn = self.connection()?;
            let result = DBusProxy::new(&conn)
                .map_err(|e| DispatchError::BusUnavailable(e.to_string()))
                .and_then(|proxy| {
                    proxy
                        .list_names()
                        .map_err(|e| DispatchError::BusUnavailable(e.to_string()))
                });

            match result {
                Ok(names) => Ok(names.iter().map(|n| n.as_str().to_owned()).collect()),
                Err(e) => {
                    self.forget_connection();
                    Err(e)
                }
            }
        }

        fn call_player_method(&self, service: &str, method: &str) -> Result<(), DispatchError> {
            let conn = self.connection()?;
            conn.call_method(
                Some(service),
                MPRIS_OBJECT_PATH,
                Some(MPRIS_PLAYER_INTERFACE),
                method,
                &(),
            )
            .map(|_| ())
            .map_err(|e| DispatchError::CallFailed(format!("{}.{}: {}", service, method, e)))
        }
    }
}
