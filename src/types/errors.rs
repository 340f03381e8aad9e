use std::fmt;

// === DispatchError ===

/// Errors raised by a single media backend while relaying a command.
///
/// None of these are fatal: the dispatcher logs them and moves on to the
/// next backend in the chain.
#[derive(Debug)]
pub enum DispatchError {
    /// The session message bus could not be reached.
    BusUnavailable(String),
    /// No service in the media player namespace is registered.
    NoActivePlayer,
    /// The player service rejected or failed the method call.
    CallFailed(String),
    /// The display/input server connection could not be opened.
    DisplayUnavailable(String),
    /// The media key symbol has no key code on this keyboard.
    KeyUnresolved(String),
    /// The synthetic key event could not be injected.
    InjectionFailed(String),
    /// The backend does not exist on this platform.
    Unsupported(String),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::BusUnavailable(msg) => write!(f, "Session bus unavailable: {}", msg),
            DispatchError::NoActivePlayer => write!(f, "No active media player on the session bus"),
            DispatchError::CallFailed(msg) => write!(f, "Media player call failed: {}", msg),
            DispatchError::DisplayUnavailable(msg) => {
                write!(f, "Display connection unavailable: {}", msg)
            }
            DispatchError::KeyUnresolved(key) => write!(f, "No key code for media key: {}", key),
            DispatchError::InjectionFailed(msg) => {
                write!(f, "Synthetic key injection failed: {}", msg)
            }
            DispatchError::Unsupported(backend) => {
                write!(f, "Media backend not supported on this platform: {}", backend)
            }
        }
    }
}

impl std::error::Error for DispatchError {}

// === StateFileError ===

/// Errors related to the persisted playback record.
#[derive(Debug)]
pub enum StateFileError {
    /// Reading or writing the record failed.
    IoError(String),
    /// The record could not be encoded.
    SerializationError(String),
}

impl fmt::Display for StateFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateFileError::IoError(msg) => write!(f, "State file I/O error: {}", msg),
            StateFileError::SerializationError(msg) => {
                write!(f, "State file serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StateFileError {}

// === SurfaceError ===

/// Errors reported by the page surface when a script cannot be submitted.
#[derive(Debug)]
pub enum SurfaceError {
    /// The engine refused to evaluate the script.
    EvaluationFailed(String),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::EvaluationFailed(msg) => write!(f, "Script evaluation failed: {}", msg),
        }
    }
}

impl std::error::Error for SurfaceError {}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}
