use serde::{Serialize, Serializer};
use serde_json::Value;

pub const FIELD_ID: &str = "id";
pub const FIELD_TIME: &str = "time";
pub const FIELD_PAUSED: &str = "paused";
pub const FIELD_SAVED_AT: &str = "saved_at";

/// Playback snapshot as read back from the persisted record.
///
/// Every field degrades independently: a missing or mistyped value falls
/// back to its default instead of rejecting the whole record.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub id: String,
    pub time: f64,
    pub paused: bool,
    pub saved_at: Option<String>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            id: String::new(),
            time: 0.0,
            paused: true,
            saved_at: None,
        }
    }
}

impl PlaybackState {
    /// Projects an arbitrary JSON value onto the record fields.
    ///
    /// Non-object values yield the defaults.
    pub fn from_value(value: &Value) -> Self {
        let defaults = Self::default();
        let Some(obj) = value.as_object() else {
            return defaults;
        };

        Self {
            id: obj
                .get(FIELD_ID)
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or(defaults.id),
            time: obj
                .get(FIELD_TIME)
                .and_then(Value::as_f64)
                .map(clamp_seconds)
                .unwrap_or(defaults.time),
            paused: obj
                .get(FIELD_PAUSED)
                .and_then(Value::as_bool)
                .unwrap_or(defaults.paused),
            saved_at: obj
                .get(FIELD_SAVED_AT)
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }
}

/// The normalized `{id, time, paused}` object handed to the restore script.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestorePayload {
    pub id: String,
    #[serde(serialize_with = "serialize_seconds")]
    pub time: f64,
    pub paused: bool,
}

impl Default for RestorePayload {
    fn default() -> Self {
        PlaybackState::default().into()
    }
}

impl From<PlaybackState> for RestorePayload {
    fn from(state: PlaybackState) -> Self {
        Self {
            id: state.id,
            time: state.time,
            paused: state.paused,
        }
    }
}

impl RestorePayload {
    /// Parses a persisted record and projects it onto the restore fields.
    ///
    /// Returns `None` when the text is not valid JSON.
    pub fn parse(raw: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(raw).ok()?;
        Some(PlaybackState::from_value(&value).into())
    }

    /// Compact JSON encoding, suitable for embedding as a script literal.
    pub fn to_json(&self) -> String {
        // Three plain fields; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }
}

/// Playback positions are never negative and never NaN/infinite.
pub fn clamp_seconds(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}

/// Whole seconds are emitted as integers (`0`, not `0.0`).
fn serialize_seconds<S: Serializer>(seconds: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if seconds.fract() == 0.0 && seconds.abs() < 9.0e15 {
        serializer.serialize_i64(*seconds as i64)
    } else {
        serializer.serialize_f64(*seconds)
    }
}
