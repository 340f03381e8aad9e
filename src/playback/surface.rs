//! The scriptable page surface the snapshot/restore loop talks to.

use crate::types::errors::SurfaceError;

/// Continuation invoked with the script's result.
///
/// `None` means the engine produced no value. The reply may arrive on any
/// thread and after the requester has shut down.
pub type ScriptReply = Box<dyn FnOnce(Option<String>) + Send + 'static>;

/// Embedded page that accepts injected scripts.
pub trait PageSurface {
    /// Evaluates `script` asynchronously and hands its string result to
    /// `reply` once the engine completes.
    fn evaluate(&self, script: &str, reply: ScriptReply) -> Result<(), SurfaceError>;

    /// Evaluates `script` without waiting for a result.
    fn execute(&self, script: &str) -> Result<(), SurfaceError>;
}

/// Unwraps a raw engine result into the script's string value.
///
/// Engines hand back the JSON encoding of whatever the script returned, so a
/// returned string arrives quoted. `null`, `undefined` and empty results map
/// to `None`; anything that is not a JSON string is passed through as-is.
pub fn decode_script_result(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" || trimmed == "undefined" {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::String(s)) => Some(s),
        _ => Some(trimmed.to_string()),
    }
}
