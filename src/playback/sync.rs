//! Capture and restore of the page's playback state.
//!
//! Capture: `Idle -> Capturing -> Idle`, one cycle per timer tick. Cycles
//! are not serialized against each other; if the page is slow they may
//! overlap and the last completion wins.
//!
//! Restore: `PageLoaded(ok = true) -> Restoring -> Idle`. A failed load is a
//! no-op.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::scripts::{render_restore_script, CAPTURE_SCRIPT};
use super::state_file::StateFile;
use super::surface::PageSurface;
use crate::types::playback::{RestorePayload, FIELD_SAVED_AT, FIELD_TIME};

/// What a single capture cycle did with the page's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// No value came back; nothing was written.
    Skipped,
    /// The value was not a JSON object and was written verbatim.
    Passthrough,
    /// The value was stamped with `saved_at` and written.
    Saved,
    /// The record could not be written.
    WriteFailed,
}

/// What a page-load event did.
#[derive(Debug, Clone, PartialEq)]
pub enum RestoreOutcome {
    /// The load reported failure.
    PageFailed,
    /// Nothing has been captured yet.
    NoRecord,
    /// The record exists but is not usable JSON.
    Unreadable,
    /// The restore script was submitted with this payload.
    Injected(RestorePayload),
    /// The page refused the restore script.
    SubmitFailed,
}

/// Snapshot/restore loop over one persisted record.
///
/// The component does not own the page surface; callers pass it in on every
/// trigger so the surface can stay on its own thread.
pub struct PlaybackSync {
    state_file: Arc<StateFile>,
    alive: Arc<AtomicBool>,
    in_flight: Arc<AtomicUsize>,
}

impl PlaybackSync {
    pub fn new(state_file: StateFile) -> Self {
        Self {
            state_file: Arc::new(state_file),
            alive: Arc::new(AtomicBool::new(true)),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn state_file(&self) -> &StateFile {
        &self.state_file
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Number of capture cycles waiting for the page to answer.
    pub fn captures_in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Marks the component dead. Replies arriving afterwards are dropped.
    pub fn shutdown(&self) {
        self.alive.store(false, Ordering::SeqCst);
        info!("playback sync stopped");
    }

    /// Starts one capture cycle against `page`.
    pub fn capture(&self, page: &dyn PageSurface) {
        if !self.is_alive() {
            return;
        }

        let pending = self.in_flight.fetch_add(1, Ordering::SeqCst);
        if pending > 0 {
            debug!(pending, "capture cycle overlaps an unfinished one");
        }

        let state_file = Arc::clone(&self.state_file);
        let alive = Arc::clone(&self.alive);
        let in_flight = Arc::clone(&self.in_flight);

        let submitted = page.evaluate(
            CAPTURE_SCRIPT,
            Box::new(move |result| {
                in_flight.fetch_sub(1, Ordering::SeqCst);
                if !alive.load(Ordering::SeqCst) {
                    debug!("dropping capture result after shutdown");
                    return;
                }
                handle_capture_result(&state_file, result, Utc::now());
            }),
        );

        if let Err(e) = submitted {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            warn!(error = %e, "capture script not submitted");
        }
    }

    /// Replays the persisted record into a freshly loaded page.
    pub fn on_page_loaded(&self, page: &dyn PageSurface, ok: bool) -> RestoreOutcome {
        if !ok {
            return RestoreOutcome::PageFailed;
        }

        let raw = match self.state_file.read() {
            Ok(Some(raw)) => raw,
            Ok(None) => return RestoreOutcome::NoRecord,
            Err(e) => {
                debug!(error = %e, "playback record unreadable");
                return RestoreOutcome::Unreadable;
            }
        };

        let Some(payload) = RestorePayload::parse(&raw) else {
            debug!("playback record is not valid JSON, skipping restore");
            return RestoreOutcome::Unreadable;
        };

        match page.execute(&render_restore_script(&payload)) {
            Ok(()) => {
                info!(id = %payload.id, time = payload.time, paused = payload.paused, "restoring playback state");
                RestoreOutcome::Injected(payload)
            }
            Err(e) => {
                warn!(error = %e, "restore script not submitted");
                RestoreOutcome::SubmitFailed
            }
        }
    }
}

/// Persists one capture result.
///
/// Empty results are skipped. A result that is not a JSON object is written
/// verbatim. An object gets its `time` clamped to zero if negative and a
/// `saved_at` stamp, then replaces the record in compact form.
pub fn handle_capture_result(
    state_file: &StateFile,
    result: Option<String>,
    now: DateTime<Utc>,
) -> CaptureOutcome {
    let raw = match result {
        Some(raw) if !raw.is_empty() => raw,
        _ => return CaptureOutcome::Skipped,
    };

    let (written, outcome) = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(mut record)) => {
            if let Some(time) = record.get(FIELD_TIME).and_then(Value::as_f64) {
                if time < 0.0 {
                    record.insert(FIELD_TIME.to_string(), Value::from(0));
                }
            }
            record.insert(
                FIELD_SAVED_AT.to_string(),
                Value::String(now.to_rfc3339_opts(SecondsFormat::Secs, true)),
            );
            (state_file.write_record(&record), CaptureOutcome::Saved)
        }
        _ => (state_file.write_raw(&raw), CaptureOutcome::Passthrough),
    };

    match written {
        Ok(()) => {
            debug!(?outcome, "playback state captured");
            outcome
        }
        Err(e) => {
            warn!(error = %e, "failed to persist playback state");
            CaptureOutcome::WriteFailed
        }
    }
}
