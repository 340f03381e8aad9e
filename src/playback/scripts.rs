//! Scripts injected into the player page.
//!
//! Both scripts swallow every exception: a broken page must never surface
//! an error to the shell, the worst case is a cycle that does nothing.

use crate::types::playback::RestorePayload;

/// Delay between readiness checks of the audio element during restore.
pub const RESTORE_POLL_INTERVAL_MS: u32 = 500;
/// Upper bound on readiness checks, the immediate one included.
pub const RESTORE_MAX_ATTEMPTS: u32 = 20;

/// Reads `{id, time, paused}` from the page and returns it JSON-encoded.
///
/// Prefers a first-class `<audio>` element and falls back to a global
/// `player` object exposing `getCurrentTime()` / `isPlaying()`.
pub const CAPTURE_SCRIPT: &str = r#"
(function(){
    try {
        var id = location.hash || location.pathname || document.title || 'unknown';
        var audio = document.querySelector('audio');
        var time = 0;
        var paused = true;
        if (audio) {
            time = audio.currentTime || 0;
            paused = audio.paused;
        } else {
            if (window.player && window.player.getCurrentTime) {
                try { time = window.player.getCurrentTime(); } catch(e) {}
            }
            if (window.player && window.player.isPlaying) {
                try { paused = !window.player.isPlaying(); } catch(e) {}
            }
        }
        time = Number(time);
        if (!isFinite(time) || time < 0) time = 0;
        return JSON.stringify({id: String(id), time: time, paused: Boolean(paused)});
    } catch(e) {
        return JSON.stringify({id: 'unknown', time: 0, paused: true});
    }
})();
"#;

const RESTORE_TEMPLATE: &str = r#"
(function(state){
    try {
        var audio = document.querySelector('audio');
        if (audio && state && typeof state.time === 'number') {
            var applyOnce = function() {
                try {
                    if (audio.readyState > 0) {
                        var duration = audio.duration;
                        var target = (isFinite(duration) && duration > 0) ? Math.min(state.time, duration) : state.time;
                        audio.currentTime = target;
                        if (!state.paused) {
                            var p = audio.play();
                            if (p && p.catch) p.catch(function(){});
                        }
                        return true;
                    }
                } catch(e) {}
                return false;
            };
            var attempts = 1;
            if (!applyOnce()) {
                var timer = setInterval(function(){
                    attempts++;
                    if (applyOnce() || attempts >= __MAX_ATTEMPTS__) clearInterval(timer);
                }, __POLL_INTERVAL_MS__);
            }
        } else if (window.player && window.player.seek) {
            try {
                window.player.seek(state.time);
                if (!state.paused && window.player.play) window.player.play();
            } catch(e) {}
        }
    } catch(e) {}
})(__STATE__);
"#;

/// Renders the restore script for `payload`.
///
/// The payload is embedded as a JSON literal, which is a valid JavaScript
/// expression, so no further escaping is needed.
pub fn render_restore_script(payload: &RestorePayload) -> String {
    RESTORE_TEMPLATE
        .replace("__MAX_ATTEMPTS__", &RESTORE_MAX_ATTEMPTS.to_string())
        .replace("__POLL_INTERVAL_MS__", &RESTORE_POLL_INTERVAL_MS.to_string())
        .replace("__STATE__", &payload.to_json())
}
