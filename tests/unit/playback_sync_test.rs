//! Integration tests for the playback snapshot/restore loop.
//!
//! A fake page surface queues capture replies so each test decides when,
//! in which order and with which value the page answers.

use std::cell::RefCell;

use chrono::{TimeZone, Utc};
use netease_webplayer::playback::scripts::CAPTURE_SCRIPT;
use netease_webplayer::playback::state_file::StateFile;
use netease_webplayer::playback::surface::{PageSurface, ScriptReply};
use netease_webplayer::playback::sync::{
    handle_capture_result, CaptureOutcome, PlaybackSync, RestoreOutcome,
};
use netease_webplayer::types::errors::SurfaceError;
use netease_webplayer::types::playback::{PlaybackState, RestorePayload};
use serde_json::Value;
use tempfile::TempDir;

#[derive(Default)]
struct FakePage {
    pending: RefCell<Vec<ScriptReply>>,
    evaluated: RefCell<Vec<String>>,
    executed: RefCell<Vec<String>>,
    refuse: bool,
}

impl FakePage {
    /// Completes the oldest pending evaluation with `value`.
    fn answer(&self, value: Option<&str>) {
        let reply = self.pending.borrow_mut().remove(0);
        reply(value.map(str::to_string));
    }

    /// Completes the newest pending evaluation with `value`.
    fn answer_latest(&self, value: Option<&str>) {
        let reply = self.pending.borrow_mut().pop().unwrap();
        reply(value.map(str::to_string));
    }
}

impl PageSurface for FakePage {
    fn evaluate(&self, script: &str, reply: ScriptReply) -> Result<(), SurfaceError> {
        if self.refuse {
            return Err(SurfaceError::EvaluationFailed("page gone".to_string()));
        }
        self.evaluated.borrow_mut().push(script.to_string());
        self.pending.borrow_mut().push(reply);
        Ok(())
    }

    fn execute(&self, script: &str) -> Result<(), SurfaceError> {
        if self.refuse {
            return Err(SurfaceError::EvaluationFailed("page gone".to_string()));
        }
        self.executed.borrow_mut().push(script.to_string());
        Ok(())
    }
}

fn sync_in(dir: &TempDir) -> PlaybackSync {
    PlaybackSync::new(StateFile::new(dir.path().join("player_state.json")))
}

fn read_record(sync: &PlaybackSync) -> Option<String> {
    sync.state_file().read().unwrap()
}

fn read_object(sync: &PlaybackSync) -> serde_json::Map<String, Value> {
    let raw = read_record(sync).expect("record written");
    match serde_json::from_str(&raw).unwrap() {
        Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

// --- capture ---

#[test]
fn capture_runs_the_read_script() {
    let dir = TempDir::new().unwrap();
    let sync = sync_in(&dir);
    let page = FakePage::default();

    sync.capture(&page);

    assert_eq!(page.evaluated.borrow().as_slice(), &[CAPTURE_SCRIPT.to_string()]);
    assert_eq!(sync.captures_in_flight(), 1);
    page.answer(None);
    assert_eq!(sync.captures_in_flight(), 0);
}

#[test]
fn capture_stamps_saved_at_and_writes_compact() {
    let dir = TempDir::new().unwrap();
    let sync = sync_in(&dir);
    let page = FakePage::default();

    sync.capture(&page);
    page.answer(Some(r##"{"id":"#/song?id=42","time":73.5,"paused":false}"##));

    let raw = read_record(&sync).unwrap();
    assert!(!raw.contains(' ') && !raw.contains('\n'), "record must be compact: {}", raw);

    let record = read_object(&sync);
    assert_eq!(record["id"], "#/song?id=42");
    assert_eq!(record["time"], 73.5);
    assert_eq!(record["paused"], false);
    let saved_at = record["saved_at"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(saved_at).is_ok());
    assert!(saved_at.ends_with('Z'));
}

#[test]
fn capture_twice_differs_only_in_saved_at() {
    let dir = TempDir::new().unwrap();
    let file = StateFile::new(dir.path().join("player_state.json"));
    let raw = r#"{"id":"/st/webplayer","time":12,"paused":true}"#;

    let first_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let second_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 4).unwrap();

    handle_capture_result(&file, Some(raw.to_string()), first_at);
    let mut first: Value = serde_json::from_str(&file.read().unwrap().unwrap()).unwrap();
    handle_capture_result(&file, Some(raw.to_string()), second_at);
    let mut second: Value = serde_json::from_str(&file.read().unwrap().unwrap()).unwrap();

    assert_eq!(first["saved_at"], "2024-05-01T12:00:00Z");
    assert_eq!(second["saved_at"], "2024-05-01T12:00:04Z");

    first.as_object_mut().unwrap().remove("saved_at");
    second.as_object_mut().unwrap().remove("saved_at");
    assert_eq!(first, second);
}

#[test]
fn malformed_capture_is_written_verbatim() {
    let dir = TempDir::new().unwrap();
    let file = StateFile::new(dir.path().join("player_state.json"));

    let outcome = handle_capture_result(&file, Some("not json".to_string()), Utc::now());

    assert_eq!(outcome, CaptureOutcome::Passthrough);
    assert_eq!(file.read().unwrap().as_deref(), Some("not json"));
}

#[test]
fn non_object_capture_is_written_verbatim() {
    let dir = TempDir::new().unwrap();
    let file = StateFile::new(dir.path().join("player_state.json"));

    let outcome = handle_capture_result(&file, Some("[1,2,3]".to_string()), Utc::now());

    assert_eq!(outcome, CaptureOutcome::Passthrough);
    assert_eq!(file.read().unwrap().as_deref(), Some("[1,2,3]"));
}

#[test]
fn empty_capture_is_skipped() {
    let dir = TempDir::new().unwrap();
    let file = StateFile::new(dir.path().join("player_state.json"));

    assert_eq!(handle_capture_result(&file, None, Utc::now()), CaptureOutcome::Skipped);
    assert_eq!(
        handle_capture_result(&file, Some(String::new()), Utc::now()),
        CaptureOutcome::Skipped
    );
    assert!(!file.exists());
}

#[test]
fn empty_capture_keeps_previous_record() {
    let dir = TempDir::new().unwrap();
    let file = StateFile::new(dir.path().join("player_state.json"));
    file.write_raw(r#"{"id":"a","time":5,"paused":true}"#).unwrap();

    handle_capture_result(&file, None, Utc::now());

    assert_eq!(
        file.read().unwrap().as_deref(),
        Some(r#"{"id":"a","time":5,"paused":true}"#)
    );
}

#[test]
fn negative_time_is_clamped_on_capture() {
    let dir = TempDir::new().unwrap();
    let file = StateFile::new(dir.path().join("player_state.json"));

    handle_capture_result(&file, Some(r#"{"id":"x","time":-4,"paused":true}"#.to_string()), Utc::now());

    let state = PlaybackState::from_value(&serde_json::from_str(&file.read().unwrap().unwrap()).unwrap());
    assert_eq!(state.time, 0.0);
    assert!(state.saved_at.is_some());
}

#[test]
fn last_completion_wins_when_cycles_overlap() {
    let dir = TempDir::new().unwrap();
    let sync = sync_in(&dir);
    let page = FakePage::default();

    sync.capture(&page);
    sync.capture(&page);
    assert_eq!(sync.captures_in_flight(), 2);

    // The second cycle answers first; the first cycle's late answer wins.
    page.answer_latest(Some(r#"{"id":"second","time":8,"paused":false}"#));
    page.answer_latest(Some(r#"{"id":"first","time":4,"paused":false}"#));

    assert_eq!(read_object(&sync)["id"], "first");
    assert_eq!(sync.captures_in_flight(), 0);
}

#[test]
fn reply_after_shutdown_is_dropped() {
    let dir = TempDir::new().unwrap();
    let sync = sync_in(&dir);
    let page = FakePage::default();

    sync.capture(&page);
    sync.shutdown();
    page.answer(Some(r#"{"id":"late","time":1,"paused":true}"#));

    assert!(!sync.is_alive());
    assert_eq!(read_record(&sync), None);
}

#[test]
fn capture_after_shutdown_does_not_evaluate() {
    let dir = TempDir::new().unwrap();
    let sync = sync_in(&dir);
    let page = FakePage::default();

    sync.shutdown();
    sync.capture(&page);

    assert!(page.evaluated.borrow().is_empty());
}

#[test]
fn refused_capture_is_not_left_in_flight() {
    let dir = TempDir::new().unwrap();
    let sync = sync_in(&dir);
    let page = FakePage { refuse: true, ..FakePage::default() };

    sync.capture(&page);

    assert_eq!(sync.captures_in_flight(), 0);
}

// --- restore ---

#[test]
fn failed_load_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let sync = sync_in(&dir);
    sync.state_file().write_raw(r#"{"id":"x","time":3,"paused":false}"#).unwrap();
    let page = FakePage::default();

    assert_eq!(sync.on_page_loaded(&page, false), RestoreOutcome::PageFailed);
    assert!(page.executed.borrow().is_empty());
}

#[test]
fn missing_record_restores_nothing() {
    let dir = TempDir::new().unwrap();
    let sync = sync_in(&dir);
    let page = FakePage::default();

    assert_eq!(sync.on_page_loaded(&page, true), RestoreOutcome::NoRecord);
    assert!(page.executed.borrow().is_empty());
}

#[test]
fn corrupt_record_restores_nothing() {
    let dir = TempDir::new().unwrap();
    let sync = sync_in(&dir);
    sync.state_file().write_raw("not json").unwrap();
    let page = FakePage::default();

    assert_eq!(sync.on_page_loaded(&page, true), RestoreOutcome::Unreadable);
    assert!(page.executed.borrow().is_empty());
}

#[test]
fn restore_injects_normalized_payload() {
    let dir = TempDir::new().unwrap();
    let sync = sync_in(&dir);
    sync.state_file()
        .write_raw(r##"{"id":"#/song?id=7","time":95.25,"paused":false,"saved_at":"2024-05-01T12:00:00Z","volume":0.3}"##)
        .unwrap();
    let page = FakePage::default();

    let outcome = sync.on_page_loaded(&page, true);

    let expected = RestorePayload {
        id: "#/song?id=7".to_string(),
        time: 95.25,
        paused: false,
    };
    assert_eq!(outcome, RestoreOutcome::Injected(expected));

    let executed = page.executed.borrow();
    assert_eq!(executed.len(), 1);
    assert!(executed[0].contains(r##"({"id":"#/song?id=7","time":95.25,"paused":false});"##));
    assert!(!executed[0].contains("saved_at"));
    assert!(!executed[0].contains("volume"));
}

#[test]
fn restore_applies_field_defaults() {
    let dir = TempDir::new().unwrap();
    let sync = sync_in(&dir);
    sync.state_file().write_raw(r#"{"id":"x","extra":1}"#).unwrap();
    let page = FakePage::default();

    sync.on_page_loaded(&page, true);

    assert!(page.executed.borrow()[0].contains(r#"({"id":"x","time":0,"paused":true});"#));
}

#[test]
fn capture_then_restore_round_trip() {
    let dir = TempDir::new().unwrap();
    let sync = sync_in(&dir);
    let page = FakePage::default();

    sync.capture(&page);
    page.answer(Some(r#"{"id":"/st/webplayer","time":30,"paused":false}"#));

    match sync.on_page_loaded(&page, true) {
        RestoreOutcome::Injected(payload) => {
            assert_eq!(payload.id, "/st/webplayer");
            assert_eq!(payload.time, 30.0);
            assert!(!payload.paused);
        }
        other => panic!("expected restore, got {:?}", other),
    }
}

#[test]
fn refused_restore_is_reported() {
    let dir = TempDir::new().unwrap();
    let sync = sync_in(&dir);
    sync.state_file().write_raw(r#"{"id":"x","time":1,"paused":true}"#).unwrap();
    let page = FakePage { refuse: true, ..FakePage::default() };

    assert_eq!(sync.on_page_loaded(&page, true), RestoreOutcome::SubmitFailed);
}
