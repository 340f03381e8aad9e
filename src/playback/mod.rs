//! Playback snapshot/restore loop.
//!
//! A timer periodically reads the player state out of the embedded page and
//! overwrites a single JSON record on disk; when the page finishes loading
//! the record is replayed into it.

pub mod scripts;
pub mod state_file;
pub mod surface;
pub mod sync;
pub mod timer;
