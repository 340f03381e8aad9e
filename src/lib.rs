//! Desktop shell for the NetEase Cloud Music web player.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod media;
pub mod platform;
pub mod playback;
pub mod services;
pub mod shell;
pub mod types;

#[cfg(feature = "gui")]
pub mod ui;
