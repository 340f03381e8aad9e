use serde::{Deserialize, Serialize};
use std::fmt;

/// X11 keysym for `XF86XK_AudioPlay`.
pub const XF86_AUDIO_PLAY: u32 = 0x1008_FF14;
/// X11 keysym for `XF86XK_AudioPrev`.
pub const XF86_AUDIO_PREV: u32 = 0x1008_FF16;
/// X11 keysym for `XF86XK_AudioNext`.
pub const XF86_AUDIO_NEXT: u32 = 0x1008_FF17;

/// Logical media command relayed to whatever is currently playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaCommand {
    PlayPause,
    Next,
    Previous,
}

impl MediaCommand {
    pub const ALL: [MediaCommand; 3] = [
        MediaCommand::PlayPause,
        MediaCommand::Next,
        MediaCommand::Previous,
    ];

    /// Name of the zero-argument method on `org.mpris.MediaPlayer2.Player`.
    pub fn method_name(self) -> &'static str {
        match self {
            MediaCommand::PlayPause => "PlayPause",
            MediaCommand::Next => "Next",
            MediaCommand::Previous => "Previous",
        }
    }

    /// Hardware media key symbol synthesized by the keypress fallback.
    pub fn keysym(self) -> u32 {
        match self {
            MediaCommand::PlayPause => XF86_AUDIO_PLAY,
            MediaCommand::Next => XF86_AUDIO_NEXT,
            MediaCommand::Previous => XF86_AUDIO_PREV,
        }
    }
}

impl fmt::Display for MediaCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}
