//! Thin shell logic around the player window: close/tray behaviour and the
//! host guard. Kept free of toolkit types so it can be tested headless.

pub mod lifecycle;
pub mod navigation;
