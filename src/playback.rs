//! Frame-by-frame playback of decoded animations.

/// Variable-rate frame player.
pub mod player;
