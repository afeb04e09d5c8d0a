use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use image::RgbaImage;

use crate::assets::animation::AnimatedImage;
use crate::foundation::core::FrameSize;
use crate::foundation::ticker::Ticker;

/// Variable-rate playback of one [`AnimatedImage`].
///
/// The frame timer's period always equals the display duration of the frame on screen, so playback
/// follows the per-frame timing embedded in the source. Stills are shown without a running timer.
pub struct FramePlayer {
    animation: Option<Arc<AnimatedImage>>,
    index: usize,
    ticker: Ticker,
    facing_left: bool,
    mirrored: HashMap<usize, Arc<RgbaImage>>,
    advanced: u64,
}

impl Default for FramePlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl FramePlayer {
    /// Player with nothing loaded.
    pub fn new() -> Self {
        Self {
            animation: None,
            index: 0,
            ticker: Ticker::new(Duration::from_millis(1)),
            facing_left: false,
            mirrored: HashMap::new(),
            advanced: 0,
        }
    }

    /// Show frame 0 of `animation`; the timer runs only for two or more frames.
    pub fn start(&mut self, animation: Arc<AnimatedImage>) {
        let same = self
            .animation
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &animation));
        if !same {
            self.mirrored.clear();
        }

        self.index = 0;
        self.ticker = Ticker::new(Duration::from_millis(u64::from(animation.duration_ms(0))));
        if animation.frame_count() > 1 {
            self.ticker.arm();
        }
        tracing::debug!(
            frames = animation.frame_count(),
            size = %animation.size(),
            "playback started"
        );
        self.animation = Some(animation);
    }

    /// Stop advancing; the current frame stays on display.
    pub fn stop(&mut self) {
        self.ticker.disarm();
    }

    /// `true` while the frame timer runs.
    pub fn is_playing(&self) -> bool {
        self.ticker.is_armed()
    }

    /// Animation on display, if any.
    pub fn animation(&self) -> Option<&Arc<AnimatedImage>> {
        self.animation.as_ref()
    }

    /// Index of the frame on display.
    pub fn frame_index(&self) -> usize {
        self.index
    }

    /// Current timer period; equals the on-screen frame's duration.
    pub fn frame_interval(&self) -> Duration {
        self.ticker.interval()
    }

    /// Total frame advances since construction.
    pub fn frames_advanced(&self) -> u64 {
        self.advanced
    }

    /// Advance if the frame timer is due. Returns `true` when the frame changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.ticker.poll(now) {
            return false;
        }
        self.advance(now)
    }

    /// Move to the next frame (wrapping) and re-time the timer to that frame's duration.
    pub fn advance(&mut self, now: Instant) -> bool {
        let Some(animation) = self.animation.as_ref() else {
            self.ticker.disarm();
            return false;
        };
        if animation.frame_count() <= 1 {
            self.ticker.disarm();
            return false;
        }

        self.index = (self.index + 1) % animation.frame_count();
        let next = Duration::from_millis(u64::from(animation.duration_ms(self.index)));
        self.ticker.reschedule(now, next);
        self.advanced += 1;
        true
    }

    /// `true` when frames are mirrored horizontally.
    pub fn facing_left(&self) -> bool {
        self.facing_left
    }

    /// Mirror (or un-mirror) the frames from now on.
    pub fn set_facing_left(&mut self, facing_left: bool) {
        self.facing_left = facing_left;
    }

    /// Frame to paint, mirrored when facing left. Mirrored frames are computed once per index.
    pub fn current_frame(&mut self) -> Option<Arc<RgbaImage>> {
        let animation = self.animation.as_ref()?;
        let source = animation.frame(self.index);
        if !self.facing_left {
            return Some(source.clone());
        }
        let mirrored = self
            .mirrored
            .entry(self.index)
            .or_insert_with(|| Arc::new(image::imageops::flip_horizontal(&**source)));
        Some(mirrored.clone())
    }

    /// On-screen size of the current animation at `scale`.
    pub fn display_size(&self, scale: f64) -> Option<FrameSize> {
        self.animation.as_ref().map(|a| a.size().scaled(scale))
    }
}

impl std::fmt::Debug for FramePlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FramePlayer")
            .field("frames", &self.animation.as_ref().map(|a| a.frame_count()))
            .field("index", &self.index)
            .field("playing", &self.is_playing())
            .field("facing_left", &self.facing_left)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/player.rs"]
mod tests;
