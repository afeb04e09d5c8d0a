use std::sync::Arc;

use image::RgbaImage;

use crate::foundation::core::FrameSize;
use crate::foundation::error::{PetError, PetResult};

/// Immutable, time-coded frame sequence produced by the animation cache.
///
/// Invariants checked at construction: at least one frame, one duration per frame, every duration
/// strictly positive. Frames are straight-alpha RGBA8.
#[derive(Clone, Debug)]
pub struct AnimatedImage {
    frames: Vec<Arc<RgbaImage>>,
    durations_ms: Vec<u32>,
}

impl AnimatedImage {
    /// Build an animation from parallel frame and duration lists.
    pub fn new(frames: Vec<RgbaImage>, durations_ms: Vec<u32>) -> PetResult<Self> {
        if frames.is_empty() {
            return Err(PetError::validation("animation needs at least one frame"));
        }
        if frames.len() != durations_ms.len() {
            return Err(PetError::validation(format!(
                "animation has {} frames but {} durations",
                frames.len(),
                durations_ms.len()
            )));
        }
        if durations_ms.contains(&0) {
            return Err(PetError::validation("frame durations must be > 0 ms"));
        }
        Ok(Self {
            frames: frames.into_iter().map(Arc::new).collect(),
            durations_ms,
        })
    }

    /// Number of frames (always at least one).
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// All frames in display order.
    pub fn frames(&self) -> &[Arc<RgbaImage>] {
        &self.frames
    }

    /// Per-frame display durations in milliseconds, parallel to [`AnimatedImage::frames`].
    pub fn durations_ms(&self) -> &[u32] {
        &self.durations_ms
    }

    /// Frame `index`, wrapping around the sequence.
    pub fn frame(&self, index: usize) -> &Arc<RgbaImage> {
        &self.frames[index % self.frames.len()]
    }

    /// Display duration of frame `index`, wrapping around the sequence.
    pub fn duration_ms(&self, index: usize) -> u32 {
        self.durations_ms[index % self.durations_ms.len()]
    }

    /// Size of the first frame.
    pub fn size(&self) -> FrameSize {
        let (width, height) = self.frames[0].dimensions();
        FrameSize { width, height }
    }

    /// Sum of all frame durations.
    pub fn total_duration_ms(&self) -> u64 {
        self.durations_ms.iter().map(|d| u64::from(*d)).sum()
    }

    /// `true` for a single still frame.
    pub fn is_still(&self) -> bool {
        self.frames.len() == 1
    }
}
