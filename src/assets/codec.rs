//! Pluggable multi-frame decoders and the codec-independent decode policy.
//!
//! A codec only turns bytes into raw frames with optional timing. Timing fallbacks, the still-image
//! path and reference-size normalization live in [`decode_animation`] so every codec shares them.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use image::{AnimationDecoder, ImageDecoder, Limits, RgbaImage, imageops::FilterType};

use crate::assets::animation::AnimatedImage;
use crate::foundation::core::FrameSize;
use crate::foundation::error::{PetError, PetResult};

/// Frame duration used when embedded timing is missing or not positive.
pub const DEFAULT_FRAME_MS: u32 = 100;
/// Duration given to the single frame of a still image.
pub const STILL_FRAME_MS: u32 = 1000;

/// One decoded frame before policy is applied.
#[derive(Clone, Debug)]
pub struct RawFrame {
    /// Full-canvas RGBA8 pixels.
    pub image: RgbaImage,
    /// Embedded display time, if the source carried one.
    pub delay_ms: Option<u32>,
}

/// A decoding strategy for one family of file formats.
pub trait AnimationCodec: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Lowercase file extensions (without the dot) this codec accepts.
    fn extensions(&self) -> &'static [&'static str];

    /// Decode every frame of an animated source.
    ///
    /// Returning zero frames means "not animated"; the caller then decodes a still image.
    fn decode_frames(&self, bytes: &[u8]) -> PetResult<Vec<RawFrame>>;
}

/// Legacy graphics-interchange (GIF) animations.
#[derive(Clone, Copy, Debug, Default)]
pub struct GifCodec;

impl AnimationCodec for GifCodec {
    fn name(&self) -> &'static str {
        "gif"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["gif"]
    }

    fn decode_frames(&self, bytes: &[u8]) -> PetResult<Vec<RawFrame>> {
        let mut decoder = image::codecs::gif::GifDecoder::new(Cursor::new(bytes))
            .context("open gif decoder")?;
        decoder
            .set_limits(Limits::default())
            .context("gif exceeds decode limits")?;
        collect_frames(decoder)
    }
}

/// Modern WebP animations. Still WebP files report no frames.
#[derive(Clone, Copy, Debug, Default)]
pub struct WebpCodec;

impl AnimationCodec for WebpCodec {
    fn name(&self) -> &'static str {
        "webp"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["webp"]
    }

    fn decode_frames(&self, bytes: &[u8]) -> PetResult<Vec<RawFrame>> {
        let mut decoder = image::codecs::webp::WebPDecoder::new(Cursor::new(bytes))
            .context("open webp decoder")?;
        decoder
            .set_limits(Limits::default())
            .context("webp exceeds decode limits")?;
        if !decoder.has_animation() {
            return Ok(Vec::new());
        }
        collect_frames(decoder)
    }
}

/// Formats without animation support (PNG); always takes the still path.
#[derive(Clone, Copy, Debug, Default)]
pub struct StillCodec;

impl AnimationCodec for StillCodec {
    fn name(&self) -> &'static str {
        "still"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["png"]
    }

    fn decode_frames(&self, _bytes: &[u8]) -> PetResult<Vec<RawFrame>> {
        Ok(Vec::new())
    }
}

fn collect_frames<'a>(decoder: impl AnimationDecoder<'a>) -> PetResult<Vec<RawFrame>> {
    let frames = decoder
        .into_frames()
        .collect_frames()
        .context("decode animation frames")?;

    Ok(frames
        .into_iter()
        .map(|frame| {
            let (numer, denom) = frame.delay().numer_denom_ms();
            let delay_ms = if denom == 0 { 0 } else { numer / denom };
            RawFrame {
                image: frame.into_buffer(),
                delay_ms: Some(delay_ms),
            }
        })
        .collect())
}

/// Extension-keyed set of codecs.
#[derive(Clone)]
pub struct CodecRegistry {
    codecs: Vec<Arc<dyn AnimationCodec>>,
}

impl Default for CodecRegistry {
    /// GIF, WebP and PNG, in that preference order.
    fn default() -> Self {
        Self {
            codecs: vec![
                Arc::new(GifCodec),
                Arc::new(WebpCodec),
                Arc::new(StillCodec),
            ],
        }
    }
}

impl CodecRegistry {
    /// Registry with no codecs.
    pub fn empty() -> Self {
        Self { codecs: Vec::new() }
    }

    /// Append a codec; earlier registrations win on extension clashes.
    pub fn register(&mut self, codec: Arc<dyn AnimationCodec>) {
        self.codecs.push(codec);
    }

    /// Every supported extension, in registration order.
    pub fn extensions(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.codecs
            .iter()
            .flat_map(|c| c.extensions().iter().copied())
    }

    /// Codec for `path`'s extension, compared case-insensitively.
    pub fn for_path(&self, path: &Path) -> Option<&Arc<dyn AnimationCodec>> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        self.codecs
            .iter()
            .find(|c| c.extensions().iter().any(|e| *e == ext))
    }
}

impl std::fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.codecs.iter().map(|c| c.name()))
            .finish()
    }
}

/// Decode `bytes` with `codec` and apply the shared policy.
///
/// - two or more frames: keep them, substituting [`DEFAULT_FRAME_MS`] for missing/zero timing;
/// - one frame: keep it as a still with [`STILL_FRAME_MS`];
/// - zero frames: decode a still image from the bytes, [`STILL_FRAME_MS`];
/// - `normalize_to`: resize every frame to exactly that size with a bicubic filter.
pub fn decode_animation(
    codec: &dyn AnimationCodec,
    bytes: &[u8],
    normalize_to: Option<FrameSize>,
) -> PetResult<AnimatedImage> {
    let raw = codec.decode_frames(bytes)?;

    let (mut frames, durations): (Vec<RgbaImage>, Vec<u32>) = match raw.len() {
        0 => {
            let still = image::load_from_memory(bytes).context("decode still image")?;
            (vec![still.to_rgba8()], vec![STILL_FRAME_MS])
        }
        1 => {
            let only = raw.into_iter().map(|f| f.image).collect();
            (only, vec![STILL_FRAME_MS])
        }
        _ => raw
            .into_iter()
            .map(|f| {
                let ms = f.delay_ms.filter(|d| *d > 0).unwrap_or(DEFAULT_FRAME_MS);
                (f.image, ms)
            })
            .unzip(),
    };

    if let Some(target) = normalize_to {
        for frame in &mut frames {
            if frame.dimensions() != (target.width, target.height) {
                *frame = image::imageops::resize(
                    &*frame,
                    target.width,
                    target.height,
                    FilterType::CatmullRom,
                );
            }
        }
    }

    AnimatedImage::new(frames, durations)
}

/// Read and decode the file at `path`, selecting the codec by extension.
#[tracing::instrument(skip(registry))]
pub fn decode_file(
    registry: &CodecRegistry,
    path: &Path,
    normalize_to: Option<FrameSize>,
) -> PetResult<AnimatedImage> {
    let Some(codec) = registry.for_path(path) else {
        let msg = format!("no codec for '{}'", path.display());
        return Err(PetError::decode(msg));
    };
    let bytes = std::fs::read(path)
        .with_context(|| format!("read sprite bytes from '{}'", path.display()))?;
    decode_animation(codec.as_ref(), &bytes, normalize_to).map_err(|e| match e {
        PetError::Other(inner) => PetError::decode(format!(
            "'{}' ({}): {inner:#}",
            path.display(),
            codec.name()
        )),
        other => other,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/codec.rs"]
mod tests;
