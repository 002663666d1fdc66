//! Decode capability interfaces and their `image`-backed defaults.
//!
//! Two narrow capabilities feed the extraction engine:
//!
//! - [`MultiFrameDecode`] enumerates every frame of an animated container
//!   together with its intrinsic display delay and the container's canvas
//!   size. This is the primary tier.
//! - [`SingleFrameDecode`] decodes the first/static frame of any supported
//!   image. It exists as a degraded fallback for deployments where a
//!   multi-frame-capable decoder is not guaranteed.
//!
//! Frames stream out of an [`Animation`] one at a time, so peak memory stays
//! at one decoded frame regardless of how many frames the container holds.

use std::io::Cursor;

use image::codecs::{gif::GifDecoder, png::PngDecoder, webp::WebPDecoder};
use image::{AnimationDecoder, ImageDecoder, ImageFormat, RgbaImage};

use crate::error::UnspoolError;

/// One decoded frame: its full-canvas RGBA raster and the delay the
/// container reported for it.
///
/// Scoped to a single iteration of the decode loop — the engine moves each
/// frame into the writer and drops it before pulling the next one.
pub struct RawFrame {
    /// Composited RGBA pixels.
    pub buffer: RgbaImage,
    /// Intrinsic display delay in milliseconds, `0` when the decoder
    /// cannot report timing.
    pub delay_ms: u32,
}

impl RawFrame {
    /// Wrap a decoded raster and its reported delay.
    pub fn new(buffer: RgbaImage, delay_ms: u32) -> Self {
        Self { buffer, delay_ms }
    }

    /// Raster width in pixels.
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// Raster height in pixels.
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }
}

/// A decoded animation: canvas dimensions plus a lazy frame stream.
///
/// Returned by [`MultiFrameDecode::decode`]. Iterating yields
/// `Result<RawFrame, UnspoolError>` values in temporal order; an `Err`
/// partway through means the container is truncated or corrupt from that
/// frame onward.
pub struct Animation {
    /// Declared width of the animation canvas.
    pub canvas_width: u32,
    /// Declared height of the animation canvas.
    pub canvas_height: u32,
    frames: Box<dyn Iterator<Item = Result<RawFrame, UnspoolError>>>,
}

impl Animation {
    /// Build an animation from canvas dimensions and a frame iterator.
    pub fn from_frames<I>(canvas_width: u32, canvas_height: u32, frames: I) -> Self
    where
        I: IntoIterator<Item = Result<RawFrame, UnspoolError>>,
        I::IntoIter: 'static,
    {
        Self {
            canvas_width,
            canvas_height,
            frames: Box::new(frames.into_iter()),
        }
    }
}

impl Iterator for Animation {
    type Item = Result<RawFrame, UnspoolError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.frames.next()
    }
}

/// Capability: enumerate all frames of an animated container.
pub trait MultiFrameDecode: Send + Sync {
    /// Whether this capability is present on the current deployment.
    ///
    /// When `false`, the engine skips the primary tier entirely and
    /// degrades to [`SingleFrameDecode`].
    fn is_available(&self) -> bool {
        true
    }

    /// Decode `bytes` into a streaming [`Animation`].
    ///
    /// Implementations should fail (rather than synthesize a single frame)
    /// for containers that carry no animation; the engine routes those
    /// through the fallback tier.
    fn decode(&self, bytes: &[u8]) -> Result<Animation, UnspoolError>;
}

/// Capability: decode the first/static frame of any supported image.
pub trait SingleFrameDecode: Send + Sync {
    /// Decode `bytes` into a single RGBA raster.
    fn decode(&self, bytes: &[u8]) -> Result<RgbaImage, UnspoolError>;
}

/// Default [`MultiFrameDecode`] backed by the `image` crate.
///
/// Supports GIF, animated WebP, and APNG. Frames come out already
/// composited onto the full canvas (blend and dispose methods applied), so
/// every frame of one animation has identical, canvas-sized dimensions.
#[derive(Debug, Clone, Default)]
pub struct ImageMultiFrameDecoder;

impl ImageMultiFrameDecoder {
    /// Create the default multi-frame decoder.
    pub fn new() -> Self {
        Self
    }
}

impl MultiFrameDecode for ImageMultiFrameDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Animation, UnspoolError> {
        let format = image::guess_format(bytes)
            .map_err(|error| UnspoolError::DecodeFailed(error.to_string()))?;
        let reader = Cursor::new(bytes.to_vec());

        match format {
            ImageFormat::Gif => {
                let decoder = GifDecoder::new(reader)
                    .map_err(|error| UnspoolError::DecodeFailed(error.to_string()))?;
                let (canvas_width, canvas_height) = decoder.dimensions();
                Ok(Animation::from_frames(
                    canvas_width,
                    canvas_height,
                    convert_frames(decoder.into_frames()),
                ))
            }
            ImageFormat::WebP => {
                let decoder = WebPDecoder::new(reader)
                    .map_err(|error| UnspoolError::DecodeFailed(error.to_string()))?;
                if !decoder.has_animation() {
                    return Err(UnspoolError::DecodeFailed(
                        "WebP image carries no animation".to_owned(),
                    ));
                }
                let (canvas_width, canvas_height) = decoder.dimensions();
                Ok(Animation::from_frames(
                    canvas_width,
                    canvas_height,
                    convert_frames(decoder.into_frames()),
                ))
            }
            ImageFormat::Png => {
                let decoder = PngDecoder::new(reader)
                    .map_err(|error| UnspoolError::DecodeFailed(error.to_string()))?;
                let animated = decoder
                    .is_apng()
                    .map_err(|error| UnspoolError::DecodeFailed(error.to_string()))?;
                if !animated {
                    return Err(UnspoolError::DecodeFailed(
                        "PNG image carries no animation".to_owned(),
                    ));
                }
                let (canvas_width, canvas_height) = decoder.dimensions();
                let apng = decoder
                    .apng()
                    .map_err(|error| UnspoolError::DecodeFailed(error.to_string()))?;
                Ok(Animation::from_frames(
                    canvas_width,
                    canvas_height,
                    convert_frames(apng.into_frames()),
                ))
            }
            other => Err(UnspoolError::DecodeFailed(format!(
                "container format {other:?} has no animation support"
            ))),
        }
    }
}

/// Map the `image` crate's frame stream into [`RawFrame`] values.
fn convert_frames(
    frames: image::Frames<'static>,
) -> impl Iterator<Item = Result<RawFrame, UnspoolError>> + 'static {
    frames.map(|frame| match frame {
        Ok(frame) => {
            let (numerator, denominator) = frame.delay().numer_denom_ms();
            // Delay is a rational in milliseconds; round half up.
            let delay_ms = if denominator == 0 {
                0
            } else {
                (numerator + denominator / 2) / denominator
            };
            Ok(RawFrame::new(frame.into_buffer(), delay_ms))
        }
        Err(error) => Err(UnspoolError::DecodeFailed(error.to_string())),
    })
}

/// Default [`SingleFrameDecode`] backed by `image::load_from_memory`.
///
/// Handles every still format the `image` crate understands, plus the first
/// frame of animated containers.
#[derive(Debug, Clone, Default)]
pub struct ImageSingleFrameDecoder;

impl ImageSingleFrameDecoder {
    /// Create the default single-frame decoder.
    pub fn new() -> Self {
        Self
    }
}

impl SingleFrameDecode for ImageSingleFrameDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<RgbaImage, UnspoolError> {
        image::load_from_memory(bytes)
            .map(|image| image.into_rgba8())
            .map_err(|error| UnspoolError::DecodeFailed(error.to_string()))
    }
}
