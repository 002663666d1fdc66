//! Decode strategy selection.
//!
//! Two tiers, first success wins: the multi-frame tier preserves true
//! per-frame timing and the container's canvas size; the single-frame tier
//! degrades to "first frame only, synthetic timing" so the contract stays
//! total on deployments without a multi-frame-capable decoder. Degraded
//! success is still success and is surfaced only as a warning.

use std::iter;

use crate::decode::{MultiFrameDecode, RawFrame, SingleFrameDecode};
use crate::error::UnspoolError;
use crate::timing::DEFAULT_FRAME_DELAY_MS;

/// Output of the strategy selector: canvas dimensions, which tier produced
/// the frames, and the frame stream itself.
pub(crate) struct DecodedFrames {
    pub(crate) canvas_width: u32,
    pub(crate) canvas_height: u32,
    /// `true` when the single-frame fallback produced this result.
    pub(crate) degraded: bool,
    frames: Box<dyn Iterator<Item = Result<RawFrame, UnspoolError>>>,
}

impl Iterator for DecodedFrames {
    type Item = Result<RawFrame, UnspoolError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.frames.next()
    }
}

pub(crate) struct DecodeStrategy<'a> {
    multi_frame: &'a dyn MultiFrameDecode,
    single_frame: &'a dyn SingleFrameDecode,
}

impl<'a> DecodeStrategy<'a> {
    pub(crate) fn new(
        multi_frame: &'a dyn MultiFrameDecode,
        single_frame: &'a dyn SingleFrameDecode,
    ) -> Self {
        Self {
            multi_frame,
            single_frame,
        }
    }

    /// Select a decode tier for `bytes`.
    ///
    /// The primary tier is used verbatim when it is available and yields at
    /// least one frame. The first frame is pulled eagerly so an empty or
    /// immediately-failing animation degrades here rather than surfacing as
    /// a zero-frame "success" downstream.
    pub(crate) fn decode(&self, bytes: &[u8]) -> Result<DecodedFrames, UnspoolError> {
        if !self.multi_frame.is_available() {
            log::warn!("multi-frame decoder unavailable, degrading to single-frame decode");
            return self.fallback(bytes);
        }

        match self.multi_frame.decode(bytes) {
            Ok(animation) => {
                let canvas_width = animation.canvas_width;
                let canvas_height = animation.canvas_height;
                let mut frames = animation.fuse();
                match frames.next() {
                    Some(Ok(first)) => Ok(DecodedFrames {
                        canvas_width,
                        canvas_height,
                        degraded: false,
                        frames: Box::new(iter::once(Ok(first)).chain(frames)),
                    }),
                    Some(Err(error)) => {
                        log::warn!(
                            "multi-frame decode failed ({error}), degrading to single-frame decode"
                        );
                        self.fallback(bytes)
                    }
                    None => {
                        log::warn!(
                            "multi-frame decoder reported zero frames, degrading to single-frame decode"
                        );
                        self.fallback(bytes)
                    }
                }
            }
            Err(error) => {
                log::warn!("multi-frame decode failed ({error}), degrading to single-frame decode");
                self.fallback(bytes)
            }
        }
    }

    /// Run the single-frame tier: exactly one frame with the default delay
    /// and a canvas equal to the decoded bitmap's own dimensions.
    pub(crate) fn fallback(&self, bytes: &[u8]) -> Result<DecodedFrames, UnspoolError> {
        let bitmap = self.single_frame.decode(bytes)?;
        let frame = RawFrame::new(bitmap, DEFAULT_FRAME_DELAY_MS);
        Ok(DecodedFrames {
            canvas_width: frame.width(),
            canvas_height: frame.height(),
            degraded: true,
            frames: Box::new(iter::once(Ok(frame))),
        })
    }
}
