//! ExtractionFuture tests (feature = "async").

#![cfg(feature = "async")]

use std::sync::Arc;

use image::{Rgba, RgbaImage};
use tempfile::TempDir;
use unspool::{
    Animation, ExtractOptions, ExtractionRequest, Extractor, MultiFrameDecode, RawFrame,
    SingleFrameDecode, UnspoolError,
};

struct TwoFrames;

impl MultiFrameDecode for TwoFrames {
    fn decode(&self, _bytes: &[u8]) -> Result<Animation, UnspoolError> {
        let frames: Vec<Result<RawFrame, UnspoolError>> = vec![
            Ok(RawFrame::new(
                RgbaImage::from_pixel(3, 3, Rgba([255, 0, 0, 255])),
                80,
            )),
            Ok(RawFrame::new(
                RgbaImage::from_pixel(3, 3, Rgba([0, 255, 0, 255])),
                5,
            )),
        ];
        Ok(Animation::from_frames(3, 3, frames))
    }
}

struct NoSingle;

impl SingleFrameDecode for NoSingle {
    fn decode(&self, _bytes: &[u8]) -> Result<RgbaImage, UnspoolError> {
        Err(UnspoolError::DecodeFailed("unused".to_owned()))
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn future_resolves_with_ordered_frames() {
    let dir = TempDir::new().expect("create scratch dir");
    let input = dir.path().join("input.bin");
    std::fs::write(&input, b"bytes").expect("seed input");

    let extractor = Extractor::new()
        .with_multi_frame_decoder(Arc::new(TwoFrames))
        .with_single_frame_decoder(Arc::new(NoSingle));

    let frames = extractor
        .extract_async(
            ExtractionRequest::new(input.to_string_lossy(), dir.path().join("frames")),
            ExtractOptions::new(),
        )
        .await
        .expect("async extraction succeeds");

    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].duration_ms, 80);
    assert_eq!(frames[1].duration_ms, 100);
    assert!(frames.iter().all(|frame| frame.path.exists()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn future_surfaces_failures() {
    let dir = TempDir::new().expect("create scratch dir");

    let error = Extractor::new()
        .extract_async(
            ExtractionRequest::new("/nonexistent/animation.webp", dir.path().join("frames")),
            ExtractOptions::new(),
        )
        .await
        .expect_err("async extraction fails");

    assert_eq!(error.code(), "input-not-found");
}
