//! Engine behavior with injected decode capabilities.
//!
//! These tests substitute the decode tiers with in-memory doubles so every
//! strategy branch can be driven without binary fixtures.

use std::io::Write;
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use tempfile::{NamedTempFile, TempDir};
use unspool::{
    Animation, CancellationToken, ExtractOptions, ExtractionRequest, Extractor, MultiFrameDecode,
    RawFrame, SingleFrameDecode, UnspoolError, frame_file_name,
};

fn pixels(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]))
}

/// Multi-frame double yielding scripted delays, optionally failing after a
/// number of good frames.
struct ScriptedMulti {
    delays: Vec<u32>,
    canvas: (u32, u32),
    available: bool,
    fail_after: Option<usize>,
}

impl ScriptedMulti {
    fn new(delays: &[u32], canvas: (u32, u32)) -> Self {
        Self {
            delays: delays.to_vec(),
            canvas,
            available: true,
            fail_after: None,
        }
    }
}

impl MultiFrameDecode for ScriptedMulti {
    fn is_available(&self) -> bool {
        self.available
    }

    fn decode(&self, _bytes: &[u8]) -> Result<Animation, UnspoolError> {
        let canvas = self.canvas;
        let mut frames: Vec<Result<RawFrame, UnspoolError>> = self
            .delays
            .iter()
            .map(|&delay| Ok(RawFrame::new(pixels(canvas.0, canvas.1), delay)))
            .collect();
        if let Some(good) = self.fail_after {
            frames.truncate(good);
            frames.push(Err(UnspoolError::DecodeFailed(
                "container truncated".to_owned(),
            )));
        }
        Ok(Animation::from_frames(canvas.0, canvas.1, frames))
    }
}

struct SolidSingle {
    size: (u32, u32),
}

impl SingleFrameDecode for SolidSingle {
    fn decode(&self, _bytes: &[u8]) -> Result<RgbaImage, UnspoolError> {
        Ok(pixels(self.size.0, self.size.1))
    }
}

struct FailingSingle;

impl SingleFrameDecode for FailingSingle {
    fn decode(&self, _bytes: &[u8]) -> Result<RgbaImage, UnspoolError> {
        Err(UnspoolError::DecodeFailed("unreadable bitmap".to_owned()))
    }
}

struct FailingMulti;

impl MultiFrameDecode for FailingMulti {
    fn decode(&self, _bytes: &[u8]) -> Result<Animation, UnspoolError> {
        Err(UnspoolError::DecodeFailed("bad container".to_owned()))
    }
}

/// Any readable local file works as input for the doubles.
fn scratch_input() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create scratch input");
    file.write_all(b"opaque container bytes").expect("seed input");
    file
}

fn extractor_with(
    multi: impl MultiFrameDecode + 'static,
    single: impl SingleFrameDecode + 'static,
) -> Extractor {
    Extractor::new()
        .with_multi_frame_decoder(Arc::new(multi))
        .with_single_frame_decoder(Arc::new(single))
}

// ── Primary path ─────────────────────────────────────────────────

#[test]
fn frames_in_temporal_order_with_normalized_delays() {
    let input = scratch_input();
    let out = TempDir::new().expect("create output dir");
    let output_dir = out.path().join("frames");

    let extractor = extractor_with(
        ScriptedMulti::new(&[5, 120, 0], (10, 8)),
        FailingSingle,
    );
    let request = ExtractionRequest::new(input.path().to_string_lossy(), &output_dir);
    let frames = extractor.extract(&request).expect("extraction succeeds");

    assert_eq!(frames.len(), 3);
    assert_eq!(
        frames.iter().map(|f| f.duration_ms).collect::<Vec<_>>(),
        vec![100, 120, 100]
    );
    for (index, frame) in frames.iter().enumerate() {
        assert_eq!(frame.width, 10);
        assert_eq!(frame.height, 8);
        assert_eq!(
            frame.path.file_name().and_then(|n| n.to_str()),
            Some(frame_file_name(index as u64).as_str())
        );
        assert!(frame.path.exists(), "frame {index} missing on disk");
    }

    let mut written: Vec<String> = std::fs::read_dir(&output_dir)
        .expect("list output dir")
        .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    written.sort();
    assert_eq!(
        written,
        vec![
            "frame_00000000.png",
            "frame_00000001.png",
            "frame_00000002.png",
        ]
    );
}

#[test]
fn background_worker_delivers_result_once() {
    let input = scratch_input();
    let out = TempDir::new().expect("create output dir");

    let extractor = extractor_with(ScriptedMulti::new(&[40, 60], (4, 4)), FailingSingle);
    let handle = extractor.spawn(
        ExtractionRequest::new(input.path().to_string_lossy(), out.path().join("frames")),
        ExtractOptions::new(),
    );

    let frames = handle.join().expect("background extraction succeeds");
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].duration_ms, 40);
}

// ── Fallback tier ────────────────────────────────────────────────

#[test]
fn unavailable_multi_decoder_degrades_to_single_frame() {
    let input = scratch_input();
    let out = TempDir::new().expect("create output dir");

    let mut multi = ScriptedMulti::new(&[50], (10, 10));
    multi.available = false;
    let extractor = extractor_with(multi, SolidSingle { size: (7, 9) });
    let request = ExtractionRequest::new(input.path().to_string_lossy(), out.path().join("frames"));
    let frames = extractor.extract(&request).expect("fallback succeeds");

    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].duration_ms, 100);
    assert_eq!((frames[0].width, frames[0].height), (7, 9));
}

#[test]
fn zero_frames_from_primary_degrades_to_single_frame() {
    let input = scratch_input();
    let out = TempDir::new().expect("create output dir");

    let extractor = extractor_with(
        ScriptedMulti::new(&[], (10, 10)),
        SolidSingle { size: (3, 3) },
    );
    let request = ExtractionRequest::new(input.path().to_string_lossy(), out.path().join("frames"));
    let frames = extractor.extract(&request).expect("fallback succeeds");

    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].duration_ms, 100);
}

#[test]
fn mid_stream_failure_restarts_with_fallback() {
    let input = scratch_input();
    let out = TempDir::new().expect("create output dir");
    let output_dir = out.path().join("frames");

    let mut multi = ScriptedMulti::new(&[40, 60, 80], (6, 6));
    multi.fail_after = Some(2);
    let extractor = extractor_with(multi, SolidSingle { size: (5, 5) });
    let request = ExtractionRequest::new(input.path().to_string_lossy(), &output_dir);
    let frames = extractor.extract(&request).expect("fallback succeeds");

    // Frames decoded before the error are discarded, not salvaged.
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].duration_ms, 100);
    assert_eq!((frames[0].width, frames[0].height), (5, 5));
    assert_eq!(
        frames[0].path.file_name().and_then(|n| n.to_str()),
        Some("frame_00000000.png")
    );
}

// ── Terminal failures ────────────────────────────────────────────

#[test]
fn both_tiers_failing_is_decode_failed_and_creates_nothing() {
    let input = scratch_input();
    let out = TempDir::new().expect("create output dir");
    let output_dir = out.path().join("frames");

    let extractor = extractor_with(FailingMulti, FailingSingle);
    let request = ExtractionRequest::new(input.path().to_string_lossy(), &output_dir);
    let error = extractor.extract(&request).expect_err("extraction fails");

    assert_eq!(error.code(), "decode-failed");
    assert!(
        !output_dir.exists(),
        "output directory must not be created when decoding fails"
    );
}

#[test]
fn write_failure_aborts_extraction() {
    let input = scratch_input();
    // Using an existing *file* as the output directory makes directory
    // creation fail.
    let collision = NamedTempFile::new().expect("create colliding file");

    let extractor = extractor_with(ScriptedMulti::new(&[40], (4, 4)), FailingSingle);
    let request = ExtractionRequest::new(input.path().to_string_lossy(), collision.path());
    let error = extractor.extract(&request).expect_err("extraction fails");

    assert_eq!(error.code(), "write-failed");
}

#[test]
fn missing_local_input_is_input_not_found() {
    let out = TempDir::new().expect("create output dir");
    let output_dir = out.path().join("frames");

    let extractor = extractor_with(ScriptedMulti::new(&[40], (4, 4)), FailingSingle);
    let request = ExtractionRequest::new("/nonexistent/animation.webp", &output_dir);
    let error = extractor.extract(&request).expect_err("extraction fails");

    assert_eq!(error.code(), "input-not-found");
    assert!(
        !output_dir.exists(),
        "output directory must not be created when the input is missing"
    );
}

#[test]
fn cancelled_token_stops_before_any_write() {
    let input = scratch_input();
    let out = TempDir::new().expect("create output dir");
    let output_dir = out.path().join("frames");

    let token = CancellationToken::new();
    token.cancel();
    let options = ExtractOptions::new().with_cancellation(token);

    let extractor = extractor_with(ScriptedMulti::new(&[40], (4, 4)), FailingSingle);
    let request = ExtractionRequest::new(input.path().to_string_lossy(), &output_dir);
    let error = extractor
        .extract_with_options(&request, &options)
        .expect_err("extraction is cancelled");

    assert_eq!(error.code(), "cancelled");
    assert!(!output_dir.exists());
}
