//! Remote-input resolution with a transport double.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use image::{Rgba, RgbaImage};
use tempfile::TempDir;
use unspool::{
    Animation, ExtractionRequest, Extractor, MultiFrameDecode, SingleFrameDecode, Transport,
    UnspoolError,
};

struct CannedTransport {
    body: Vec<u8>,
}

impl Transport for CannedTransport {
    fn fetch(&self, _uri: &str) -> Result<Vec<u8>, UnspoolError> {
        Ok(self.body.clone())
    }
}

struct DeadTransport;

impl Transport for DeadTransport {
    fn fetch(&self, uri: &str) -> Result<Vec<u8>, UnspoolError> {
        Err(UnspoolError::FetchFailed {
            uri: uri.to_owned(),
            reason: "server returned 404 Not Found".to_owned(),
        })
    }
}

/// Multi-frame double that records whether it was ever invoked.
struct RecordingMulti {
    invoked: Arc<AtomicBool>,
    available: bool,
}

impl MultiFrameDecode for RecordingMulti {
    fn is_available(&self) -> bool {
        self.available
    }

    fn decode(&self, _bytes: &[u8]) -> Result<Animation, UnspoolError> {
        self.invoked.store(true, Ordering::SeqCst);
        Err(UnspoolError::DecodeFailed("not animated".to_owned()))
    }
}

struct SolidSingle;

impl SingleFrameDecode for SolidSingle {
    fn decode(&self, _bytes: &[u8]) -> Result<RgbaImage, UnspoolError> {
        Ok(RgbaImage::from_pixel(16, 12, Rgba([0, 0, 0, 255])))
    }
}

#[test]
fn remote_static_image_with_unavailable_multi_decoder() {
    let out = TempDir::new().expect("create output dir");
    let invoked = Arc::new(AtomicBool::new(false));

    let extractor = Extractor::new()
        .with_transport(Arc::new(CannedTransport {
            body: b"remote container bytes".to_vec(),
        }))
        .with_multi_frame_decoder(Arc::new(RecordingMulti {
            invoked: invoked.clone(),
            available: false,
        }))
        .with_single_frame_decoder(Arc::new(SolidSingle));

    let request = ExtractionRequest::new(
        "https://example.com/still.webp",
        out.path().join("frames"),
    );
    let frames = extractor.extract(&request).expect("degraded success");

    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].duration_ms, 100);
    assert_eq!((frames[0].width, frames[0].height), (16, 12));
    assert!(!invoked.load(Ordering::SeqCst));
}

#[test]
fn failed_fetch_reaches_no_decoder() {
    let out = TempDir::new().expect("create output dir");
    let invoked = Arc::new(AtomicBool::new(false));

    let extractor = Extractor::new()
        .with_transport(Arc::new(DeadTransport))
        .with_multi_frame_decoder(Arc::new(RecordingMulti {
            invoked: invoked.clone(),
            available: true,
        }))
        .with_single_frame_decoder(Arc::new(SolidSingle));

    let request = ExtractionRequest::new(
        "http://example.com/missing.gif",
        out.path().join("frames"),
    );
    let error = extractor.extract(&request).expect_err("fetch fails");

    assert_eq!(error.code(), "fetch-failed");
    assert!(
        !invoked.load(Ordering::SeqCst),
        "no bytes may reach a decoder after a failed fetch"
    );
}
