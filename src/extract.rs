//! The extraction engine.
//!
//! [`Extractor`] composes the input resolver, the two decode tiers, the
//! delay normalizer, and the frame writer into one operation: resolve →
//! decode (with fallback) → normalize → write → return ordered
//! [`FrameDescriptor`]s. Each request runs the pipeline exactly once to a
//! terminal state; there is no retry anywhere, and a request shares no
//! state with any other request.

use std::{
    fmt::{self, Display, Formatter},
    path::PathBuf,
    sync::Arc,
    sync::mpsc::{Receiver, sync_channel},
    thread,
};

use crate::decode::{
    ImageMultiFrameDecoder, ImageSingleFrameDecoder, MultiFrameDecode, SingleFrameDecode,
};
use crate::error::UnspoolError;
use crate::input::{self, HttpTransport, InputDescriptor, Transport};
use crate::options::ExtractOptions;
use crate::progress::ProgressTracker;
use crate::strategy::DecodeStrategy;
use crate::timing::normalize_delay;
use crate::writer::FrameWriter;

/// One extraction request: an input to unspool and a directory to fill.
///
/// Immutable; create one per invocation.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Input image: `http(s)://` URI, `file://<path>`, or a bare local path.
    pub input: String,
    /// Output directory, created if missing.
    pub output_dir: PathBuf,
}

impl ExtractionRequest {
    /// Build a request from an input string and an output directory.
    pub fn new(input: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
        }
    }
}

/// The durable record of one extracted frame.
///
/// `path` refers to a file that was written before this descriptor was
/// emitted; `duration_ms` is always the normalized value, never the raw
/// decoder delay; `width`/`height` are the animation's canvas size (or the
/// bitmap's own size on the degraded single-frame path).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameDescriptor {
    /// Path of the written PNG.
    pub path: PathBuf,
    /// Normalized display duration in milliseconds.
    pub duration_ms: u32,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
}

/// Pipeline stage, recorded in failure diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Resolving,
    Decoding,
    Writing,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Resolving => write!(f, "resolving"),
            Stage::Decoding => write!(f, "decoding"),
            Stage::Writing => write!(f, "writing"),
        }
    }
}

/// The frame-extraction engine.
///
/// Holds the three injected collaborator capabilities: the transport used
/// for remote inputs, and the two decode tiers. [`Extractor::new`] wires
/// the ecosystem defaults; the `with_*` builders substitute alternatives
/// (or test doubles).
///
/// # Example
///
/// ```no_run
/// use unspool::{ExtractionRequest, Extractor, UnspoolError};
///
/// let extractor = Extractor::new();
/// let frames = extractor.extract(&ExtractionRequest::new("animation.webp", "frames"))?;
/// for frame in &frames {
///     println!(
///         "{} shown for {} ms ({}x{})",
///         frame.path.display(),
///         frame.duration_ms,
///         frame.width,
///         frame.height,
///     );
/// }
/// # Ok::<(), UnspoolError>(())
/// ```
#[derive(Clone)]
pub struct Extractor {
    transport: Arc<dyn Transport>,
    multi_frame: Arc<dyn MultiFrameDecode>,
    single_frame: Arc<dyn SingleFrameDecode>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    /// Create an extractor with the default capabilities: an HTTP
    /// transport, the `image`-backed multi-frame decoder, and the
    /// `image`-backed single-frame decoder.
    pub fn new() -> Self {
        Self {
            transport: Arc::new(HttpTransport::new()),
            multi_frame: Arc::new(ImageMultiFrameDecoder::new()),
            single_frame: Arc::new(ImageSingleFrameDecoder::new()),
        }
    }

    /// Substitute the transport used for `http(s)://` inputs.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// Substitute the multi-frame decode capability.
    #[must_use]
    pub fn with_multi_frame_decoder(mut self, decoder: Arc<dyn MultiFrameDecode>) -> Self {
        self.multi_frame = decoder;
        self
    }

    /// Substitute the single-frame decode capability.
    #[must_use]
    pub fn with_single_frame_decoder(mut self, decoder: Arc<dyn SingleFrameDecode>) -> Self {
        self.single_frame = decoder;
        self
    }

    /// Run one extraction to completion on the calling thread.
    ///
    /// Equivalent to [`extract_with_options`](Extractor::extract_with_options)
    /// with default options.
    pub fn extract(
        &self,
        request: &ExtractionRequest,
    ) -> Result<Vec<FrameDescriptor>, UnspoolError> {
        self.extract_with_options(request, &ExtractOptions::new())
    }

    /// Run one extraction to completion on the calling thread.
    ///
    /// On success the returned descriptors are in temporal order (frame 0
    /// first) and every referenced file exists on disk. On failure no
    /// descriptor list is returned, even if some frames were written before
    /// the failure.
    ///
    /// # Errors
    ///
    /// - [`UnspoolError::UnsupportedInput`] for unrecognised input schemes.
    /// - [`UnspoolError::InputNotFound`] if a local input does not exist.
    /// - [`UnspoolError::FetchFailed`] if a remote input cannot be fetched.
    /// - [`UnspoolError::DecodeFailed`] if both decode tiers fail, or the
    ///   pipeline would otherwise produce zero frames.
    /// - [`UnspoolError::WriteFailed`] if any frame cannot be persisted;
    ///   extraction is all-or-nothing, so the first write failure aborts
    ///   the remaining sequence.
    /// - [`UnspoolError::Cancelled`] if the options' cancellation token
    ///   fires between steps.
    pub fn extract_with_options(
        &self,
        request: &ExtractionRequest,
        options: &ExtractOptions,
    ) -> Result<Vec<FrameDescriptor>, UnspoolError> {
        let mut stage = Stage::Resolving;
        let result = self.run(request, options, &mut stage);
        match &result {
            Ok(frames) => log::debug!(
                "extracted {} frame(s) from {} into {}",
                frames.len(),
                request.input,
                request.output_dir.display(),
            ),
            Err(error) => log::error!(
                "extraction of {} failed while {stage} [{}]: {error}",
                request.input,
                error.code(),
            ),
        }
        result
    }

    fn run(
        &self,
        request: &ExtractionRequest,
        options: &ExtractOptions,
        stage: &mut Stage,
    ) -> Result<Vec<FrameDescriptor>, UnspoolError> {
        *stage = Stage::Resolving;
        log::debug!("resolving input {}", request.input);
        let descriptor = InputDescriptor::parse(&request.input)?;
        let bytes = input::resolve(&descriptor, self.transport.as_ref())?;

        if options.is_cancelled() {
            return Err(UnspoolError::Cancelled);
        }

        *stage = Stage::Decoding;
        log::debug!("decoding {} byte(s)", bytes.len());
        let strategy = DecodeStrategy::new(self.multi_frame.as_ref(), self.single_frame.as_ref());
        let mut decoded = strategy.decode(&bytes)?;

        if options.is_cancelled() {
            return Err(UnspoolError::Cancelled);
        }

        *stage = Stage::Writing;
        let writer = FrameWriter::create(&request.output_dir)?;
        let mut tracker = ProgressTracker::new(options.progress.clone(), None, options.batch_size);
        let mut descriptors: Vec<FrameDescriptor> = Vec::new();
        let mut index: u64 = 0;

        loop {
            if options.is_cancelled() {
                return Err(UnspoolError::Cancelled);
            }

            match decoded.next() {
                None => break,
                Some(Ok(frame)) => {
                    let duration_ms = normalize_delay(frame.delay_ms);
                    let path = writer.write(frame, index)?;
                    descriptors.push(FrameDescriptor {
                        path,
                        duration_ms,
                        width: decoded.canvas_width,
                        height: decoded.canvas_height,
                    });
                    tracker.advance(index);
                    index += 1;
                }
                Some(Err(error)) => {
                    if decoded.degraded {
                        return Err(error);
                    }
                    // A primary-tier error partway through is total tier
                    // failure: drop whatever it produced and rerun the
                    // single-frame fallback on the original bytes.
                    log::warn!(
                        "multi-frame decode failed mid-stream ({error}), \
                         restarting with the single-frame fallback"
                    );
                    decoded = strategy.fallback(&bytes)?;
                    descriptors.clear();
                    index = 0;
                    tracker =
                        ProgressTracker::new(options.progress.clone(), None, options.batch_size);
                }
            }
        }

        if descriptors.is_empty() {
            return Err(UnspoolError::DecodeFailed(
                "decoder produced no frames".to_owned(),
            ));
        }

        tracker.finish();
        Ok(descriptors)
    }

    /// Run one extraction on a dedicated background worker thread.
    ///
    /// The calling thread is never blocked; the result is delivered exactly
    /// once through the returned [`ExtractionHandle`]. Delivery
    /// happens-after every filesystem write of a successful extraction.
    pub fn spawn(&self, request: ExtractionRequest, options: ExtractOptions) -> ExtractionHandle {
        let extractor = self.clone();
        let (sender, receiver) = sync_channel(1);
        thread::spawn(move || {
            let result = extractor.extract_with_options(&request, &options);
            // The caller may have dropped the handle; the result is then
            // discarded along with the channel.
            let _ = sender.send(result);
        });
        ExtractionHandle { receiver }
    }
}

/// Single-fire handle to a background extraction started with
/// [`Extractor::spawn`].
///
/// # Example
///
/// ```no_run
/// use unspool::{ExtractOptions, ExtractionRequest, Extractor, UnspoolError};
///
/// let extractor = Extractor::new();
/// let handle = extractor.spawn(
///     ExtractionRequest::new("https://example.com/animation.webp", "frames"),
///     ExtractOptions::new(),
/// );
/// // ... do other work ...
/// let frames = handle.join()?;
/// # Ok::<(), UnspoolError>(())
/// ```
pub struct ExtractionHandle {
    receiver: Receiver<Result<Vec<FrameDescriptor>, UnspoolError>>,
}

impl ExtractionHandle {
    /// Block until the background extraction delivers its result.
    pub fn join(self) -> Result<Vec<FrameDescriptor>, UnspoolError> {
        self.receiver.recv().unwrap_or_else(|_| {
            Err(UnspoolError::Unknown(
                "extraction worker exited without delivering a result".to_owned(),
            ))
        })
    }

    /// Check for a result without blocking.
    ///
    /// Returns `None` while the extraction is still running. Once the
    /// result has been taken, subsequent calls return `None` forever.
    pub fn try_join(&self) -> Option<Result<Vec<FrameDescriptor>, UnspoolError>> {
        self.receiver.try_recv().ok()
    }
}
