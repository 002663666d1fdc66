//! # unspool
//!
//! Unspool animated images — extract every frame of an animated WebP, GIF,
//! or APNG as individual still-image files with timing metadata.
//!
//! `unspool` turns one animated container into an ordered sequence of
//! lossless PNG files, one per frame, each annotated with its normalized
//! display duration and canvas dimensions. It serves callers that need
//! per-frame access to an animation (re-encoding, analysis, frame-by-frame
//! display) rather than a single composited preview.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unspool::{ExtractionRequest, Extractor};
//!
//! let extractor = Extractor::new();
//! let frames = extractor.extract(&ExtractionRequest::new("animation.webp", "frames")).unwrap();
//!
//! for frame in &frames {
//!     println!("{} shown for {} ms", frame.path.display(), frame.duration_ms);
//! }
//! ```
//!
//! ### Remote Inputs
//!
//! Inputs may be bare local paths, `file://` URIs, or `http(s)://` URIs.
//! Remote bytes are fetched once (no retries) into a private per-request
//! temporary file before decoding:
//!
//! ```no_run
//! use unspool::{ExtractionRequest, Extractor, UnspoolError};
//!
//! let request = ExtractionRequest::new("https://example.com/animation.webp", "frames");
//! let frames = Extractor::new().extract(&request)?;
//! # Ok::<(), UnspoolError>(())
//! ```
//!
//! ### Background Extraction
//!
//! ```no_run
//! use unspool::{ExtractOptions, ExtractionRequest, Extractor, UnspoolError};
//!
//! let extractor = Extractor::new();
//! let handle = extractor.spawn(
//!     ExtractionRequest::new("animation.gif", "frames"),
//!     ExtractOptions::new(),
//! );
//! // The calling thread is free; the result is delivered exactly once.
//! let frames = handle.join()?;
//! # Ok::<(), UnspoolError>(())
//! ```
//!
//! ## Decode Tiers
//!
//! Extraction tries a **multi-frame decoder** first (full animation
//! fidelity: every frame, true per-frame timing, the container's canvas
//! size). When that capability is unavailable, fails, or reports zero
//! frames, it degrades to a **single-frame decoder** that produces exactly
//! one frame with a synthetic 100 ms duration — degraded success is still
//! success. Only when both tiers fail does extraction fail. Both
//! capabilities are traits ([`MultiFrameDecode`], [`SingleFrameDecode`])
//! injected into the [`Extractor`], so either tier can be swapped out.
//!
//! ## Frame Files
//!
//! Frames are written as `frame_00000000.png`, `frame_00000001.png`, … —
//! zero-padded so a lexicographic listing of the output directory is the
//! temporal frame order. Per-frame delays at or below 10 ms are authoring
//! artifacts and are floored to 100 ms (see [`normalize_delay`]).
//!
//! ## Features
//!
//! - **Frame extraction** — GIF, animated WebP, and APNG via the `image`
//!   crate, streaming one frame at a time regardless of animation length
//! - **Graceful degradation** — single-frame fallback for static images
//!   and decoder-less deployments
//! - **Local and remote inputs** — bare paths, `file://`, `http://`,
//!   `https://`
//! - **Progress & cancellation** — cooperative callbacks and
//!   [`CancellationToken`] consulted between pipeline steps
//! - **Background workers** — per-request worker threads with single-fire
//!   result delivery
//!
//! ### Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `async` | [`Extractor::extract_async`] returning a single-fire future via Tokio |
//! | `full`  | Enables all of the above |
//!
//! ## Concurrency Notes
//!
//! Requests share no state: no content cache, no fetch deduplication, no
//! locking. Two concurrent requests targeting the same output directory
//! have undefined interleaving — give each request its own directory.

pub mod decode;
pub mod error;
pub mod extract;
#[cfg(feature = "async")]
pub mod future;
pub mod input;
pub mod options;
pub mod progress;
mod strategy;
pub mod timing;
pub mod writer;

pub use decode::{
    Animation, ImageMultiFrameDecoder, ImageSingleFrameDecoder, MultiFrameDecode, RawFrame,
    SingleFrameDecode,
};
pub use error::UnspoolError;
pub use extract::{ExtractionHandle, ExtractionRequest, Extractor, FrameDescriptor};
#[cfg(feature = "async")]
pub use future::ExtractionFuture;
pub use input::{HttpTransport, InputDescriptor, Transport};
pub use options::ExtractOptions;
pub use progress::{CancellationToken, ProgressCallback, ProgressInfo};
pub use timing::{DEFAULT_FRAME_DELAY_MS, DELAY_FLOOR_THRESHOLD_MS, normalize_delay};
pub use writer::frame_file_name;
