//! Async extraction support.
//!
//! [`ExtractionFuture`] runs an extraction on a Tokio blocking thread via
//! `tokio::task::spawn_blocking` and resolves exactly once with the full
//! result. The resolver's network fetch, both decode tiers, and the
//! per-frame filesystem writes are all blocking calls, so keeping them off
//! the async runtime's cooperative task budget matters.
//!
//! # Example
//!
//! ```no_run
//! use unspool::{ExtractOptions, ExtractionRequest, Extractor, UnspoolError};
//!
//! # async fn example() -> Result<(), UnspoolError> {
//! let extractor = Extractor::new();
//! let frames = extractor
//!     .extract_async(
//!         ExtractionRequest::new("https://example.com/animation.webp", "frames"),
//!         ExtractOptions::new(),
//!     )
//!     .await?;
//! println!("extracted {} frame(s)", frames.len());
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;

use crate::error::UnspoolError;
use crate::extract::{ExtractionRequest, Extractor, FrameDescriptor};
use crate::options::ExtractOptions;

/// A future that resolves to the ordered frame descriptors of one
/// extraction.
///
/// Created via [`Extractor::extract_async`]. The extraction runs on a
/// blocking thread; polling this future drives it to completion. Dropping
/// the future detaches the background task — the extraction itself is not
/// interrupted (attach a
/// [`CancellationToken`](crate::CancellationToken) for that).
pub struct ExtractionFuture {
    handle: JoinHandle<Result<Vec<FrameDescriptor>, UnspoolError>>,
}

impl Future for ExtractionFuture {
    type Output = Result<Vec<FrameDescriptor>, UnspoolError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle).poll(cx).map(|result| {
            result.unwrap_or_else(|join_error| {
                if join_error.is_cancelled() {
                    Err(UnspoolError::Cancelled)
                } else {
                    Err(UnspoolError::Unknown(join_error.to_string()))
                }
            })
        })
    }
}

impl Extractor {
    /// Run one extraction on a Tokio blocking thread.
    ///
    /// The returned [`ExtractionFuture`] resolves exactly once, after every
    /// filesystem write of a successful extraction has completed.
    ///
    /// Requires the `async` feature and an ambient Tokio runtime.
    pub fn extract_async(
        &self,
        request: ExtractionRequest,
        options: ExtractOptions,
    ) -> ExtractionFuture {
        let extractor = self.clone();
        let handle = tokio::task::spawn_blocking(move || {
            extractor.extract_with_options(&request, &options)
        });
        ExtractionFuture { handle }
    }
}
