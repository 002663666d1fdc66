//! Frame serialization.
//!
//! Writes each decoded frame to the output directory as a lossless PNG
//! under a deterministic, order-preserving name. Names are zero-padded to
//! eight digits so a plain lexicographic directory listing reproduces
//! temporal order for any frame count up to 10^8.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::decode::RawFrame;
use crate::error::UnspoolError;

/// File name for the frame at `index`: `frame_<index:08>.png`.
///
/// # Example
///
/// ```
/// use unspool::frame_file_name;
///
/// assert_eq!(frame_file_name(0), "frame_00000000.png");
/// assert_eq!(frame_file_name(41), "frame_00000041.png");
/// ```
pub fn frame_file_name(index: u64) -> String {
    format!("frame_{index:08}.png")
}

/// Writes frames into one output directory.
pub(crate) struct FrameWriter {
    output_dir: PathBuf,
}

impl FrameWriter {
    /// Create the writer, creating `output_dir` (and intermediate
    /// directories) if absent. Idempotent when the directory exists.
    pub(crate) fn create(output_dir: &Path) -> Result<Self, UnspoolError> {
        fs::create_dir_all(output_dir).map_err(|error| UnspoolError::WriteFailed {
            path: output_dir.to_path_buf(),
            reason: error.to_string(),
        })?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    /// Serialize `frame` as PNG under the name for `index`.
    ///
    /// Consumes the frame; its pixel buffer is released when this returns,
    /// whether the write succeeded or not.
    pub(crate) fn write(&self, frame: RawFrame, index: u64) -> Result<PathBuf, UnspoolError> {
        let path = self.output_dir.join(frame_file_name(index));
        frame
            .buffer
            .save(&path)
            .map_err(|error| UnspoolError::WriteFailed {
                path: path.clone(),
                reason: error.to_string(),
            })?;
        log::debug!("wrote frame {index} to {}", path.display());
        Ok(path)
    }
}
