//! Input resolution.
//!
//! This module turns a caller-supplied input string into raw container
//! bytes. Local paths (bare or `file://`-prefixed) are read directly;
//! `http://` and `https://` URIs are fetched through a [`Transport`] and
//! spooled to a private temporary file scoped to the request before being
//! read back as a local byte source. Resolution is attempted exactly once —
//! no retries, no cross-request caching.

use std::{fs, io::Write, path::PathBuf};

use tempfile::NamedTempFile;

use crate::error::UnspoolError;

/// A parsed input descriptor: where the container bytes live.
///
/// Created from a caller string via [`InputDescriptor::parse`] and consumed
/// once by [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputDescriptor {
    /// A local filesystem path.
    Local(PathBuf),
    /// A remote `http://` or `https://` URI.
    Remote(String),
}

impl InputDescriptor {
    /// Parse a caller-supplied input string.
    ///
    /// Accepted forms: `http://…` and `https://…` (remote), `file://<path>`
    /// (local, prefix stripped), and bare filesystem paths (local). Any
    /// other scheme fails with
    /// [`UnspoolError::UnsupportedInput`].
    ///
    /// # Example
    ///
    /// ```
    /// use std::path::PathBuf;
    ///
    /// use unspool::InputDescriptor;
    ///
    /// let local = InputDescriptor::parse("file:///tmp/anim.webp").unwrap();
    /// assert_eq!(local, InputDescriptor::Local(PathBuf::from("/tmp/anim.webp")));
    ///
    /// assert!(InputDescriptor::parse("ftp://example.com/anim.webp").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, UnspoolError> {
        if input.starts_with("http://") || input.starts_with("https://") {
            Ok(InputDescriptor::Remote(input.to_owned()))
        } else if let Some(path) = input.strip_prefix("file://") {
            Ok(InputDescriptor::Local(PathBuf::from(path)))
        } else if input.contains("://") {
            Err(UnspoolError::UnsupportedInput {
                input: input.to_owned(),
            })
        } else {
            Ok(InputDescriptor::Local(PathBuf::from(input)))
        }
    }
}

/// Abstract remote byte acquisition.
///
/// The engine depends only on this narrow contract; the default
/// implementation is [`HttpTransport`]. Implementations must not retry —
/// the engine treats a fetch failure as terminal for the request.
pub trait Transport: Send + Sync {
    /// Fetch the full byte content behind `uri`.
    fn fetch(&self, uri: &str) -> Result<Vec<u8>, UnspoolError>;
}

/// Default [`Transport`] backed by a blocking `reqwest` client.
///
/// A fresh client is built per fetch; each request performs exactly one
/// fetch, so there is no connection pool worth keeping alive.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    timeout: std::time::Duration,
}

impl HttpTransport {
    /// Create a transport with the default 300-second timeout.
    pub fn new() -> Self {
        Self {
            timeout: std::time::Duration::from_secs(300),
        }
    }

    /// Override the whole-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, uri: &str) -> Result<Vec<u8>, UnspoolError> {
        let fetch_failed = |reason: String| UnspoolError::FetchFailed {
            uri: uri.to_owned(),
            reason,
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|error| fetch_failed(error.to_string()))?;

        let response = client
            .get(uri)
            .send()
            .map_err(|error| fetch_failed(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_failed(format!("server returned {status}")));
        }

        let bytes = response
            .bytes()
            .map_err(|error| fetch_failed(error.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Resolve an input descriptor to owned container bytes.
///
/// Remote inputs are fetched once and spooled through a private
/// [`NamedTempFile`]; the temporary file is removed before this function
/// returns. Local inputs must exist and be readable, otherwise
/// [`UnspoolError::InputNotFound`] is returned.
pub(crate) fn resolve(
    descriptor: &InputDescriptor,
    transport: &dyn Transport,
) -> Result<Vec<u8>, UnspoolError> {
    match descriptor {
        InputDescriptor::Local(path) => {
            if !path.exists() {
                return Err(UnspoolError::InputNotFound { path: path.clone() });
            }
            fs::read(path).map_err(|_| UnspoolError::InputNotFound { path: path.clone() })
        }
        InputDescriptor::Remote(uri) => {
            let fetched = transport.fetch(uri)?;
            log::debug!("fetched {} byte(s) from {uri}", fetched.len());

            // Spool through a per-request temp file so the decode step only
            // ever sees a local byte source. The file is private to this
            // request and removed on drop.
            let spool_failed = |reason: String| UnspoolError::FetchFailed {
                uri: uri.clone(),
                reason,
            };
            let mut spool =
                NamedTempFile::new().map_err(|error| spool_failed(error.to_string()))?;
            spool
                .write_all(&fetched)
                .map_err(|error| spool_failed(error.to_string()))?;
            spool
                .flush()
                .map_err(|error| spool_failed(error.to_string()))?;

            fs::read(spool.path()).map_err(|error| spool_failed(error.to_string()))
        }
    }
}
