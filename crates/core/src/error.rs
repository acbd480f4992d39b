//! Unified error types for wallmancer.
//!
//! Page fetch errors carry the request URL (with the API key stripped) and
//! cache errors carry the bucket or file they refer to, so the binary can
//! print them as-is.

use std::path::PathBuf;

/// Unified error type shared by the cache engine, the HTTP client and the CLI.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., an identifier without a file name).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Transport-level failure reaching the remote API.
    #[error("NETWORK_ERROR: {url}: {message}")]
    Network { url: String, message: String },

    /// The remote API answered with a non-200 status.
    #[error("HTTP_STATUS: {url}: status {status}")]
    HttpStatus { url: String, status: u16 },

    /// The response body was not the expected JSON envelope.
    #[error("DECODE_ERROR: {url}: {message}")]
    Decode { url: String, message: String },

    /// A page fetch failed during a bucket refetch. `source` keeps the
    /// underlying kind (`Network`, `HttpStatus`, `Decode`).
    #[error("PAGE_FETCH: bucket {bucket} page {page}: {source}")]
    PageFetch {
        bucket: String,
        page: u32,
        #[source]
        source: Box<Error>,
    },

    /// A fresh cached result file exists but holds no usable lines.
    #[error("EMPTY_CACHE: bucket {bucket} has no usable entries")]
    EmptyCache { bucket: String },

    /// A result file exists but is empty or contains only blank lines.
    #[error("EMPTY_FILE: {} is empty or contains only blank lines", .0.display())]
    EmptyFile(PathBuf),

    /// The first page of a refetch returned no items.
    #[error("NO_RESULTS: no wallpapers found for bucket {bucket} ({url})")]
    NoResults { bucket: String, url: String },

    /// Reading or writing a cache file failed.
    #[error("CACHE_IO: {}: {source}", .path.display())]
    CacheIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Downloading the selected image failed.
    #[error("DOWNLOAD_FAILED: {url}: {message}")]
    DownloadFailed { url: String, message: String },
}

impl Error {
    pub(crate) fn cache_io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Error::CacheIo { path, source }
    }

    /// The innermost error, looking through `PageFetch` wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::PageFetch { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NoResults { bucket: "random".into(), url: "https://wallhaven.cc/api/v1/search?q=cats".into() };
        assert!(err.to_string().starts_with("NO_RESULTS"));
        assert!(err.to_string().contains("random"));

        let err = Error::HttpStatus { url: "https://wallhaven.cc/api/v1/search".into(), status: 429 };
        assert!(err.to_string().contains("status 429"));
    }

    #[test]
    fn test_page_fetch_keeps_kind() {
        let err = Error::PageFetch {
            bucket: "hot".into(),
            page: 2,
            source: Box::new(Error::HttpStatus { url: "https://wallhaven.cc/api/v1/search".into(), status: 500 }),
        };
        assert!(err.to_string().contains("bucket hot page 2"));
        assert!(err.to_string().contains("status 500"));
        assert!(matches!(err.root(), Error::HttpStatus { status: 500, .. }));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_empty_file_display_includes_path() {
        let err = Error::EmptyFile(PathBuf::from("/tmp/wallhaven/hot"));
        assert!(err.to_string().contains("/tmp/wallhaven/hot"));
    }

    #[test]
    fn test_cache_io_keeps_source() {
        let err = Error::cache_io("/tmp/x")(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"));
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("CACHE_IO"));
    }
}
