//! Error types for pagepool.

use thiserror::Error;

use crate::common::PageId;

/// Convenient Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure a buffer pool operation can report.
///
/// All errors are surfaced synchronously to the caller; none is treated as
/// process-fatal. Callers distinguish "expected" outcomes (a full pool, a
/// page that was already evicted) from logic errors (`DoubleUnpin`) by
/// variant.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from the disk backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The operation requires the page to be resident, and it is not.
    #[error("{0} is not resident in the buffer pool")]
    PageNotFound(PageId),

    /// Fetch/new could not find a free or evictable frame; every frame in
    /// the pool is pinned.
    #[error("buffer pool exhausted: all frames are pinned")]
    PoolExhausted,

    /// Delete was requested for a page that still has outstanding pins.
    #[error("{0} is in use (pin count > 0)")]
    PageInUse(PageId),

    /// Unpin was requested for a page whose pin count is already zero.
    /// Indicates a pin/unpin mismatch in the caller.
    #[error("{0} has no outstanding pins to release")]
    DoubleUnpin(PageId),

    /// The disk backend rejected a page id it never allocated.
    #[error("{0} was never allocated on disk")]
    InvalidPageId(PageId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::PageNotFound(PageId::new(42));
        assert_eq!(format!("{}", err), "Page(42) is not resident in the buffer pool");

        let err = Error::PoolExhausted;
        assert_eq!(format!("{}", err), "buffer pool exhausted: all frames are pinned");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();

        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_io_error_source_preserved() {
        use std::error::Error as _;

        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err: Error = io_err.into();
        assert!(err.source().is_some());
    }
}
