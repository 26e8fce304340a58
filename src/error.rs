//! The error taxonomy shared by every channel type in the crate.
//!
//! Two outcomes that look like errors are deliberately not treated as such by
//! callers driving a readiness selector:
//! - [`Error::WouldBlock`] is a control-flow signal ("no progress possible
//!   right now"), produced only in non-blocking mode;
//! - end-of-stream is not represented here at all — it is the successful
//!   return of 0 from a read into a non-empty buffer, following the
//!   [`std::io::Read`] convention.

use std::{fmt, io};

/// Result type of the crate, defaulting to the crate's [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors and control-flow signals produced by channel operations.
///
/// OS errors are translated exactly once, at the channel core; nothing is
/// retried or recovered internally, with the single exception of the
/// OS-reported "interrupted, try again" condition, which the core retries
/// transparently because it is not an observable application-level failure.
#[derive(Debug)]
pub enum Error {
    /// The operation was attempted after the channel end had been closed, or
    /// a blocking operation was interrupted by a concurrent close of the very
    /// end it was issued on.
    Closed,
    /// A non-blocking operation could not make immediate progress. The buffer
    /// involved has not been touched; retry once the selector reports
    /// readiness.
    WouldBlock,
    /// A write was attempted with no reader remaining on the other end.
    BrokenPipe,
    /// The operation is not valid for this core's configured direction.
    InvalidState,
    /// Any other OS-level failure, with the native error code preserved.
    Io(io::Error),
}

impl Error {
    /// Whether this is the [`WouldBlock`](Self::WouldBlock) control-flow
    /// signal rather than a genuine failure.
    #[inline]
    pub fn is_would_block(&self) -> bool {
        matches!(self, Self::WouldBlock)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => f.write_str("channel end is closed"),
            Self::WouldBlock => f.write_str("operation would block"),
            Self::BrokenPipe => f.write_str("no reader remaining on the other end"),
            Self::InvalidState => f.write_str("operation not valid for this channel direction"),
            Self::Io(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::WouldBlock => Self::WouldBlock,
            io::ErrorKind::BrokenPipe => Self::BrokenPipe,
            _ => Self::Io(e),
        }
    }
}

impl From<Error> for io::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::Closed => io::Error::new(io::ErrorKind::NotConnected, "channel end is closed"),
            Error::WouldBlock => io::ErrorKind::WouldBlock.into(),
            Error::BrokenPipe => io::ErrorKind::BrokenPipe.into(),
            Error::InvalidState => io::Error::new(
                io::ErrorKind::InvalidInput,
                "operation not valid for this channel direction",
            ),
            Error::Io(e) => e,
        }
    }
}
