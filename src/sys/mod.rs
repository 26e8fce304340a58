//! The native I/O primitive boundary.
//!
//! Everything that touches an actual syscall goes through [`NativeIo`]. The
//! channel core is generic over it, which keeps descriptor lifecycle logic,
//! mode handling and error translation testable without a kernel on the other
//! side; [`OsIo`] is the implementation real pipes are built on.

mod unix;

pub use unix::OsIo;

use std::{io, os::unix::io::RawFd};

/// The set of native calls the channel core is built on.
///
/// Implementations are stateless: every method is an associated function
/// keyed by the raw descriptor. The contract mirrors the underlying
/// syscalls — partial reads and writes are normal, errors come out as
/// [`io::Error`] values carrying the OS error code, and no method ever
/// retries on its own.
pub trait NativeIo {
    /// Creates two connected descriptors in one atomic operation.
    ///
    /// The returned tuple is `(read end, write end)` by the crate's pipe
    /// convention; the primitive itself is bidirectional, and restricting
    /// each descriptor to one direction is the caller's job. On failure no
    /// descriptor is left allocated.
    fn create_pair() -> io::Result<(RawFd, RawFd)>;

    /// Reads up to `buf.len()` bytes in one native call.
    ///
    /// `Ok(0)` on a non-empty buffer means the write side has hung up. On a
    /// non-blocking descriptor with no data, fails with
    /// [`WouldBlock`](io::ErrorKind::WouldBlock).
    fn read(fd: RawFd, buf: &mut [u8]) -> io::Result<usize>;

    /// Writes up to `buf.len()` bytes in one native call.
    ///
    /// Must not raise `SIGPIPE` when the peer is gone; the no-reader
    /// condition comes back as [`BrokenPipe`](io::ErrorKind::BrokenPipe).
    fn write(fd: RawFd, buf: &[u8]) -> io::Result<usize>;

    /// Switches the descriptor between blocking and non-blocking mode.
    fn set_blocking(fd: RawFd, blocking: bool) -> io::Result<()>;

    /// Number of bytes that can currently be read without blocking.
    fn available(fd: RawFd) -> io::Result<usize>;

    /// Releases the descriptor.
    ///
    /// Required to wake up any thread blocked in [`read`](Self::read) or
    /// [`write`](Self::write) on this very descriptor, since closing from
    /// another thread is the only cancellation mechanism the channel core
    /// offers.
    fn close(fd: RawFd) -> io::Result<()>;
}
