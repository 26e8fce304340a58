//! The descriptor-owning channel core.
//!
//! [`ChannelCore`] is the one place in the crate where a native descriptor is
//! touched: it owns exactly one descriptor for its entire lifetime, performs
//! mode-aware reads and writes against it, translates OS errors into the
//! crate's [`Error`](crate::Error) taxonomy, and guarantees that the
//! descriptor is released exactly once. Every public channel type is a thin
//! adapter over a core.

use crate::{
    error::{Error, Result},
    sys::{NativeIo, OsIo},
};
use std::{
    fmt::{self, Debug, Formatter},
    io,
    marker::PhantomData,
    os::unix::io::{AsRawFd, RawFd},
    sync::atomic::{
        AtomicBool, AtomicU64,
        Ordering::{AcqRel, Acquire, Relaxed, Release},
    },
};

/// The direction a channel core is configured for.
///
/// Pipe ends are unidirectional even though the underlying descriptor pair is
/// not; the core rejects the complementary operation with
/// [`Error::InvalidState`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// The end data is read from.
    Source,
    /// The end data is written to.
    Sink,
}

/// Identifies the pipe a channel core belongs to.
///
/// Both ends of one pipe report the same ID. This is a plain token, not any
/// kind of reference: it participates in no lifecycle decisions and is only
/// good for telling ends of different pipes apart in diagnostics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PipeId(u64);

impl PipeId {
    pub(crate) fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Relaxed))
    }
}

/// Owner of one native descriptor, performing I/O and lifecycle management
/// against it.
///
/// The descriptor is assigned once, at construction, and the value reported
/// by [`as_raw_fd`](AsRawFd::as_raw_fd) never changes for the life of the
/// core, so a readiness selector may keep polling it without coordination
/// while another thread reads or writes through the core directly.
///
/// All methods take `&self`. Closing from another thread is supported and is
/// the only way to cancel a blocked operation; concurrent reads from several
/// threads (or concurrent writes from several threads) are not protected
/// against and fall outside the intended single-reader, single-writer usage.
pub struct ChannelCore<N: NativeIo = OsIo> {
    fd: RawFd,
    closed: AtomicBool,
    blocking: AtomicBool,
    direction: Direction,
    pipe: PipeId,
    _sys: PhantomData<fn() -> N>,
}

impl<N: NativeIo> ChannelCore<N> {
    /// Wraps a freshly created descriptor. Descriptors start out in blocking
    /// mode, as created by [`NativeIo::create_pair`].
    pub(crate) fn new(fd: RawFd, direction: Direction, pipe: PipeId) -> Self {
        Self {
            fd,
            closed: AtomicBool::new(false),
            blocking: AtomicBool::new(true),
            direction,
            pipe,
            _sys: PhantomData,
        }
    }

    /// Reads into `buf` with one native call, returning the number of bytes
    /// actually read.
    ///
    /// A return of 0 on a non-empty buffer is end of stream: the write end
    /// has been closed and no more data will ever arrive. "No data right
    /// now" on a non-blocking core is the distinct [`Error::WouldBlock`]
    /// outcome, with `buf` untouched. An empty `buf` returns 0 without
    /// issuing a native call.
    pub fn read(&self, buf: &mut [u8]) -> Result<usize> {
        self.check_direction(Direction::Source)?;
        self.check_open()?;
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            match N::read(self.fd, buf) {
                Ok(n) => {
                    // A concurrent close() of this very end shuts the
                    // descriptor down, which also reads as EOF; report that
                    // as cancellation, not end of stream.
                    if n == 0 && self.is_closed() {
                        return Err(Error::Closed);
                    }
                    return Ok(n);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(self.translate(e)),
            }
        }
    }

    /// Writes from `buf` with one native call, returning the number of bytes
    /// actually accepted.
    ///
    /// In blocking mode the call suspends until at least one byte is
    /// accepted; in non-blocking mode a full OS buffer is the
    /// [`Error::WouldBlock`] outcome. A vanished reader surfaces as
    /// [`Error::BrokenPipe`]. An empty `buf` returns 0 without issuing a
    /// native call.
    pub fn write(&self, buf: &[u8]) -> Result<usize> {
        self.check_direction(Direction::Sink)?;
        self.check_open()?;
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            match N::write(self.fd, buf) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(self.translate(e)),
            }
        }
    }

    /// Switches the descriptor's OS-level blocking mode. The cached flag and
    /// the actual mode change together; subsequent reads and writes observe
    /// the new mode immediately.
    ///
    /// Mode changes are assumed to be infrequent and coordinated by the
    /// owning channel — this method is not synchronized against concurrent
    /// I/O on the same core.
    pub fn set_blocking(&self, blocking: bool) -> Result<()> {
        self.check_open()?;
        N::set_blocking(self.fd, blocking)?;
        self.blocking.store(blocking, Release);
        Ok(())
    }

    /// Whether the core is currently in blocking mode.
    pub fn is_blocking(&self) -> bool {
        self.blocking.load(Acquire)
    }

    /// Number of bytes that can be read without blocking. A readiness hint
    /// for selector-driven callers, not a guarantee.
    pub fn available(&self) -> Result<usize> {
        self.check_direction(Direction::Source)?;
        self.check_open()?;
        Ok(N::available(self.fd)?)
    }

    /// Releases the descriptor. Idempotent: the first call closes, every
    /// subsequent one is a no-op. Afterwards all reads and writes fail with
    /// [`Error::Closed`], and any operation blocked on this core at the time
    /// of the call is woken up and fails the same way.
    pub fn close(&self) -> Result<()> {
        if self.closed.swap(true, AcqRel) {
            return Ok(());
        }
        N::close(self.fd)?;
        Ok(())
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Acquire)
    }

    /// The direction this core is configured for.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The pipe this core is an end of.
    pub fn pipe_id(&self) -> PipeId {
        self.pipe
    }

    fn check_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(Error::Closed);
        }
        Ok(())
    }

    fn check_direction(&self, wanted: Direction) -> Result<()> {
        if self.direction != wanted {
            return Err(Error::InvalidState);
        }
        Ok(())
    }

    /// Maps a native I/O failure, accounting for a concurrent close of this
    /// end racing the native call (typically seen as EBADF or ECONNRESET).
    fn translate(&self, e: io::Error) -> Error {
        if self.is_closed() {
            Error::Closed
        } else {
            e.into()
        }
    }
}

impl<N: NativeIo> AsRawFd for ChannelCore<N> {
    fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

impl<N: NativeIo> Debug for ChannelCore<N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelCore")
            .field("fd", &self.fd)
            .field("direction", &self.direction)
            .field("closed", &self.is_closed())
            .field("blocking", &self.is_blocking())
            .finish()
    }
}

impl<N: NativeIo> Drop for ChannelCore<N> {
    fn drop(&mut self) {
        if !self.closed.swap(true, AcqRel) {
            let _ = N::close(self.fd);
        }
    }
}
