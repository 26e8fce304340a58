//! Creation and usage of in-process unidirectional pipes.
//!
//! A pipe is two connected [`ChannelCore`]s made from one `socketpair(2)`
//! call, handed out as channel-shaped views: [`PipeSource`] can only read,
//! [`PipeSink`] can only write. The ends have independent lifecycles —
//! closing one never closes the other, though the survivor will observe end
//! of stream or [`BrokenPipe`](crate::Error::BrokenPipe) per the usual pipe
//! semantics — and each can be switched between blocking and non-blocking
//! mode on its own, which makes either end suitable for registration with a
//! readiness selector.

use crate::{
    channel::{ChannelCore, Direction, PipeId},
    error::Result,
    sys::{NativeIo, OsIo},
};
use std::{
    fmt::{self, Debug, Formatter},
    io::{self, Read, Write},
    os::unix::io::{AsFd, AsRawFd, BorrowedFd, RawFd},
};

/// Creates a pipe and returns the handles to its writing end and reading
/// end.
///
/// The two descriptors are created together, atomically; if pair creation
/// fails, nothing is leaked and neither end exists.
pub fn pipe() -> Result<(PipeSink, PipeSource)> {
    pipe_with::<OsIo>()
}

/// [`pipe()`] over an alternative [native I/O implementation](NativeIo).
pub fn pipe_with<N: NativeIo>() -> Result<(PipeSink<N>, PipeSource<N>)> {
    let (rfd, wfd) = N::create_pair()?;
    let id = PipeId::next();
    let source = PipeSource(ChannelCore::new(rfd, Direction::Source, id));
    let sink = PipeSink(ChannelCore::new(wfd, Direction::Sink, id));
    Ok((sink, source))
}

/// A handle to the reading end of a pipe, created by the [`pipe()`] function
/// together with the [writing end](PipeSink).
///
/// Reading is exposed both through inherent [`read`](Self::read), which
/// reports the crate's full outcome taxonomy (most notably
/// [`WouldBlock`](crate::Error::WouldBlock) in non-blocking mode), and through a
/// file-like [`Read`] implementation for interoperability, which folds those
/// outcomes back into [`io::Error`] values.
pub struct PipeSource<N: NativeIo = OsIo>(ChannelCore<N>);

impl<N: NativeIo> PipeSource<N> {
    /// Reads into `buf`, returning the number of bytes read. 0 on a
    /// non-empty buffer means the sink has been closed and no more data will
    /// ever arrive.
    #[inline]
    pub fn read(&self, buf: &mut [u8]) -> Result<usize> {
        self.0.read(buf)
    }

    /// Switches this end between blocking and non-blocking reads.
    #[inline]
    pub fn set_blocking(&self, blocking: bool) -> Result<()> {
        self.0.set_blocking(blocking)
    }

    /// Whether reads on this end currently block.
    #[inline]
    pub fn is_blocking(&self) -> bool {
        self.0.is_blocking()
    }

    /// Number of bytes that can be read right now without blocking.
    #[inline]
    pub fn available(&self) -> Result<usize> {
        self.0.available()
    }

    /// Closes this end. Idempotent; does not affect the sink. Wakes up a
    /// concurrently blocked read on this end, which then fails with
    /// [`Closed`](crate::Error::Closed).
    #[inline]
    pub fn close(&self) -> Result<()> {
        self.0.close()
    }

    /// Whether this end has been closed.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.0.is_closed()
    }

    /// The pipe this end belongs to; equal to the sink's.
    #[inline]
    pub fn pipe_id(&self) -> PipeId {
        self.0.pipe_id()
    }
}

impl<N: NativeIo> Read for &PipeSource<N> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        PipeSource::read(*self, buf).map_err(Into::into)
    }
}
impl<N: NativeIo> Read for PipeSource<N> {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Read::read(&mut &*self, buf)
    }
}
impl<N: NativeIo> AsRawFd for PipeSource<N> {
    #[inline]
    fn as_raw_fd(&self) -> RawFd {
        self.0.as_raw_fd()
    }
}
impl<N: NativeIo> AsFd for PipeSource<N> {
    #[inline]
    fn as_fd(&self) -> BorrowedFd<'_> {
        // SAFETY: the core holds the descriptor open until close() or drop.
        unsafe { BorrowedFd::borrow_raw(self.0.as_raw_fd()) }
    }
}
impl<N: NativeIo> Debug for PipeSource<N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipeSource").field("fd", &self.0.as_raw_fd()).finish()
    }
}

/// A handle to the writing end of a pipe, created by the [`pipe()`] function
/// together with the [reading end](PipeSource).
///
/// The mirror of [`PipeSource`]: inherent [`write`](Self::write) with the
/// full outcome taxonomy, plus a file-like [`Write`] implementation.
pub struct PipeSink<N: NativeIo = OsIo>(ChannelCore<N>);

impl<N: NativeIo> PipeSink<N> {
    /// Writes from `buf`, returning the number of bytes accepted. In
    /// blocking mode, suspends until at least one byte is accepted.
    #[inline]
    pub fn write(&self, buf: &[u8]) -> Result<usize> {
        self.0.write(buf)
    }

    /// Flushes this end. Socket pairs have no userspace buffering, so this
    /// is a no-op that exists for interface parity with [`Write`].
    #[inline]
    pub fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Switches this end between blocking and non-blocking writes.
    #[inline]
    pub fn set_blocking(&self, blocking: bool) -> Result<()> {
        self.0.set_blocking(blocking)
    }

    /// Whether writes on this end currently block.
    #[inline]
    pub fn is_blocking(&self) -> bool {
        self.0.is_blocking()
    }

    /// Closes this end. Idempotent; does not affect the source, which will
    /// observe end of stream once it has drained the data in flight.
    #[inline]
    pub fn close(&self) -> Result<()> {
        self.0.close()
    }

    /// Whether this end has been closed.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.0.is_closed()
    }

    /// The pipe this end belongs to; equal to the source's.
    #[inline]
    pub fn pipe_id(&self) -> PipeId {
        self.0.pipe_id()
    }
}

impl<N: NativeIo> Write for &PipeSink<N> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        PipeSink::write(*self, buf).map_err(Into::into)
    }
    fn flush(&mut self) -> io::Result<()> {
        PipeSink::flush(*self).map_err(Into::into)
    }
}
impl<N: NativeIo> Write for PipeSink<N> {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Write::write(&mut &*self, buf)
    }
    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        Write::flush(&mut &*self)
    }
}
impl<N: NativeIo> AsRawFd for PipeSink<N> {
    #[inline]
    fn as_raw_fd(&self) -> RawFd {
        self.0.as_raw_fd()
    }
}
impl<N: NativeIo> AsFd for PipeSink<N> {
    #[inline]
    fn as_fd(&self) -> BorrowedFd<'_> {
        // SAFETY: as for PipeSource.
        unsafe { BorrowedFd::borrow_raw(self.0.as_raw_fd()) }
    }
}
impl<N: NativeIo> Debug for PipeSink<N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipeSink").field("fd", &self.0.as_raw_fd()).finish()
    }
}
