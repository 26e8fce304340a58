use super::NativeIo;
use libc::c_int;
use std::{ffi::c_void, io, os::unix::io::RawFd, ptr};

/// The `libc`-backed implementation of [`NativeIo`] that real pipes run on.
///
/// Descriptor pairs come from `socketpair(2)` in the `AF_UNIX` domain with
/// close-on-exec set, reads and writes are single `read(2)`/`send(2)` calls,
/// and mode switching goes through `fcntl(2)`.
#[derive(Copy, Clone, Debug)]
pub struct OsIo;

impl NativeIo for OsIo {
    fn create_pair() -> io::Result<(RawFd, RawFd)> {
        let (success, fds) = unsafe {
            let mut fds: [c_int; 2] = [0; 2];
            let result = libc::socketpair(libc::AF_UNIX, stream_type(), 0, fds.as_mut_ptr());
            (result == 0, fds)
        };
        if !success {
            return Err(io::Error::last_os_error());
        }
        if let Err(e) = finish_pair(fds[0]).and_then(|()| finish_pair(fds[1])) {
            unsafe {
                let _ = close_fd(fds[0]);
                let _ = close_fd(fds[1]);
            }
            return Err(e);
        }
        Ok((fds[0], fds[1]))
    }

    fn read(fd: RawFd, buf: &mut [u8]) -> io::Result<usize> {
        let (success, bytes_read) = unsafe {
            let size_or_err = libc::read(fd, buf.as_mut_ptr().cast(), buf.len());
            (size_or_err >= 0, size_or_err as usize)
        };
        ok_or_errno!(success => bytes_read)
    }

    fn write(fd: RawFd, buf: &[u8]) -> io::Result<usize> {
        let (success, bytes_written) = unsafe {
            // send() instead of write() so that MSG_NOSIGNAL applies — a peer
            // hangup must surface as EPIPE, not kill the process with SIGPIPE.
            let size_or_err = libc::send(fd, buf.as_ptr().cast(), buf.len(), send_flags());
            (size_or_err >= 0, size_or_err as usize)
        };
        ok_or_errno!(success => bytes_written)
    }

    fn set_blocking(fd: RawFd, blocking: bool) -> io::Result<()> {
        let (old_flags, success) = unsafe {
            // Passing a null pointer, which is required yet ignored for
            // F_GETFL.
            let result = libc::fcntl(fd, libc::F_GETFL, ptr::null::<c_void>());
            (result, result != -1)
        };
        if !success {
            return Err(io::Error::last_os_error());
        }
        let new_flags = if blocking {
            // Inverting the O_NONBLOCK value sets all the bits in the flag
            // set to 1 except for the nonblocking flag, which clears the flag
            // when ANDed.
            old_flags & !libc::O_NONBLOCK
        } else {
            old_flags | libc::O_NONBLOCK
        };
        let success = unsafe { libc::fcntl(fd, libc::F_SETFL, new_flags) } != -1;
        ok_or_errno!(success => ())
    }

    fn available(fd: RawFd) -> io::Result<usize> {
        let (success, count) = unsafe {
            let mut count: c_int = 0;
            let result = libc::ioctl(fd, libc::FIONREAD, &mut count as *mut c_int);
            (result != -1, count)
        };
        ok_or_errno!(success => count.max(0) as usize)
    }

    fn close(fd: RawFd) -> io::Result<()> {
        unsafe {
            // Shutting down both directions first wakes up any thread blocked
            // in read() or write() on this very descriptor. The peer may
            // already be gone (ENOTCONN), which is fine.
            libc::shutdown(fd, libc::SHUT_RDWR);
            close_fd(fd)
        }
    }
}

fn stream_type() -> c_int {
    #[allow(unused_mut, clippy::let_and_return)]
    let ty = {
        let mut ty = libc::SOCK_STREAM;
        #[cfg(target_os = "linux")]
        {
            ty |= libc::SOCK_CLOEXEC;
        }
        ty
    };
    ty
}

/// Post-creation setup of one half of a fresh pair.
#[allow(unused_variables)]
fn finish_pair(fd: RawFd) -> io::Result<()> {
    #[cfg(not(target_os = "linux"))]
    set_cloexec(fd)?;
    #[cfg(target_vendor = "apple")]
    set_nosigpipe(fd)?;
    Ok(())
}

fn send_flags() -> c_int {
    #[cfg(not(target_vendor = "apple"))]
    {
        libc::MSG_NOSIGNAL
    }
    #[cfg(target_vendor = "apple")]
    {
        // SO_NOSIGPIPE is set at pair creation instead.
        0
    }
}

#[cfg(not(target_os = "linux"))]
fn set_cloexec(fd: RawFd) -> io::Result<()> {
    let (flags, success) = unsafe {
        let ret = libc::fcntl(fd, libc::F_GETFD, 0);
        (ret, ret != -1)
    };
    if !success {
        return Err(io::Error::last_os_error());
    }
    let success = unsafe { libc::fcntl(fd, libc::F_SETFD, flags | libc::FD_CLOEXEC) } != -1;
    ok_or_errno!(success => ())
}

#[cfg(target_vendor = "apple")]
fn set_nosigpipe(fd: RawFd) -> io::Result<()> {
    let success = unsafe {
        let value: c_int = 1;
        libc::setsockopt(
            fd,
            libc::SOL_SOCKET,
            libc::SO_NOSIGPIPE,
            (&value as *const c_int).cast(),
            std::mem::size_of::<c_int>() as libc::socklen_t,
        ) != -1
    };
    ok_or_errno!(success => ())
}

unsafe fn close_fd(fd: RawFd) -> io::Result<()> {
    // If the close() call fails, the loop starts and keeps retrying until
    // either the operation succeeds or it properly fails with a
    // non-Interrupted error type.
    unsafe {
        while libc::close(fd) != 0 {
            let e = io::Error::last_os_error();
            if e.kind() != io::ErrorKind::Interrupted {
                return Err(e);
            }
        }
    }
    Ok(())
}
