//! Linux backend
//!
//! All six primitives are issued through `libc::syscall` by number, so the
//! modern calls work even where the C library has no wrapper for them. The
//! 64-bit offset is split into low and high words the way the kernel's
//! `preadv`-family entry points expect, which is correct on both 32- and
//! 64-bit targets.

use core::ptr;

use libc::{c_int, c_long};
use sysdeps_api::{Availability, Errno, Fd, KernelProbe, Sysno};

use crate::core::flags::RwfFlags;
use crate::core::traits::{RawIo, RawResult};
use crate::dispatcher::Dispatcher;
use crate::uio::{IoSlice, IoSliceMut, IoVec};

/// Raw backend issuing real syscalls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinuxRawIo;

/// Kernel probe that asks the running kernel directly.
///
/// The probe issues the syscall on descriptor `-1` with no buffers. That can
/// never perform I/O; the kernel answers `EBADF` if it implements the call
/// and `ENOSYS` if it does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinuxKernelProbe;

/// The dispatcher type used process-wide
pub type LinuxDispatcher = Dispatcher<LinuxRawIo, LinuxKernelProbe>;

static DEFAULT_DISPATCHER: LinuxDispatcher = Dispatcher::new(LinuxRawIo, LinuxKernelProbe);

/// The process-wide dispatcher over the running kernel
pub fn default_dispatcher() -> &'static LinuxDispatcher {
    &DEFAULT_DISPATCHER
}

/// Split a 64-bit offset into the low and high argument words
fn lo_hi(offset: i64) -> (c_long, c_long) {
    let lo = offset as c_long;
    let hi = ((offset as u64) >> 32) as c_long;
    (lo, hi)
}

fn iovecs(iov: &[IoVec]) -> *const libc::iovec {
    iov.as_ptr().cast()
}

fn iov_count(len: usize) -> Result<c_int, Errno> {
    c_int::try_from(len).map_err(|_| Errno::EINVAL)
}

#[cfg(feature = "std")]
fn last_errno() -> Errno {
    Errno::from(std::io::Error::last_os_error())
}

#[cfg(not(feature = "std"))]
fn last_errno() -> Errno {
    // SAFETY: __errno_location returns the calling thread's errno slot.
    Errno(unsafe { *libc::__errno_location() })
}

fn check(ret: c_long) -> RawResult {
    if ret < 0 {
        Err(last_errno())
    } else {
        Ok(ret as usize)
    }
}

impl RawIo for LinuxRawIo {
    fn preadv2(&self, fd: Fd, bufs: &mut [IoSliceMut<'_>], offset: i64, flags: RwfFlags) -> RawResult {
        let count = iov_count(bufs.len())?;
        let (lo, hi) = lo_hi(offset);
        // SAFETY: the iovecs describe live buffers we hold uniquely.
        let ret = unsafe {
            libc::syscall(
                Sysno::Preadv2.number(),
                fd,
                iovecs(IoSliceMut::as_iovecs(bufs)),
                count,
                lo,
                hi,
                flags.raw(),
            )
        };
        check(ret)
    }

    fn readv(&self, fd: Fd, bufs: &mut [IoSliceMut<'_>]) -> RawResult {
        let count = iov_count(bufs.len())?;
        // SAFETY: as for preadv2.
        let ret = unsafe {
            libc::syscall(
                Sysno::Readv.number(),
                fd,
                iovecs(IoSliceMut::as_iovecs(bufs)),
                count,
            )
        };
        check(ret)
    }

    fn preadv(&self, fd: Fd, bufs: &mut [IoSliceMut<'_>], offset: i64) -> RawResult {
        let count = iov_count(bufs.len())?;
        let (lo, hi) = lo_hi(offset);
        // SAFETY: as for preadv2.
        let ret = unsafe {
            libc::syscall(
                Sysno::Preadv.number(),
                fd,
                iovecs(IoSliceMut::as_iovecs(bufs)),
                count,
                lo,
                hi,
            )
        };
        check(ret)
    }

    fn pwritev2(&self, fd: Fd, bufs: &[IoSlice<'_>], offset: i64, flags: RwfFlags) -> RawResult {
        let count = iov_count(bufs.len())?;
        let (lo, hi) = lo_hi(offset);
        // SAFETY: the iovecs describe live buffers the kernel only reads.
        let ret = unsafe {
            libc::syscall(
                Sysno::Pwritev2.number(),
                fd,
                iovecs(IoSlice::as_iovecs(bufs)),
                count,
                lo,
                hi,
                flags.raw(),
            )
        };
        check(ret)
    }

    fn writev(&self, fd: Fd, bufs: &[IoSlice<'_>]) -> RawResult {
        let count = iov_count(bufs.len())?;
        // SAFETY: as for pwritev2.
        let ret = unsafe {
            libc::syscall(
                Sysno::Writev.number(),
                fd,
                iovecs(IoSlice::as_iovecs(bufs)),
                count,
            )
        };
        check(ret)
    }

    fn pwritev(&self, fd: Fd, bufs: &[IoSlice<'_>], offset: i64) -> RawResult {
        let count = iov_count(bufs.len())?;
        let (lo, hi) = lo_hi(offset);
        // SAFETY: as for pwritev2.
        let ret = unsafe {
            libc::syscall(
                Sysno::Pwritev.number(),
                fd,
                iovecs(IoSlice::as_iovecs(bufs)),
                count,
                lo,
                hi,
            )
        };
        check(ret)
    }
}

impl KernelProbe for LinuxKernelProbe {
    fn has_syscall(&self, sysno: Sysno) -> Availability {
        // SAFETY: an invalid descriptor and an empty, null iovec array
        // touch no memory.
        let ret = unsafe {
            libc::syscall(
                sysno.number(),
                -1 as c_int,
                ptr::null::<libc::iovec>(),
                0 as c_int,
                0 as c_long,
                0 as c_long,
                0 as c_int,
            )
        };
        if ret >= 0 || !last_errno().is_not_implemented() {
            Availability::Present
        } else {
            Availability::Absent
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lo_hi_split() {
        let (lo, hi) = lo_hi(0x1_2345_6789);
        assert_eq!(lo as u64 & 0xffff_ffff, 0x2345_6789);
        assert_eq!(hi, 0x1);
        assert_eq!(lo_hi(100), (100, 0));
    }

    #[test]
    fn test_probe_finds_classic_syscalls() {
        assert_eq!(LinuxKernelProbe.has_syscall(Sysno::Readv), Availability::Present);
        assert_eq!(LinuxKernelProbe.has_syscall(Sysno::Pwritev), Availability::Present);
    }

    #[test]
    fn test_bad_descriptor_reported_verbatim() {
        let mut buf = [0u8; 4];
        let mut bufs = [IoSliceMut::new(&mut buf)];
        assert_eq!(LinuxRawIo.readv(-1, &mut bufs), Err(Errno::EBADF));
        assert_eq!(LinuxRawIo.preadv(-1, &mut bufs, 0), Err(Errno::EBADF));
    }

    #[test]
    fn test_scatter_read_through_iovecs() {
        let mut fds = [0 as c_int; 2];
        // SAFETY: fds has room for the two descriptors pipe writes.
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
        let [rx, tx] = fds;

        let out = [IoSlice::new(b"ab"), IoSlice::new(b"cde")];
        assert_eq!(LinuxRawIo.writev(tx, &out), Ok(5));

        let mut head = [0u8; 3];
        let mut tail = [0u8; 2];
        let mut bufs = [IoSliceMut::new(&mut head), IoSliceMut::new(&mut tail)];
        assert_eq!(LinuxRawIo.readv(rx, &mut bufs), Ok(5));
        assert_eq!(&head, b"abc");
        assert_eq!(&tail, b"de");

        // SAFETY: both descriptors came from pipe above and are closed once.
        unsafe {
            libc::close(rx);
            libc::close(tx);
        }
    }

    #[test]
    fn test_default_dispatcher_is_shared() {
        assert!(core::ptr::eq(default_dispatcher(), default_dispatcher()));
    }
}
