//! The raw-operation interface
//!
//! The dispatcher never issues syscalls itself. It asks a [`RawIo`] backend
//! to run one primitive and inspects the errno it gets back; `ENOSYS` is the
//! only answer it treats specially. Tests substitute a recording backend.

use sysdeps_api::{Errno, Fd};

use crate::core::flags::RwfFlags;
use crate::uio::{IoSlice, IoSliceMut};

/// Outcome of one raw primitive: a byte count or the errno it reported
pub type RawResult = core::result::Result<usize, Errno>;

/// The six vectored I/O primitives, by symbolic name
pub trait RawIo {
    /// `preadv2(fd, iov, offset, flags)`; offset `-1` means current position
    fn preadv2(&self, fd: Fd, bufs: &mut [IoSliceMut<'_>], offset: i64, flags: RwfFlags) -> RawResult;

    /// `readv(fd, iov)` at the descriptor's current position
    fn readv(&self, fd: Fd, bufs: &mut [IoSliceMut<'_>]) -> RawResult;

    /// `preadv(fd, iov, offset)` at an explicit position
    fn preadv(&self, fd: Fd, bufs: &mut [IoSliceMut<'_>], offset: i64) -> RawResult;

    /// `pwritev2(fd, iov, offset, flags)`; offset `-1` means current position
    fn pwritev2(&self, fd: Fd, bufs: &[IoSlice<'_>], offset: i64, flags: RwfFlags) -> RawResult;

    /// `writev(fd, iov)` at the descriptor's current position
    fn writev(&self, fd: Fd, bufs: &[IoSlice<'_>]) -> RawResult;

    /// `pwritev(fd, iov, offset)` at an explicit position
    fn pwritev(&self, fd: Fd, bufs: &[IoSlice<'_>], offset: i64) -> RawResult;
}

impl<T: RawIo + ?Sized> RawIo for &T {
    fn preadv2(&self, fd: Fd, bufs: &mut [IoSliceMut<'_>], offset: i64, flags: RwfFlags) -> RawResult {
        (**self).preadv2(fd, bufs, offset, flags)
    }

    fn readv(&self, fd: Fd, bufs: &mut [IoSliceMut<'_>]) -> RawResult {
        (**self).readv(fd, bufs)
    }

    fn preadv(&self, fd: Fd, bufs: &mut [IoSliceMut<'_>], offset: i64) -> RawResult {
        (**self).preadv(fd, bufs, offset)
    }

    fn pwritev2(&self, fd: Fd, bufs: &[IoSlice<'_>], offset: i64, flags: RwfFlags) -> RawResult {
        (**self).pwritev2(fd, bufs, offset, flags)
    }

    fn writev(&self, fd: Fd, bufs: &[IoSlice<'_>]) -> RawResult {
        (**self).writev(fd, bufs)
    }

    fn pwritev(&self, fd: Fd, bufs: &[IoSlice<'_>], offset: i64) -> RawResult {
        (**self).pwritev(fd, bufs, offset)
    }
}
