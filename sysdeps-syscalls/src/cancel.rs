//! Cancellation points
//!
//! Every primitive the dispatcher issues, modern or fallback, runs inside
//! [`cancellation_point`]. A cancellation already pending when the point is
//! reached aborts the call before it is issued. A primitive interrupted with
//! `EINTR` while a cancellation is pending reports [`Error::Canceled`]
//! instead of the interruption; any other outcome is returned verbatim.

use sysdeps_api::sync::{AtomicBool, Ordering};
use sysdeps_api::{Errno, Error, Result};

/// A cooperative cancellation source
pub trait Cancellation {
    /// Returns true when the current operation should be abandoned
    fn is_cancelled(&self) -> bool;
}

/// A source that never cancels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NeverCancel;

impl Cancellation for NeverCancel {
    #[inline]
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// A shareable cancellation flag
#[derive(Debug, Default)]
pub struct CancelFlag {
    cancelled: AtomicBool,
}

impl CancelFlag {
    /// Create a flag with no cancellation pending
    pub const fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
        }
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Clear a pending cancellation
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Release);
    }
}

impl Cancellation for CancelFlag {
    #[inline]
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl<T: Cancellation + ?Sized> Cancellation for &T {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

/// Run `primitive` as a cancellation point
pub fn cancellation_point<C, F>(cancel: &C, primitive: F) -> Result<usize>
where
    C: Cancellation + ?Sized,
    F: FnOnce() -> core::result::Result<usize, Errno>,
{
    if cancel.is_cancelled() {
        return Err(Error::Canceled);
    }
    match primitive() {
        Err(Errno::EINTR) if cancel.is_cancelled() => Err(Error::Canceled),
        result => result.map_err(Error::Os),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_cancellation_skips_primitive() {
        let flag = CancelFlag::new();
        flag.cancel();
        let mut issued = false;
        let result = cancellation_point(&flag, || {
            issued = true;
            Ok(1)
        });
        assert_eq!(result, Err(Error::Canceled));
        assert!(!issued);
    }

    #[test]
    fn test_interrupted_by_cancellation() {
        let flag = CancelFlag::new();
        let result = cancellation_point(&flag, || {
            flag.cancel();
            Err(Errno::EINTR)
        });
        assert_eq!(result, Err(Error::Canceled));
    }

    #[test]
    fn test_plain_interruption_passes_through() {
        let result = cancellation_point(&NeverCancel, || Err(Errno::EINTR));
        assert_eq!(result, Err(Error::Os(Errno::EINTR)));
    }

    #[test]
    fn test_results_verbatim() {
        assert_eq!(cancellation_point(&NeverCancel, || Ok(42)), Ok(42));
        assert_eq!(
            cancellation_point(&NeverCancel, || Err(Errno::EBADF)),
            Err(Error::Os(Errno::EBADF))
        );
    }

    #[test]
    fn test_reset() {
        let flag = CancelFlag::new();
        flag.cancel();
        assert!(flag.is_cancelled());
        flag.reset();
        assert_eq!(cancellation_point(&flag, || Ok(3)), Ok(3));
    }
}
