//! Scatter/gather buffer views
//!
//! [`IoSliceMut`] and [`IoSlice`] borrow caller buffers and are laid out
//! exactly like `struct iovec`, so a slice of them can be handed to the
//! kernel without copying.

use core::ffi::c_void;
use core::marker::PhantomData;
use core::{fmt, slice};

/// The kernel's `struct iovec`
#[derive(Clone, Copy)]
#[repr(C)]
pub struct IoVec {
    /// Start of the buffer
    pub base: *mut c_void,
    /// Length of the buffer in bytes
    pub len: usize,
}

#[cfg(unix)]
static_assertions::assert_eq_size!(IoVec, libc::iovec);
#[cfg(unix)]
static_assertions::assert_eq_align!(IoVec, libc::iovec);

impl fmt::Debug for IoVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IoVec")
            .field("base", &self.base)
            .field("len", &self.len)
            .finish()
    }
}

/// A buffer the kernel may write into
#[repr(transparent)]
pub struct IoSliceMut<'a> {
    vec: IoVec,
    _buf: PhantomData<&'a mut [u8]>,
}

// SAFETY: an IoSliceMut is semantically a `&mut [u8]`.
unsafe impl Send for IoSliceMut<'_> {}
// SAFETY: as above.
unsafe impl Sync for IoSliceMut<'_> {}

impl<'a> IoSliceMut<'a> {
    /// Wrap a mutable buffer
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            vec: IoVec {
                base: buf.as_mut_ptr().cast(),
                len: buf.len(),
            },
            _buf: PhantomData,
        }
    }

    /// Length of the buffer
    pub const fn len(&self) -> usize {
        self.vec.len
    }

    /// Returns true for an empty buffer
    pub const fn is_empty(&self) -> bool {
        self.vec.len == 0
    }

    /// View the buffer
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: base and len came from a live `&'a mut [u8]`.
        unsafe { slice::from_raw_parts(self.vec.base.cast::<u8>(), self.vec.len) }
    }

    /// View the buffer mutably
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: base and len came from a live `&'a mut [u8]` we hold uniquely.
        unsafe { slice::from_raw_parts_mut(self.vec.base.cast::<u8>(), self.vec.len) }
    }

    /// The raw iovec array backing `bufs`
    pub fn as_iovecs<'b>(bufs: &'b [IoSliceMut<'a>]) -> &'b [IoVec] {
        // SAFETY: IoSliceMut is repr(transparent) over IoVec.
        unsafe { slice::from_raw_parts(bufs.as_ptr().cast::<IoVec>(), bufs.len()) }
    }
}

impl fmt::Debug for IoSliceMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}

/// A buffer the kernel may read from
#[repr(transparent)]
pub struct IoSlice<'a> {
    vec: IoVec,
    _buf: PhantomData<&'a [u8]>,
}

// SAFETY: an IoSlice is semantically a `&[u8]`.
unsafe impl Send for IoSlice<'_> {}
// SAFETY: as above.
unsafe impl Sync for IoSlice<'_> {}

impl<'a> IoSlice<'a> {
    /// Wrap a buffer
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            vec: IoVec {
                base: buf.as_ptr().cast_mut().cast(),
                len: buf.len(),
            },
            _buf: PhantomData,
        }
    }

    /// Length of the buffer
    pub const fn len(&self) -> usize {
        self.vec.len
    }

    /// Returns true for an empty buffer
    pub const fn is_empty(&self) -> bool {
        self.vec.len == 0
    }

    /// View the buffer
    pub fn as_slice(&self) -> &'a [u8] {
        // SAFETY: base and len came from a live `&'a [u8]`.
        unsafe { slice::from_raw_parts(self.vec.base.cast::<u8>().cast_const(), self.vec.len) }
    }

    /// The raw iovec array backing `bufs`
    pub fn as_iovecs<'b>(bufs: &'b [IoSlice<'a>]) -> &'b [IoVec] {
        // SAFETY: IoSlice is repr(transparent) over IoVec.
        unsafe { slice::from_raw_parts(bufs.as_ptr().cast::<IoVec>(), bufs.len()) }
    }
}

impl fmt::Debug for IoSlice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}
