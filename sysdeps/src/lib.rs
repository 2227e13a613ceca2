//! sysdeps - Platform layer entry points
//!
//! One surface over the two halves of the platform layer:
//!
//! - string primitives whose implementation is chosen once per process
//!   from the CPU's capabilities (`sysdeps-ifunc`)
//! - `preadv2`/`pwritev2` that keep working on kernels without them
//!   (`sysdeps-syscalls`)
//!
//! The syscall entry points take the offset and flags in their raw C form:
//! an offset of `-1` means the descriptor's current position, and flags
//! are the `RWF_*` bits as an `i32`.
//!
//! # Usage
//!
//! ```rust
//! sysdeps::init().unwrap();
//!
//! assert_eq!(sysdeps::memchr(b"key=value", b'='), Some(3));
//! println!("memchr -> {}", sysdeps::resolve("memchr").unwrap());
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]

use sysdeps_api::sync::Once;

pub use sysdeps_api::{Errno, Error, ErrorClass, Fd, HwCaps, Result};
pub use sysdeps_ifunc::string::{memccpy, memchr};
pub use sysdeps_ifunc::{host_caps, registered_operations, set_hwcap_mask, HwCapMask};
pub use sysdeps_syscalls::{IoSlice, IoSliceMut, Offset, RwfFlags};

#[cfg(target_os = "linux")]
pub use sysdeps_syscalls::default_dispatcher;

static INIT: Once<Result<()>> = Once::new();

/// Validate every built-in candidate table and register the built-in
/// operations with the resolver.
///
/// Only the first call does any work; later calls return its outcome.
pub fn init() -> Result<()> {
    *INIT.call_once(|| {
        let result = sysdeps_ifunc::init();
        match result {
            Ok(()) => sysdeps_api::sys_debug!(
                "sysdeps: {} operations registered",
                sysdeps_ifunc::registered_operations().len()
            ),
            Err(e) => sysdeps_api::sys_error!("sysdeps: init failed: {}", e),
        }
        result
    })
}

/// Name of the variant bound for `operation`, binding it if needed.
///
/// Registers the built-in operations first, so this works before an
/// explicit [`init`].
pub fn resolve(operation: &'static str) -> Result<&'static str> {
    init()?;
    sysdeps_ifunc::resolve(operation)
}

/// Scatter read at `offset` (`-1` for the current position) with `RWF_*`
/// `flags`, falling back to `readv`/`preadv` where the kernel lacks
/// `preadv2`.
#[cfg(target_os = "linux")]
pub fn preadv2(fd: Fd, bufs: &mut [IoSliceMut<'_>], offset: i64, flags: i32) -> Result<usize> {
    default_dispatcher().preadv2(fd, bufs, Offset::from_raw(offset), RwfFlags::from_raw(flags))
}

/// Gather write at `offset` (`-1` for the current position) with `RWF_*`
/// `flags`, falling back to `writev`/`pwritev` where the kernel lacks
/// `pwritev2`.
#[cfg(target_os = "linux")]
pub fn pwritev2(fd: Fd, bufs: &[IoSlice<'_>], offset: i64, flags: i32) -> Result<usize> {
    default_dispatcher().pwritev2(fd, bufs, Offset::from_raw(offset), RwfFlags::from_raw(flags))
}
