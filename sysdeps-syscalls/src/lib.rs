//! sysdeps Syscalls - Syscall fallback dispatcher
//!
//! Exposes `preadv2`/`pwritev2` on every kernel. When the running kernel
//! reports the modern call as not implemented, a request without flags is
//! served by `readv`/`preadv` (or `writev`/`pwritev`) depending on the
//! offset; a request with any flag fails with `ENOTSUP` rather than being
//! approximated. Every other failure is reported verbatim.
//!
//! # Architecture
//!
//! - **Core**: request flags, offsets and the raw-operation trait
//! - **Uio**: iovec-compatible buffer views
//! - **Policy**: per-family fallback rules
//! - **Cancel**: cancellation sources and the cancellation point wrapper
//! - **Dispatcher**: the state machine tying these together
//! - **Linux**: the real backend, kernel probe and process-wide dispatcher
//!
//! # Usage
//!
//! ```rust,no_run
//! use sysdeps_syscalls::{default_dispatcher, IoSliceMut, Offset, RwfFlags};
//!
//! let mut buf = [0u8; 64];
//! let mut bufs = [IoSliceMut::new(&mut buf)];
//! let n = default_dispatcher().preadv2(0, &mut bufs, Offset::Current, RwfFlags::empty());
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod cancel;
pub mod core;
pub mod dispatcher;
pub mod policy;
pub mod uio;

#[cfg(target_os = "linux")]
pub mod linux;

pub use crate::cancel::{cancellation_point, CancelFlag, Cancellation, NeverCancel};
pub use crate::core::flags::RwfFlags;
pub use crate::core::offset::Offset;
pub use crate::core::traits::{RawIo, RawResult};
pub use crate::dispatcher::{Dispatch, DispatchState, DispatchStats, Dispatcher};
pub use crate::policy::{FallbackPolicy, Route};
pub use crate::uio::{IoSlice, IoSliceMut, IoVec};

#[cfg(target_os = "linux")]
pub use crate::linux::{default_dispatcher, LinuxDispatcher, LinuxKernelProbe, LinuxRawIo};
