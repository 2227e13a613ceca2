//! sysdeps API - Shared vocabulary for the platform layer
//!
//! This crate provides the types and interfaces shared by the variant
//! resolver (`sysdeps-ifunc`) and the syscall fallback dispatcher
//! (`sysdeps-syscalls`). Neither of those crates depends on the other; both
//! depend on this one.
//!
//! # Architecture
//!
//! - **Core**: hardware capability sets and the probe traits through which
//!   the running environment is queried
//! - **Error**: errno values, the error taxonomy and the `Result` alias
//! - **Syscall**: symbolic syscall names and kernel availability answers
//! - **Logging**: feature-gated logging macros
//!
//! # Usage
//!
//! ```rust
//! use sysdeps_api::{Error, Errno, HwCaps};
//!
//! let caps = HwCaps::SSE2 | HwCaps::AVX2;
//! assert!(caps.contains(HwCaps::AVX2));
//!
//! let err = Error::Os(Errno::EBADF);
//! assert_eq!(err.errno(), Errno::EBADF);
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]

// Core modules
pub mod core;
pub mod error;
pub mod logging;
pub mod sync;
pub mod syscall;

#[cfg(feature = "log")]
#[doc(hidden)]
pub use log as __log;

// Re-export commonly used types
pub use crate::core::traits::{HardwareProbe, KernelProbe};
pub use crate::core::types::{Fd, HwCaps};
pub use crate::error::{Errno, Error, ErrorClass, Result};
pub use crate::syscall::{Availability, Sysno};

#[cfg(feature = "mock")]
pub use crate::core::traits::{MockHardwareProbe, MockKernelProbe};
