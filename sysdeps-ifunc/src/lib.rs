//! sysdeps IFUNC - Capability-gated variant resolution
//!
//! Selects, once per process, the most specialized implementation of a named
//! operation that the running CPU can execute.
//!
//! # Architecture
//!
//! - **Candidate**: ordered candidate tables and the pure selection rule
//! - **Binding**: the single-assignment cell holding one operation's choice
//! - **Registry**: resolve-by-name over all registered bindings
//! - **Detect**: host capability detection, cached process-wide
//! - **Tunables**: the hwcap mask that hides capabilities before detection
//! - **String**: `memchr` and `memccpy` with their ISA variants
//!
//! # Usage
//!
//! ```rust
//! use sysdeps_ifunc::string;
//!
//! assert_eq!(string::memchr(b"abc", b'c'), Some(2));
//! println!("memchr uses {}", string::memchr_binding().selected_name());
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

pub mod binding;
pub mod candidate;
pub mod detect;
pub mod registry;
pub mod string;
pub mod tunables;

pub use binding::Binding;
pub use candidate::{select, Candidate, CandidateTable, Selected};
pub use detect::{host_caps, HostProbe};
pub use registry::{register, registered_operations, resolve, OperationBinding};
pub use tunables::{set_hwcap_mask, HwCapMask};

/// Initialize the resolver: validate and register the built-in operations.
///
/// Safe to call more than once.
pub fn init() -> sysdeps_api::Result<()> {
    string::register_builtin()
}
