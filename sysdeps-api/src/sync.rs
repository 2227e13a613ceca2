//! Synchronization primitives for the platform layer
//!
//! Everything here works without the standard library. Bindings and probe
//! caches are single-assignment `Once` cells; the operation registry is the
//! only lock, and it is never taken on a bound call.

pub use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
pub use spin::{Mutex, Once, RwLock};
