//! Unified logging support for the sysdeps crates
//!
//! This module provides a logging interface that works whether or not the
//! `log` feature is enabled, without requiring repetitive `#[cfg]`
//! attributes throughout the codebase. With `log` disabled the macros still
//! type-check their arguments but emit nothing.

/// Unified trace-level logging
#[cfg(feature = "log")]
#[macro_export]
macro_rules! sys_trace {
    ($($arg:tt)*) => {
        $crate::__log::trace!($($arg)*)
    };
}

/// Unified trace-level logging
#[cfg(not(feature = "log"))]
#[macro_export]
macro_rules! sys_trace {
    ($($arg:tt)*) => {{
        let _ = ::core::format_args!($($arg)*);
    }};
}

/// Unified debug-level logging
#[cfg(feature = "log")]
#[macro_export]
macro_rules! sys_debug {
    ($($arg:tt)*) => {
        $crate::__log::debug!($($arg)*)
    };
}

/// Unified debug-level logging
#[cfg(not(feature = "log"))]
#[macro_export]
macro_rules! sys_debug {
    ($($arg:tt)*) => {{
        let _ = ::core::format_args!($($arg)*);
    }};
}

/// Unified info-level logging
#[cfg(feature = "log")]
#[macro_export]
macro_rules! sys_info {
    ($($arg:tt)*) => {
        $crate::__log::info!($($arg)*)
    };
}

/// Unified info-level logging
#[cfg(not(feature = "log"))]
#[macro_export]
macro_rules! sys_info {
    ($($arg:tt)*) => {{
        let _ = ::core::format_args!($($arg)*);
    }};
}

/// Unified warn-level logging
#[cfg(feature = "log")]
#[macro_export]
macro_rules! sys_warn {
    ($($arg:tt)*) => {
        $crate::__log::warn!($($arg)*)
    };
}

/// Unified warn-level logging
#[cfg(not(feature = "log"))]
#[macro_export]
macro_rules! sys_warn {
    ($($arg:tt)*) => {{
        let _ = ::core::format_args!($($arg)*);
    }};
}

/// Unified error-level logging
#[cfg(feature = "log")]
#[macro_export]
macro_rules! sys_error {
    ($($arg:tt)*) => {
        $crate::__log::error!($($arg)*)
    };
}

/// Unified error-level logging
#[cfg(not(feature = "log"))]
#[macro_export]
macro_rules! sys_error {
    ($($arg:tt)*) => {{
        let _ = ::core::format_args!($($arg)*);
    }};
}
