//! Error handling for the platform layer
//!
//! Failures fall into three classes that callers must be able to tell
//! apart: the platform cannot provide an operation at all (configuration),
//! a request asks for more than this platform can honor (unsupported), and
//! an ordinary runtime failure reported by the underlying primitive.

use core::fmt;

/// Native errno numbers for the build target
#[cfg(unix)]
mod raw {
    pub use libc::{EAGAIN, EBADF, ECANCELED, EFAULT, EINTR, EINVAL, ENOSYS, ENOTSUP, EOPNOTSUPP};
}

/// Linux generic numbers where the C library has none
#[cfg(not(unix))]
mod raw {
    pub const EINTR: i32 = 4;
    pub const EBADF: i32 = 9;
    pub const EAGAIN: i32 = 11;
    pub const EFAULT: i32 = 14;
    pub const EINVAL: i32 = 22;
    pub const ENOSYS: i32 = 38;
    pub const ENOTSUP: i32 = 95;
    pub const EOPNOTSUPP: i32 = 95;
    pub const ECANCELED: i32 = 125;
}

/// An errno value, as reported by the kernel or set for the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Errno(pub i32);

impl Errno {
    /// Interrupted system call
    pub const EINTR: Errno = Errno(raw::EINTR);
    /// Bad file descriptor
    pub const EBADF: Errno = Errno(raw::EBADF);
    /// Resource temporarily unavailable
    pub const EAGAIN: Errno = Errno(raw::EAGAIN);
    /// Bad address
    pub const EFAULT: Errno = Errno(raw::EFAULT);
    /// Invalid argument
    pub const EINVAL: Errno = Errno(raw::EINVAL);
    /// Function not implemented
    pub const ENOSYS: Errno = Errno(raw::ENOSYS);
    /// Operation not supported
    pub const ENOTSUP: Errno = Errno(raw::ENOTSUP);
    /// Operation not supported on socket; equal to `ENOTSUP` on Linux
    pub const EOPNOTSUPP: Errno = Errno(raw::EOPNOTSUPP);
    /// Operation canceled
    pub const ECANCELED: Errno = Errno(raw::ECANCELED);

    /// Returns the raw errno value
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Returns true when the kernel reported the call as not implemented
    pub const fn is_not_implemented(self) -> bool {
        self.0 == raw::ENOSYS
    }

    /// Returns the symbolic name of well-known values
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            raw::EINTR => Some("EINTR"),
            raw::EBADF => Some("EBADF"),
            raw::EAGAIN => Some("EAGAIN"),
            raw::EFAULT => Some("EFAULT"),
            raw::EINVAL => Some("EINVAL"),
            raw::ENOSYS => Some("ENOSYS"),
            raw::ENOTSUP => Some("ENOTSUP"),
            raw::ECANCELED => Some("ECANCELED"),
            _ => None,
        }
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", name, self.0),
            None => write!(f, "errno {}", self.0),
        }
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for Errno {
    fn from(err: std::io::Error) -> Self {
        Errno(err.raw_os_error().unwrap_or(Errno::EINVAL.0))
    }
}

#[cfg(feature = "std")]
impl From<Errno> for std::io::Error {
    fn from(errno: Errno) -> Self {
        std::io::Error::from_raw_os_error(errno.0)
    }
}

/// Which of the three user-visible failure classes an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The platform cannot provide the operation at all
    Configuration,
    /// This request's flags are too advanced for the platform
    Unsupported,
    /// An ordinary runtime error occurred
    Runtime,
}

/// Common error type used throughout the platform layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A candidate table or binding is misconfigured
    Config {
        /// Operation the table implements
        operation: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },
    /// No operation of that name has been registered
    UnknownOperation(&'static str),
    /// The fallback primitive cannot honor the requested flags
    Unsupported {
        /// Syscall family that rejected the request
        operation: &'static str,
        /// Raw requested flag bits
        flags: u32,
    },
    /// The underlying primitive failed; the errno is passed through verbatim
    Os(Errno),
    /// A cancellation point observed a pending cancellation
    Canceled,
}

impl Error {
    /// Returns the errno reported to C-style callers
    pub const fn errno(&self) -> Errno {
        match self {
            Error::Config { .. } | Error::UnknownOperation(_) => Errno::ENOSYS,
            Error::Unsupported { .. } => Errno::ENOTSUP,
            Error::Os(errno) => *errno,
            Error::Canceled => Errno::ECANCELED,
        }
    }

    /// Returns the failure class of this error
    pub const fn class(&self) -> ErrorClass {
        match self {
            Error::Config { .. } | Error::UnknownOperation(_) => ErrorClass::Configuration,
            Error::Unsupported { .. } => ErrorClass::Unsupported,
            Error::Os(_) | Error::Canceled => ErrorClass::Runtime,
        }
    }

    /// Returns true when the kernel reported the call as not implemented
    pub const fn is_not_implemented(&self) -> bool {
        matches!(self, Error::Os(errno) if errno.is_not_implemented())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config { operation, reason } => {
                write!(f, "Configuration error for {}: {}", operation, reason)
            }
            Error::UnknownOperation(name) => write!(f, "Unknown operation: {}", name),
            Error::Unsupported { operation, flags } => {
                write!(f, "{}: flags {:#x} not supported", operation, flags)
            }
            Error::Os(errno) => write!(f, "OS error: {}", errno),
            Error::Canceled => write!(f, "Operation canceled"),
        }
    }
}

impl From<Errno> for Error {
    fn from(errno: Errno) -> Self {
        Error::Os(errno)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        std::io::Error::from_raw_os_error(err.errno().raw())
    }
}

/// Result type for operations that can fail
pub type Result<T> = core::result::Result<T, Error>;

/// Creates a new configuration error
pub const fn config_error(operation: &'static str, reason: &'static str) -> Error {
    Error::Config { operation, reason }
}

/// Creates a new unsupported-flags error
pub const fn unsupported(operation: &'static str, flags: u32) -> Error {
    Error::Unsupported { operation, flags }
}
