//! System call names
//!
//! The dispatcher never deals in raw syscall numbers; it names the calls it
//! wants and lets the raw backend translate. Only the Linux numbering is
//! known here.

use core::fmt;

/// Symbolic name of a system call used by the fallback dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sysno {
    /// Vectored positional read with per-call flags
    Preadv2,
    /// Vectored positional write with per-call flags
    Pwritev2,
    /// Vectored read at the descriptor's current position
    Readv,
    /// Vectored write at the descriptor's current position
    Writev,
    /// Vectored read at an explicit position
    Preadv,
    /// Vectored write at an explicit position
    Pwritev,
}

impl Sysno {
    /// Returns the syscall name as the kernel documents it
    pub const fn name(self) -> &'static str {
        match self {
            Sysno::Preadv2 => "preadv2",
            Sysno::Pwritev2 => "pwritev2",
            Sysno::Readv => "readv",
            Sysno::Writev => "writev",
            Sysno::Preadv => "preadv",
            Sysno::Pwritev => "pwritev",
        }
    }

    /// Returns the Linux syscall number for the running architecture
    #[cfg(target_os = "linux")]
    pub const fn number(self) -> libc::c_long {
        match self {
            Sysno::Preadv2 => libc::SYS_preadv2,
            Sysno::Pwritev2 => libc::SYS_pwritev2,
            Sysno::Readv => libc::SYS_readv,
            Sysno::Writev => libc::SYS_writev,
            Sysno::Preadv => libc::SYS_preadv,
            Sysno::Pwritev => libc::SYS_pwritev,
        }
    }
}

impl fmt::Display for Sysno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Answer of a kernel-feature probe for one syscall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Availability {
    /// The running kernel implements the syscall
    Present,
    /// The running kernel reports the syscall as not implemented
    Absent,
    /// The probe cannot tell; callers should attempt the call and learn
    #[default]
    Unknown,
}

impl Availability {
    /// Returns true unless the syscall is known to be absent
    pub const fn worth_attempting(self) -> bool {
        !matches!(self, Availability::Absent)
    }
}
