//! Fallback policies
//!
//! A policy names one syscall family's modern call and the two older
//! primitives that stand in for it, and says which requested flags a
//! fallback may honor. No flag can be retrofitted onto `readv`/`preadv` or
//! `writev`/`pwritev` without changing behavior, so both policies honor
//! none: any requested flag makes the fallback fail with `ENOTSUP`.

use sysdeps_api::error::unsupported;
use sysdeps_api::{Result, Sysno};

use crate::core::flags::RwfFlags;
use crate::core::offset::Offset;

/// Which primitive a dispatch used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// The modern flagged syscall
    Modern,
    /// The older primitive working at the current position
    Positionless,
    /// The older primitive taking an explicit position
    Positional,
}

/// Static fallback rule for one syscall family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackPolicy {
    /// Family name, used in errors and logs
    pub family: &'static str,
    /// The modern syscall
    pub modern: Sysno,
    /// Stand-in when the offset is the current-position sentinel
    pub positionless: Sysno,
    /// Stand-in for an explicit offset
    pub positional: Sysno,
    /// Flags a fallback can honor without approximating them
    pub honored_flags: RwfFlags,
}

impl FallbackPolicy {
    /// `preadv2` falls back to `readv` or `preadv`
    pub const PREADV2: FallbackPolicy = FallbackPolicy {
        family: "preadv2",
        modern: Sysno::Preadv2,
        positionless: Sysno::Readv,
        positional: Sysno::Preadv,
        honored_flags: RwfFlags::empty(),
    };

    /// `pwritev2` falls back to `writev` or `pwritev`
    pub const PWRITEV2: FallbackPolicy = FallbackPolicy {
        family: "pwritev2",
        modern: Sysno::Pwritev2,
        positionless: Sysno::Writev,
        positional: Sysno::Pwritev,
        honored_flags: RwfFlags::empty(),
    };

    /// Reject requests carrying any flag the fallback cannot honor.
    ///
    /// Unknown bits count as requested flags.
    pub const fn check(&self, flags: RwfFlags) -> Result<()> {
        if flags.bits() & !self.honored_flags.bits() != 0 {
            Err(unsupported(self.family, flags.bits()))
        } else {
            Ok(())
        }
    }

    /// Pick the older primitive for `offset`
    pub const fn route(&self, offset: Offset) -> Route {
        match offset {
            Offset::Current => Route::Positionless,
            Offset::At(_) => Route::Positional,
        }
    }

    /// The syscall a route issues in this family
    pub const fn sysno(&self, route: Route) -> Sysno {
        match route {
            Route::Modern => self.modern,
            Route::Positionless => self.positionless,
            Route::Positional => self.positional,
        }
    }
}
