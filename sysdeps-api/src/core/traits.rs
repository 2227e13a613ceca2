//! Probe traits consumed by the resolver and the dispatcher
//!
//! Both probes are external collaborators: the platform layer only ever asks
//! them side-effect-free questions. Tests substitute mocks (feature `mock`).

use crate::core::types::HwCaps;
use crate::syscall::{Availability, Sysno};

/// Hardware feature probe
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait HardwareProbe {
    /// Returns the set of hardware capabilities usable by this process
    fn detect(&self) -> HwCaps;

    /// Returns true when `feature` is present
    fn has(&self, feature: HwCaps) -> bool {
        self.detect().contains(feature)
    }
}

/// Kernel feature probe
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait KernelProbe {
    /// Reports whether the running kernel implements `sysno`
    fn has_syscall(&self, sysno: Sysno) -> Availability;
}

/// A fixed capability set, for targets where detection is done elsewhere
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StaticProbe(pub HwCaps);

impl HardwareProbe for StaticProbe {
    fn detect(&self) -> HwCaps {
        self.0
    }
}

/// A kernel probe that never answers, so every modern call is attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttemptProbe;

impl KernelProbe for AttemptProbe {
    fn has_syscall(&self, _sysno: Sysno) -> Availability {
        Availability::Unknown
    }
}

impl<T: HardwareProbe + ?Sized> HardwareProbe for &T {
    fn detect(&self) -> HwCaps {
        (**self).detect()
    }
}

impl<T: KernelProbe + ?Sized> KernelProbe for &T {
    fn has_syscall(&self, sysno: Sysno) -> Availability {
        (**self).has_syscall(sysno)
    }
}
