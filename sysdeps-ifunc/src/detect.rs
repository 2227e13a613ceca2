//! Host capability detection
//!
//! Detection combines what the compiler already guarantees
//! (`cfg!(target_feature = ...)`) with what the running CPU reports:
//!
//! - x86_64 and aarch64: the standard library's feature-detection macros
//!   (requires `std`)
//! - s390x Linux: the kernel's `AT_HWCAP` auxiliary vector entry
//!
//! The result is masked by the hwcap tunable (see [`crate::tunables`]) and
//! cached for the life of the process. Every [`Binding`](crate::Binding)
//! built with [`HostProbe`] therefore sees the same capability set.

use spin::Once;
use sysdeps_api::sys_debug;
use sysdeps_api::{HardwareProbe, HwCaps};

use crate::tunables::{self, MaskCell};

static HOST_CAPS: Once<HwCaps> = Once::new();

/// Returns the host's usable capabilities, detecting them on first use
pub fn host_caps() -> HwCaps {
    capture(&HOST_CAPS, &tunables::MASK, detect_uncached)
}

/// Detect into `cell` once, freezing `mask` before the hardware is asked
fn capture(cell: &Once<HwCaps>, mask: &MaskCell, detect: impl FnOnce() -> HwCaps) -> HwCaps {
    *cell.call_once(|| {
        let mask = mask.freeze();
        let detected = detect();
        let caps = mask.apply(detected);
        sys_debug!(
            "host capabilities {:?} (masked off {:?})",
            caps,
            detected.difference(caps)
        );
        caps
    })
}

/// The probe used by process-wide bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HostProbe;

impl HardwareProbe for HostProbe {
    fn detect(&self) -> HwCaps {
        host_caps()
    }
}

/// Detect capabilities without consulting the cache or the mask
pub fn detect_uncached() -> HwCaps {
    compile_time() | runtime()
}

/// Capabilities the compiler was told it may assume
pub const fn compile_time() -> HwCaps {
    let mut bits = 0;

    if cfg!(target_feature = "sse2") {
        bits |= HwCaps::SSE2.bits();
    }
    if cfg!(target_feature = "sse4.2") {
        bits |= HwCaps::SSE4_2.bits();
    }
    if cfg!(target_feature = "avx") {
        bits |= HwCaps::AVX.bits();
    }
    if cfg!(target_feature = "avx2") {
        bits |= HwCaps::AVX2.bits();
    }
    if cfg!(target_feature = "avx512f") {
        bits |= HwCaps::AVX512F.bits();
    }
    if cfg!(target_feature = "avx512bw") {
        bits |= HwCaps::AVX512BW.bits();
    }
    if cfg!(target_feature = "bmi2") {
        bits |= HwCaps::BMI2.bits();
    }
    if cfg!(all(target_arch = "aarch64", target_feature = "neon")) {
        bits |= HwCaps::NEON.bits();
    }
    if cfg!(all(target_arch = "aarch64", target_feature = "sve")) {
        bits |= HwCaps::SVE.bits();
    }
    if cfg!(all(target_arch = "s390x", target_feature = "vector")) {
        bits |= HwCaps::VX.bits();
    }

    HwCaps::from_bits_truncate(bits)
}

#[cfg(all(feature = "std", target_arch = "x86_64"))]
fn runtime() -> HwCaps {
    let mut caps = HwCaps::empty();

    if std::arch::is_x86_feature_detected!("sse2") {
        caps |= HwCaps::SSE2;
    }
    if std::arch::is_x86_feature_detected!("sse4.2") {
        caps |= HwCaps::SSE4_2;
    }
    if std::arch::is_x86_feature_detected!("avx") {
        caps |= HwCaps::AVX;
    }
    if std::arch::is_x86_feature_detected!("avx2") {
        caps |= HwCaps::AVX2;
    }
    if std::arch::is_x86_feature_detected!("avx512f") {
        caps |= HwCaps::AVX512F;
    }
    if std::arch::is_x86_feature_detected!("avx512bw") {
        caps |= HwCaps::AVX512BW;
    }
    if std::arch::is_x86_feature_detected!("bmi2") {
        caps |= HwCaps::BMI2;
    }

    caps
}

#[cfg(all(feature = "std", target_arch = "aarch64"))]
fn runtime() -> HwCaps {
    let mut caps = HwCaps::empty();

    if std::arch::is_aarch64_feature_detected!("neon") {
        caps |= HwCaps::NEON;
    }
    if std::arch::is_aarch64_feature_detected!("sve") {
        caps |= HwCaps::SVE;
    }

    caps
}

#[cfg(all(target_arch = "s390x", target_os = "linux"))]
fn runtime() -> HwCaps {
    // Kernel HWCAP_S390_* bits for the z13/z14/z15 vector facilities
    const HWCAP_S390_VXRS: libc::c_ulong = 1 << 11;
    const HWCAP_S390_VXRS_EXT: libc::c_ulong = 1 << 13;
    const HWCAP_S390_VXRS_EXT2: libc::c_ulong = 1 << 15;

    // SAFETY: getauxval only reads the process auxiliary vector.
    let hwcap = unsafe { libc::getauxval(libc::AT_HWCAP) };

    let mut caps = HwCaps::empty();
    if hwcap & HWCAP_S390_VXRS != 0 {
        caps |= HwCaps::VX;
    }
    if hwcap & HWCAP_S390_VXRS_EXT != 0 {
        caps |= HwCaps::VXE;
    }
    if hwcap & HWCAP_S390_VXRS_EXT2 != 0 {
        caps |= HwCaps::VXE2;
    }
    caps
}

#[cfg(not(any(
    all(feature = "std", any(target_arch = "x86_64", target_arch = "aarch64")),
    all(target_arch = "s390x", target_os = "linux")
)))]
fn runtime() -> HwCaps {
    HwCaps::empty()
}
