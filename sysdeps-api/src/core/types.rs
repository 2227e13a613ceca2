//! Core types used throughout the platform layer

use bitflags::bitflags;

/// File descriptor type
pub type Fd = i32;

bitflags! {
    /// Hardware features a candidate implementation may require.
    ///
    /// A requirement is a conjunction: a candidate needing `SSE2 | AVX2` is
    /// selectable only when both bits are present in the detected set. The
    /// empty set is the always-true requirement carried by baseline
    /// candidates.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HwCaps: u32 {
        // x86_64
        const SSE2 = 1 << 0;
        const SSE4_2 = 1 << 1;
        const AVX = 1 << 2;
        const AVX2 = 1 << 3;
        const AVX512F = 1 << 4;
        const AVX512BW = 1 << 5;
        const BMI2 = 1 << 6;

        // aarch64
        const NEON = 1 << 8;
        const SVE = 1 << 9;

        // s390x vector facilities (z13, z14, z15)
        const VX = 1 << 16;
        const VXE = 1 << 17;
        const VXE2 = 1 << 18;
    }
}

impl HwCaps {
    /// Returns true when every capability in `required` is present.
    #[inline]
    pub const fn satisfies(self, required: HwCaps) -> bool {
        self.contains(required)
    }

    /// Looks up a single named capability, ignoring ASCII case.
    pub fn from_name_ignore_case(name: &str) -> Option<HwCaps> {
        HwCaps::all()
            .iter_names()
            .find(|(flag, _)| flag.eq_ignore_ascii_case(name))
            .map(|(_, caps)| caps)
    }
}
