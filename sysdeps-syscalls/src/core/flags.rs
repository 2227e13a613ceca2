//! Per-call I/O flags

use bitflags::bitflags;

bitflags! {
    /// `RWF_*` flags accepted by `preadv2`/`pwritev2`.
    ///
    /// Bits the kernel does not define are retained, so a modern kernel can
    /// reject them itself and the fallback path can count them as requested.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RwfFlags: u32 {
        /// High-priority polled I/O
        const HIPRI = 0x0000_0001;
        /// Per-call `O_DSYNC`
        const DSYNC = 0x0000_0002;
        /// Per-call `O_SYNC`
        const SYNC = 0x0000_0004;
        /// Fail with `EAGAIN` instead of blocking
        const NOWAIT = 0x0000_0008;
        /// Per-call `O_APPEND`
        const APPEND = 0x0000_0010;
    }
}

impl RwfFlags {
    /// Interpret raw C flags, keeping unknown bits
    pub const fn from_raw(raw: i32) -> Self {
        Self::from_bits_retain(raw as u32)
    }

    /// The raw value handed to the kernel
    pub const fn raw(self) -> i32 {
        self.bits() as i32
    }

    /// Bits set that no named flag covers
    pub const fn unknown_bits(self) -> u32 {
        self.bits() & !Self::all().bits()
    }
}
