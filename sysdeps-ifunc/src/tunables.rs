//! The hwcap mask tunable
//!
//! Operators can mask capabilities off before anything is resolved, forcing
//! less specialized variants. The mask is a comma-separated list of
//! capability names, each prefixed with `-`:
//!
//! ```text
//! SYSDEPS_HWCAPS=-AVX2,-AVX512BW
//! ```
//!
//! Names are matched case-insensitively. Unknown names are ignored with a
//! warning. A `+NAME` entry is accepted but never adds a capability the
//! hardware lacks.
//!
//! A mask set with [`set_hwcap_mask`] takes precedence over the environment.
//! Both are read once, when host capabilities are first detected. Detection
//! freezes the mask under the same lock `set_hwcap_mask` takes, so a mask
//! either lands before detection reads it or is rejected.

use spin::Mutex;
use sysdeps_api::error::config_error;
use sysdeps_api::sys_warn;
use sysdeps_api::{HwCaps, Result};

/// Environment variable read under `std` when no mask was set programmatically
pub const HWCAPS_ENV: &str = "SYSDEPS_HWCAPS";

pub(crate) static MASK: MaskCell = MaskCell::new();

/// A set of capabilities to hide from resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HwCapMask {
    disabled: HwCaps,
}

impl HwCapMask {
    /// A mask that hides nothing
    pub const NONE: HwCapMask = HwCapMask {
        disabled: HwCaps::empty(),
    };

    /// A mask hiding `caps`
    pub const fn disabling(caps: HwCaps) -> Self {
        Self { disabled: caps }
    }

    /// The capabilities this mask hides
    pub const fn disabled(&self) -> HwCaps {
        self.disabled
    }

    /// Apply the mask to a detected capability set
    pub const fn apply(&self, caps: HwCaps) -> HwCaps {
        caps.difference(self.disabled)
    }

    /// Parse a mask such as `"-AVX2,-SSE2"`
    pub fn parse(spec: &str) -> Self {
        let mut disabled = HwCaps::empty();

        for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (disable, name) = match entry.strip_prefix('-') {
                Some(name) => (true, name),
                None => (false, entry.strip_prefix('+').unwrap_or(entry)),
            };

            match HwCaps::from_name_ignore_case(name.trim()) {
                Some(caps) if disable => disabled |= caps,
                Some(_) => {}
                None => sys_warn!("ignoring unknown hwcap {:?} in mask {:?}", name, spec),
            }
        }

        Self { disabled }
    }
}

struct MaskState {
    mask: Option<HwCapMask>,
    frozen: bool,
}

/// The process mask and whether detection has consumed it
pub(crate) struct MaskCell {
    state: Mutex<MaskState>,
}

impl MaskCell {
    pub(crate) const fn new() -> Self {
        Self {
            state: Mutex::new(MaskState {
                mask: None,
                frozen: false,
            }),
        }
    }

    /// Store `mask` unless detection has already frozen the cell
    pub(crate) fn set(&self, mask: HwCapMask) -> Result<()> {
        let mut state = self.state.lock();
        if state.frozen {
            return Err(config_error(
                "hwcaps",
                "host capabilities already detected; mask must be set before first use",
            ));
        }
        state.mask = Some(mask);
        Ok(())
    }

    /// Freeze the cell and return the mask detection must apply
    pub(crate) fn freeze(&self) -> HwCapMask {
        let mut state = self.state.lock();
        state.frozen = true;
        match state.mask {
            Some(mask) => mask,
            None => env_mask().unwrap_or_default(),
        }
    }
}

/// Set the hwcap mask.
///
/// Contract: pre-init only. Once host capability detection has started this
/// returns a configuration error and the published bindings are unchanged.
#[cold]
pub fn set_hwcap_mask(mask: HwCapMask) -> Result<()> {
    MASK.set(mask)
}

#[cfg(feature = "std")]
fn env_mask() -> Option<HwCapMask> {
    let value = std::env::var(HWCAPS_ENV).ok()?;
    Some(HwCapMask::parse(&value))
}

#[cfg(not(feature = "std"))]
fn env_mask() -> Option<HwCapMask> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_disables_named_caps() {
        let mask = HwCapMask::parse("-AVX2,-sse2");
        assert_eq!(mask.disabled(), HwCaps::AVX2 | HwCaps::SSE2);
    }

    #[test]
    fn test_parse_tolerates_whitespace_and_empty_entries() {
        let mask = HwCapMask::parse(" -avx512bw , ,-Neon,");
        assert_eq!(mask.disabled(), HwCaps::AVX512BW | HwCaps::NEON);
    }

    #[test]
    fn test_parse_ignores_unknown_and_enabling_entries() {
        let mask = HwCapMask::parse("-AVX9,+AVX2,SSE2");
        assert_eq!(mask, HwCapMask::NONE);
    }

    #[test]
    fn test_apply_never_adds() {
        let mask = HwCapMask::disabling(HwCaps::AVX2);
        assert_eq!(mask.apply(HwCaps::SSE2 | HwCaps::AVX2), HwCaps::SSE2);
        assert_eq!(mask.apply(HwCaps::empty()), HwCaps::empty());
    }

    #[test]
    fn test_set_after_detection_is_rejected() {
        let _ = crate::detect::host_caps();
        let err = set_hwcap_mask(HwCapMask::disabling(HwCaps::all())).unwrap_err();
        assert_eq!(err.class(), sysdeps_api::ErrorClass::Configuration);
    }

    #[test]
    fn test_cell_applies_mask_set_before_freeze() {
        let cell = MaskCell::new();
        cell.set(HwCapMask::disabling(HwCaps::AVX2)).unwrap();
        cell.set(HwCapMask::disabling(HwCaps::SSE2)).unwrap();
        assert_eq!(cell.freeze(), HwCapMask::disabling(HwCaps::SSE2));
        assert!(cell.set(HwCapMask::NONE).is_err());
        assert_eq!(cell.freeze(), HwCapMask::disabling(HwCaps::SSE2));
    }
}
