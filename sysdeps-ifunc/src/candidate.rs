//! Candidate tables and preference-ordered selection
//!
//! An operation registers its implementations as an ordered table of
//! [`Candidate`]s, most specialized first, ending with an always-available
//! baseline. [`select`] picks the first candidate whose requirement is
//! satisfied by the detected capabilities.
//!
//! A candidate slot may be empty (`func: None`) when its implementation is
//! not compiled for the current target. The table layout stays identical
//! across targets; an empty slot is simply never selectable.
//!
//! ```ignore
//! const MEMCHR_CANDIDATES: &[Candidate<MemchrFn>] = candidates![
//!     "x86_64/avx2" => HwCaps::AVX2 => MEMCHR_AVX2,
//!     "generic" => HwCaps::empty() => Some(generic::memchr as MemchrFn),
//! ];
//! ```

use sysdeps_api::error::config_error;
use sysdeps_api::{HwCaps, Result};

/// A candidate implementation with capability requirements.
#[derive(Clone, Copy, Debug)]
pub struct Candidate<F> {
    /// Human-readable name for diagnostics (e.g., "x86_64/avx2")
    pub name: &'static str,
    /// Capabilities that must all be present for the candidate to be selectable
    pub requires: HwCaps,
    /// The implementation, or `None` when it is not built for this target
    pub func: Option<F>,
}

impl<F> Candidate<F> {
    /// Create a candidate that is present on this target
    #[inline]
    #[must_use]
    pub const fn new(name: &'static str, requires: HwCaps, func: F) -> Self {
        Self {
            name,
            requires,
            func: Some(func),
        }
    }

    /// Create a candidate whose presence depends on the target
    #[inline]
    #[must_use]
    pub const fn optional(name: &'static str, requires: HwCaps, func: Option<F>) -> Self {
        Self {
            name,
            requires,
            func,
        }
    }

    /// Create a placeholder for an implementation not built on this target
    #[inline]
    #[must_use]
    pub const fn absent(name: &'static str, requires: HwCaps) -> Self {
        Self {
            name,
            requires,
            func: None,
        }
    }

    /// Create the always-available baseline candidate
    #[inline]
    #[must_use]
    pub const fn baseline(name: &'static str, func: F) -> Self {
        Self::new(name, HwCaps::empty(), func)
    }

    /// Returns true when the candidate is present and `caps` satisfy it
    #[inline]
    pub const fn is_selectable(&self, caps: HwCaps) -> bool {
        self.func.is_some() && caps.contains(self.requires)
    }

    /// Returns true for a present candidate with no requirements
    #[inline]
    pub const fn is_baseline(&self) -> bool {
        self.func.is_some() && self.requires.is_empty()
    }
}

/// The result of selection: the bound candidate's name and implementation.
#[derive(Clone, Copy, Debug)]
pub struct Selected<F> {
    /// Name of the selected candidate
    pub name: &'static str,
    /// The selected implementation
    pub func: F,
}

impl<F> Selected<F> {
    /// Create a new selected result
    #[inline]
    #[must_use]
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

/// The ordered candidate list for one named operation.
#[derive(Clone, Copy, Debug)]
pub struct CandidateTable<F: 'static> {
    /// Public name of the operation
    pub operation: &'static str,
    /// Candidates, most preferred first; the last must be a baseline
    pub candidates: &'static [Candidate<F>],
}

impl<F: Copy + 'static> CandidateTable<F> {
    /// Create a new table
    #[must_use]
    pub const fn new(operation: &'static str, candidates: &'static [Candidate<F>]) -> Self {
        Self {
            operation,
            candidates,
        }
    }

    /// Returns true when the table ends with a present, requirement-free baseline
    pub const fn is_well_formed(&self) -> bool {
        match self.candidates.last() {
            Some(last) => last.is_baseline(),
            None => false,
        }
    }

    /// Returns the baseline candidate, if the table is well formed
    pub const fn baseline(&self) -> Option<Selected<F>> {
        match self.candidates.last() {
            Some(Candidate {
                name,
                requires,
                func: Some(func),
            }) if requires.is_empty() => Some(Selected::new(name, *func)),
            _ => None,
        }
    }

    /// Check the table's structure, reporting what is wrong with it
    pub fn validate(&self) -> Result<()> {
        let Some(last) = self.candidates.last() else {
            return Err(config_error(self.operation, "candidate table is empty"));
        };
        if last.func.is_none() {
            return Err(config_error(
                self.operation,
                "baseline candidate is not built for this target",
            ));
        }
        if !last.requires.is_empty() {
            return Err(config_error(
                self.operation,
                "last candidate has requirements; a baseline must be unconditional",
            ));
        }
        Ok(())
    }

    /// Number of candidates, including empty slots
    pub const fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns true when the table has no candidates at all
    pub const fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Candidates that are present on this target, in preference order
    pub fn present(&self) -> impl Iterator<Item = Selected<F>> + '_ {
        self.candidates
            .iter()
            .filter_map(|candidate| candidate.func.map(|func| Selected::new(candidate.name, func)))
    }
}

/// Select the most preferred candidate satisfied by `caps`.
///
/// Preference order is the only tie-break. Empty slots are skipped exactly
/// like candidates whose requirements do not hold.
pub fn select<F: Copy>(caps: HwCaps, table: &CandidateTable<F>) -> Result<Selected<F>> {
    for candidate in table.candidates {
        match candidate.func {
            Some(func) if caps.contains(candidate.requires) => {
                return Ok(Selected::new(candidate.name, func));
            }
            _ => {}
        }
    }

    Err(config_error(
        table.operation,
        "no candidate is available on this platform",
    ))
}

/// Build a candidate slice from `name => requires => Option<func>` entries.
#[macro_export]
macro_rules! candidates {
    ($($name:literal => $requires:expr => $func:expr),+ $(,)?) => {
        &[$($crate::candidate::Candidate::optional($name, $requires, $func)),+]
    };
}
