//! Process-wide operation bindings
//!
//! A [`Binding`] pairs a candidate table with a hardware probe and a
//! single-assignment cell. The first call to [`Binding::get`] runs the probe,
//! selects a candidate and publishes it; every later call is a plain load of
//! the published value. Concurrent first callers block on the cell until the
//! winner has published, so all of them observe the same candidate.

use spin::Once;
use sysdeps_api::error::config_error;
use sysdeps_api::{sys_debug, sys_trace};
use sysdeps_api::{HardwareProbe, HwCaps, Result};

use crate::candidate::{select, CandidateTable, Selected};
use crate::detect::HostProbe;

/// The resolved binding of one named operation.
pub struct Binding<F: 'static, P = HostProbe> {
    table: CandidateTable<F>,
    baseline: Selected<F>,
    probe: P,
    cell: Once<Selected<F>>,
}

impl<F: Copy + 'static> Binding<F, HostProbe> {
    /// Create a binding that resolves against the host's capabilities.
    ///
    /// # Panics
    ///
    /// Panics during constant evaluation when `table` does not end with a
    /// present, requirement-free baseline. Use [`Binding::try_with_probe`]
    /// for tables assembled at run time.
    #[must_use]
    pub const fn new(table: CandidateTable<F>) -> Self {
        Self::with_probe(table, HostProbe)
    }
}

impl<F: Copy + 'static, P: HardwareProbe> Binding<F, P> {
    /// Create a binding with a custom hardware probe.
    ///
    /// # Panics
    ///
    /// Same as [`Binding::new`].
    #[must_use]
    pub const fn with_probe(table: CandidateTable<F>, probe: P) -> Self {
        let baseline = match table.baseline() {
            Some(baseline) => baseline,
            None => panic!("candidate table must end with an unconditional baseline"),
        };
        Self {
            table,
            baseline,
            probe,
            cell: Once::new(),
        }
    }

    /// Create a binding, reporting a malformed table as a configuration error
    pub fn try_with_probe(table: CandidateTable<F>, probe: P) -> Result<Self> {
        table.validate()?;
        let baseline = table
            .baseline()
            .ok_or(config_error(table.operation, "missing baseline candidate"))?;
        Ok(Self {
            table,
            baseline,
            probe,
            cell: Once::new(),
        })
    }

    /// Returns the bound candidate, resolving it on first use
    #[inline]
    pub fn get(&self) -> Selected<F> {
        *self.cell.call_once(|| self.bind())
    }

    /// Returns the bound implementation, resolving it on first use
    #[inline]
    pub fn func(&self) -> F {
        self.get().func
    }

    /// Returns the bound candidate's name, resolving it on first use
    pub fn selected_name(&self) -> &'static str {
        self.get().name
    }

    /// Returns true once a candidate has been published
    pub fn is_resolved(&self) -> bool {
        self.cell.is_completed()
    }

    /// Returns the published candidate without resolving
    pub fn peek(&self) -> Option<Selected<F>> {
        self.cell.get().copied()
    }

    /// Name of the operation this binding implements
    pub const fn operation(&self) -> &'static str {
        self.table.operation
    }

    /// The candidate table this binding selects from
    pub const fn table(&self) -> &CandidateTable<F> {
        &self.table
    }

    #[cold]
    fn bind(&self) -> Selected<F> {
        sys_trace!("resolving {}", self.table.operation);
        let caps: HwCaps = self.probe.detect();
        // The table ends with a baseline, so selection only misses if the
        // probe is lying about the empty set.
        let selected = select(caps, &self.table).unwrap_or(self.baseline);
        sys_debug!(
            "{} bound to {} (caps {:?})",
            self.table.operation,
            selected.name,
            caps
        );
        selected
    }
}
