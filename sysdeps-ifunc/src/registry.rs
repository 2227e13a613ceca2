//! Operation registry
//!
//! Maps public operation names to their process-wide bindings so callers can
//! resolve by name. The registry lock is only taken to register and to look
//! a name up; calls through a binding never touch it.

use alloc::vec::Vec;

use hashbrown::HashMap;
use lazy_static::lazy_static;
use spin::RwLock;
use sysdeps_api::error::config_error;
use sysdeps_api::{sys_debug, HardwareProbe, Error, Result};

use crate::binding::Binding;

/// A binding viewed without its function-pointer type
pub trait OperationBinding: Sync {
    /// Public name of the operation
    fn operation(&self) -> &'static str;

    /// Name of the bound candidate, resolving on first use
    fn bound_name(&self) -> &'static str;

    /// Returns true once a candidate has been published
    fn is_resolved(&self) -> bool;
}

impl<F, P> OperationBinding for Binding<F, P>
where
    F: Copy + Send + Sync + 'static,
    P: HardwareProbe + Sync,
{
    fn operation(&self) -> &'static str {
        Binding::operation(self)
    }

    fn bound_name(&self) -> &'static str {
        self.selected_name()
    }

    fn is_resolved(&self) -> bool {
        Binding::is_resolved(self)
    }
}

/// Name-to-binding table
pub struct OperationRegistry {
    operations: HashMap<&'static str, &'static dyn OperationBinding>,
}

impl OperationRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            operations: HashMap::new(),
        }
    }

    /// Register `binding` under its operation name.
    ///
    /// Registering the same binding again is a no-op. Registering a different
    /// binding under a name already taken is a configuration error, since a
    /// name must resolve to exactly one binding.
    pub fn register(&mut self, binding: &'static dyn OperationBinding) -> Result<()> {
        let name = binding.operation();
        match self.operations.get(name) {
            Some(existing) if core::ptr::addr_eq(*existing, binding) => Ok(()),
            Some(_) => Err(config_error(name, "operation registered twice with different bindings")),
            None => {
                self.operations.insert(name, binding);
                sys_debug!("registered operation {}", name);
                Ok(())
            }
        }
    }

    /// Look up the binding registered under `name`
    pub fn get(&self, name: &str) -> Option<&'static dyn OperationBinding> {
        self.operations.get(name).copied()
    }

    /// Registered operation names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.operations.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered operations
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns true when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

lazy_static! {
    /// Global operation registry
    static ref GLOBAL_REGISTRY: RwLock<OperationRegistry> = RwLock::new(OperationRegistry::new());
}

/// Register a binding with the global registry
pub fn register(binding: &'static dyn OperationBinding) -> Result<()> {
    GLOBAL_REGISTRY.write().register(binding)
}

/// Resolve `operation` and return the name of its bound candidate.
///
/// The first resolution runs capability detection; later ones return the
/// published binding without re-evaluating anything.
///
/// Registered bindings have different function types, so only the name is
/// available by operation name. The typed implementation comes from the
/// operation's own binding, e.g. `string::memchr_binding().func()`, which
/// is the same candidate this returns the name of.
pub fn resolve(operation: &'static str) -> Result<&'static str> {
    let binding = GLOBAL_REGISTRY
        .read()
        .get(operation)
        .ok_or(Error::UnknownOperation(operation))?;
    Ok(binding.bound_name())
}

/// Returns true when `operation` is registered and already bound
pub fn is_resolved(operation: &str) -> bool {
    GLOBAL_REGISTRY
        .read()
        .get(operation)
        .is_some_and(|binding| binding.is_resolved())
}

/// Names of all registered operations, sorted
pub fn registered_operations() -> Vec<&'static str> {
    GLOBAL_REGISTRY.read().names()
}
