//! Registration of activation specs and their setup procedures.
//!
//! The [`Registry`] collects [`ActivationSpec`] declarations paired with
//! [`Setup`] procedures and rejects structural mistakes immediately.
//! Cross-unit mistakes, unknown dependencies and dependency cycles, are
//! caught by [`Registry::finalise`], which consumes the registry and returns
//! the [`crate::Dispatcher`] that serves triggers. Dispatch entry points
//! only exist on the finalised value, so an unvalidated unit set cannot be
//! asked to activate anything.

use std::collections::HashMap;

use rouse_graph::DependencyGraph;
use rouse_units::{ActivationSpec, UnitName};

use crate::dispatch::Dispatcher;
use crate::error::RegistryError;
use crate::reporter::ActivationReporter;
use crate::setup::Setup;

/// A spec paired with the setup procedure that activates it.
pub(crate) struct RegisteredUnit {
    pub(crate) spec: ActivationSpec,
    pub(crate) setup: Box<dyn Setup>,
}

/// Collection of activation specs awaiting finalisation.
///
/// # Example
///
/// ```
/// use rouse_registry::{Registry, SetupOutcome};
/// use rouse_units::ActivationSpec;
///
/// let mut registry = Registry::new();
/// registry.register(
///     ActivationSpec::new("statusline"),
///     || Ok(SetupOutcome::Ready),
/// )?;
/// assert!(registry.contains("statusline"));
/// # Ok::<(), rouse_registry::RegistryError>(())
/// ```
#[derive(Default)]
pub struct Registry {
    units: Vec<RegisteredUnit>,
    index: HashMap<UnitName, usize>,
    eager_floor: i32,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum priority a trigger-less unit needs to activate
    /// during the startup sweep.
    #[must_use]
    pub const fn with_eager_floor(mut self, eager_floor: i32) -> Self {
        self.eager_floor = eager_floor;
        self
    }

    /// Registers a spec together with its setup procedure.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidSpec`] if the spec fails validation,
    /// or [`RegistryError::DuplicateUnit`] if a unit with the same name is
    /// already registered.
    pub fn register(
        &mut self,
        spec: ActivationSpec,
        setup: impl Setup + 'static,
    ) -> Result<(), RegistryError> {
        spec.validate()?;
        let name = spec.name().clone();
        if self.index.contains_key(&name) {
            return Err(RegistryError::DuplicateUnit { name });
        }
        self.index.insert(name, self.units.len());
        self.units.push(RegisteredUnit {
            spec,
            setup: Box::new(setup),
        });
        Ok(())
    }

    /// Looks up a registered spec by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ActivationSpec> {
        self.index
            .get(name)
            .and_then(|slot| self.units.get(*slot))
            .map(|unit| &unit.spec)
    }

    /// Returns whether a unit with the given name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns the number of registered units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns `true` when no units are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Returns the configured startup priority floor.
    #[must_use]
    pub const fn eager_floor(&self) -> i32 {
        self.eager_floor
    }

    /// Validates cross-unit declarations and produces the dispatcher.
    ///
    /// Every dependency must name a registered unit and the dependency
    /// edges must be acyclic. On success the registry is consumed; all
    /// further interaction happens through the returned [`Dispatcher`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownDependency`] for a dependency on an
    /// unregistered unit, or [`RegistryError::DependencyCycle`] when the
    /// dependency edges loop.
    pub fn finalise<R>(self, reporter: R) -> Result<Dispatcher<R>, RegistryError>
    where
        R: ActivationReporter,
    {
        let mut graph = DependencyGraph::new();
        for unit in &self.units {
            graph.add_unit(unit.spec.name().clone(), unit.spec.priority());
        }
        for unit in &self.units {
            for dependency in unit.spec.dependencies() {
                graph.add_dependency(unit.spec.name().clone(), dependency.clone());
            }
        }
        graph.validate()?;
        Ok(Dispatcher::new(self.units, graph, self.eager_floor, reporter))
    }
}
