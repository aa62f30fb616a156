//! Error types for registration and activation.
//!
//! Failures split into two families. [`RegistryError`] covers configuration
//! mistakes caught while the registry is being built or finalised; these are
//! fatal to the whole registry and abort start-up. [`ActivationError`]
//! covers runtime failures of individual units; the dispatcher records them
//! against the affected units and keeps serving every other unit.

use rouse_graph::GraphError;
use rouse_units::{SpecError, UnitName, UnitState};
use thiserror::Error;

use crate::setup::SetupError;

/// Fatal error raised while building or finalising a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A spec failed structural validation at registration.
    #[error("invalid activation spec: {source}")]
    InvalidSpec {
        /// Underlying validation failure.
        #[from]
        source: SpecError,
    },
    /// Two registrations used the same unit name.
    #[error("unit {name} is already registered")]
    DuplicateUnit {
        /// Name that was registered twice.
        name: UnitName,
    },
    /// A spec names a dependency that no registration provides.
    #[error("unit {unit} depends on unknown unit {dependency}")]
    UnknownDependency {
        /// Unit whose spec declares the dependency.
        unit: UnitName,
        /// Name that matches no registered unit.
        dependency: UnitName,
    },
    /// The declared dependencies form a cycle.
    #[error("dependency cycle detected: {}", render_cycle(.members))]
    DependencyCycle {
        /// Units on the cycle, in walk order, with the first repeated last.
        members: Vec<UnitName>,
    },
}

impl RegistryError {
    /// Creates a [`RegistryError::DuplicateUnit`] for `name`.
    #[must_use]
    pub fn duplicate_unit(name: impl Into<UnitName>) -> Self {
        Self::DuplicateUnit { name: name.into() }
    }

    /// Creates a [`RegistryError::UnknownDependency`] for `unit` and
    /// `dependency`.
    #[must_use]
    pub fn unknown_dependency(unit: impl Into<UnitName>, dependency: impl Into<UnitName>) -> Self {
        Self::UnknownDependency {
            unit: unit.into(),
            dependency: dependency.into(),
        }
    }
}

impl From<GraphError> for RegistryError {
    fn from(error: GraphError) -> Self {
        match error {
            GraphError::UnknownDependency { unit, dependency } => {
                Self::UnknownDependency { unit, dependency }
            }
            GraphError::CycleDetected { members } => Self::DependencyCycle { members },
        }
    }
}

/// Recoverable runtime failure scoped to a single unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActivationError {
    /// A dependency of the unit failed, so the unit cannot activate.
    #[error("unit {unit} blocked by failed dependency {dependency}")]
    DependencyFailed {
        /// Unit that was waiting on the dependency.
        unit: UnitName,
        /// Dependency that failed to activate.
        dependency: UnitName,
    },
    /// The unit's own setup procedure reported an error.
    #[error("unit {unit} failed during setup: {source}")]
    Setup {
        /// Unit whose setup failed.
        unit: UnitName,
        /// Failure reported by the setup procedure.
        #[source]
        source: SetupError,
    },
    /// An operation referenced a unit name that was never registered.
    #[error("unknown unit {name}")]
    UnknownUnit {
        /// Name that matches no registered unit.
        name: UnitName,
    },
    /// A completion arrived for a unit that has no activation in flight.
    #[error("unit {unit} is {state}, not awaiting completion")]
    UnexpectedCompletion {
        /// Unit the completion named.
        unit: UnitName,
        /// State the unit was in when the completion arrived.
        state: UnitState,
    },
}

impl ActivationError {
    /// Creates an [`ActivationError::DependencyFailed`] for `unit` and
    /// `dependency`.
    #[must_use]
    pub fn dependency_failed(unit: impl Into<UnitName>, dependency: impl Into<UnitName>) -> Self {
        Self::DependencyFailed {
            unit: unit.into(),
            dependency: dependency.into(),
        }
    }

    /// Creates an [`ActivationError::Setup`] wrapping `source`.
    #[must_use]
    pub fn setup(unit: impl Into<UnitName>, source: SetupError) -> Self {
        Self::Setup {
            unit: unit.into(),
            source,
        }
    }

    /// Creates an [`ActivationError::UnknownUnit`] for `name`.
    #[must_use]
    pub fn unknown_unit(name: impl Into<UnitName>) -> Self {
        Self::UnknownUnit { name: name.into() }
    }

    /// Creates an [`ActivationError::UnexpectedCompletion`] for `unit`.
    #[must_use]
    pub fn unexpected_completion(unit: impl Into<UnitName>, state: UnitState) -> Self {
        Self::UnexpectedCompletion {
            unit: unit.into(),
            state,
        }
    }

    /// Returns the unit the failure is recorded against.
    #[must_use]
    pub const fn unit(&self) -> &UnitName {
        match self {
            Self::DependencyFailed { unit, .. }
            | Self::Setup { unit, .. }
            | Self::UnexpectedCompletion { unit, .. } => unit,
            Self::UnknownUnit { name } => name,
        }
    }
}

fn render_cycle(members: &[UnitName]) -> String {
    members
        .iter()
        .map(UnitName::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests;
