//! Error types for dependency graph operations.

use thiserror::Error;

use rouse_units::UnitName;

/// Errors returned by dependency graph validation and ordering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A unit requires a name that was never registered.
    #[error("unit '{unit}' depends on unknown unit '{dependency}'")]
    UnknownDependency {
        /// Unit declaring the dangling requirement.
        unit: UnitName,
        /// The name that does not exist in the graph.
        dependency: UnitName,
    },

    /// The requirement edges form a cycle.
    #[error("dependency cycle detected: {}", render_cycle(.members))]
    CycleDetected {
        /// Units participating in the cycle, in traversal order. The first
        /// member is repeated at the end to close the loop.
        members: Vec<UnitName>,
    },
}

impl GraphError {
    /// Creates a new `UnknownDependency` error.
    #[must_use]
    pub fn unknown_dependency(unit: impl Into<UnitName>, dependency: impl Into<UnitName>) -> Self {
        Self::UnknownDependency {
            unit: unit.into(),
            dependency: dependency.into(),
        }
    }

    /// Creates a new `CycleDetected` error.
    #[must_use]
    pub const fn cycle_detected(members: Vec<UnitName>) -> Self {
        Self::CycleDetected { members }
    }
}

fn render_cycle(members: &[UnitName]) -> String {
    members
        .iter()
        .map(UnitName::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}
