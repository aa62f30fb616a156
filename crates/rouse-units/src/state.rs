//! Unit lifecycle states.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a unit within the dispatcher.
///
/// A unit moves `Pending → Activating → Active` at most once. `Failed` is
/// terminal for the process lifetime: the dispatcher never retries a failed
/// activation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitState {
    /// Registered but not yet activated.
    #[default]
    Pending,
    /// Setup is running, or a deferred setup has not completed yet.
    Activating,
    /// Setup completed successfully; repeated triggers are no-ops.
    Active,
    /// Setup or a dependency failed; the unit stays inert.
    Failed,
}

impl UnitState {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Activating => "activating",
            Self::Active => "active",
            Self::Failed => "failed",
        }
    }

    /// Returns `true` once the unit can never change state again.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Active | Self::Failed)
    }
}

impl std::fmt::Display for UnitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
