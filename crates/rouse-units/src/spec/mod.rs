//! Activation specifications describing when and how a unit comes alive.
//!
//! An [`ActivationSpec`] declares everything the dispatcher needs to know
//! about a deferred unit: its name, the triggers that demand it, its startup
//! priority, and the units that must be active before its setup procedure
//! runs. Specs are immutable after registration; runtime state lives in the
//! dispatcher, not here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::name::UnitName;
use crate::trigger::{Trigger, TriggerKind};

/// Priority assigned to units that do not declare one.
pub const DEFAULT_PRIORITY: i32 = 50;

/// Conventional priority for colour-theme units, which must be active before
/// anything that reads the palette.
pub const THEME_PRIORITY: i32 = 1000;

const fn default_priority() -> i32 {
    DEFAULT_PRIORITY
}

/// Error raised when an activation spec is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    /// The unit name is empty or whitespace.
    #[error("unit name must not be empty")]
    EmptyName,
    /// A trigger carries an empty payload.
    #[error("unit '{name}' declares a {kind} trigger with an empty name")]
    EmptyTriggerPayload {
        /// Unit the offending trigger belongs to.
        name: UnitName,
        /// Shape of the offending trigger.
        kind: TriggerKind,
    },
    /// The unit lists itself as a dependency.
    #[error("unit '{name}' must not depend on itself")]
    SelfDependency {
        /// The self-referencing unit.
        name: UnitName,
    },
    /// The same dependency appears more than once.
    #[error("unit '{name}' lists dependency '{dependency}' more than once")]
    DuplicateDependency {
        /// Unit with the duplicated entry.
        name: UnitName,
        /// The dependency listed twice.
        dependency: UnitName,
    },
}

/// Declarative description of a unit's activation conditions.
///
/// Specs are constructed via [`ActivationSpec::new`] and the builder
/// methods, then validated on registration. A spec with no triggers is
/// eager: it only activates during startup or as a dependency of another
/// unit.
///
/// # Example
///
/// ```
/// use rouse_units::{ActivationSpec, Trigger, DEFAULT_PRIORITY};
///
/// let spec = ActivationSpec::new("treesitter")
///     .with_trigger(Trigger::event("BufRead"))
///     .with_dependencies(vec!["plenary".into()]);
///
/// assert_eq!(spec.name(), "treesitter");
/// assert_eq!(spec.priority(), DEFAULT_PRIORITY);
/// assert!(spec.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationSpec {
    name: UnitName,
    #[serde(default = "default_priority")]
    priority: i32,
    #[serde(default)]
    triggers: Vec<Trigger>,
    #[serde(default)]
    dependencies: Vec<UnitName>,
}

impl ActivationSpec {
    /// Creates a spec with default priority, no triggers, and no
    /// dependencies.
    #[must_use]
    pub fn new(name: impl Into<UnitName>) -> Self {
        Self {
            name: name.into(),
            priority: DEFAULT_PRIORITY,
            triggers: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// Overrides the startup priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Appends a trigger.
    #[must_use]
    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.triggers.push(trigger);
        self
    }

    /// Replaces the trigger set.
    #[must_use]
    pub fn with_triggers(mut self, triggers: Vec<Trigger>) -> Self {
        self.triggers = triggers;
        self
    }

    /// Replaces the dependency list.
    #[must_use]
    pub fn with_dependencies(mut self, dependencies: Vec<UnitName>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Validates the spec, returning an error if it is malformed.
    ///
    /// # Errors
    ///
    /// Returns a [`SpecError`] if the name is empty, a trigger payload is
    /// empty, the unit depends on itself, or a dependency is listed twice.
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.name.as_str().trim().is_empty() {
            return Err(SpecError::EmptyName);
        }
        for trigger in &self.triggers {
            let payload = match trigger {
                Trigger::Event { name } | Trigger::Command { name } => name,
                Trigger::FileType { language } => language,
                Trigger::Keys { .. } => continue,
            };
            if payload.trim().is_empty() {
                return Err(SpecError::EmptyTriggerPayload {
                    name: self.name.clone(),
                    kind: trigger.kind(),
                });
            }
        }
        let mut seen = std::collections::HashSet::new();
        for dependency in &self.dependencies {
            if dependency == &self.name {
                return Err(SpecError::SelfDependency {
                    name: self.name.clone(),
                });
            }
            if !seen.insert(dependency.as_str()) {
                return Err(SpecError::DuplicateDependency {
                    name: self.name.clone(),
                    dependency: dependency.clone(),
                });
            }
        }
        Ok(())
    }

    /// Returns the unit name.
    #[must_use]
    pub const fn name(&self) -> &UnitName {
        &self.name
    }

    /// Returns the startup priority.
    #[must_use]
    pub const fn priority(&self) -> i32 {
        self.priority
    }

    /// Returns the declared triggers.
    #[must_use]
    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    /// Returns the declared dependencies.
    #[must_use]
    pub fn dependencies(&self) -> &[UnitName] {
        &self.dependencies
    }

    /// Returns `true` when the spec declares no triggers and therefore only
    /// activates during startup or as a dependency.
    #[must_use]
    pub fn is_eager(&self) -> bool {
        self.triggers.is_empty()
    }
}
