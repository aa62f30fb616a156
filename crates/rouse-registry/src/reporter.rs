//! Structured reporting for unit lifecycle events.

use std::sync::Arc;

use rouse_units::UnitName;

use crate::error::ActivationError;

const LIFECYCLE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::lifecycle");

/// Observer trait used to surface unit lifecycle events to telemetry sinks.
pub trait ActivationReporter: Send + Sync {
    /// Invoked when a unit's setup procedure is about to run.
    fn unit_activating(&self, unit: &UnitName);

    /// Invoked when a unit becomes active.
    fn unit_active(&self, unit: &UnitName);

    /// Invoked when a unit's setup defers completion to a later
    /// [`crate::Dispatcher::complete_activation`] call.
    fn unit_deferred(&self, unit: &UnitName);

    /// Invoked when a unit parks behind a dependency that is still
    /// activating.
    fn unit_blocked(&self, unit: &UnitName, blocking: &UnitName);

    /// Invoked exactly once when a unit fails, either through its own setup
    /// or through a failed dependency.
    fn unit_failed(&self, error: &ActivationError);

    /// Invoked after the startup sweep has visited every eager unit.
    fn startup_finished(&self, activated: usize, failed: usize);
}

impl<T> ActivationReporter for Arc<T>
where
    T: ActivationReporter,
{
    fn unit_activating(&self, unit: &UnitName) {
        (**self).unit_activating(unit);
    }

    fn unit_active(&self, unit: &UnitName) {
        (**self).unit_active(unit);
    }

    fn unit_deferred(&self, unit: &UnitName) {
        (**self).unit_deferred(unit);
    }

    fn unit_blocked(&self, unit: &UnitName, blocking: &UnitName) {
        (**self).unit_blocked(unit, blocking);
    }

    fn unit_failed(&self, error: &ActivationError) {
        (**self).unit_failed(error);
    }

    fn startup_finished(&self, activated: usize, failed: usize) {
        (**self).startup_finished(activated, failed);
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredReporter;

impl StructuredReporter {
    /// Builds a new reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ActivationReporter for StructuredReporter {
    fn unit_activating(&self, unit: &UnitName) {
        tracing::info!(
            target: LIFECYCLE_TARGET,
            event = "unit_activating",
            unit = %unit,
            "running unit setup"
        );
    }

    fn unit_active(&self, unit: &UnitName) {
        tracing::info!(
            target: LIFECYCLE_TARGET,
            event = "unit_active",
            unit = %unit,
            "unit active"
        );
    }

    fn unit_deferred(&self, unit: &UnitName) {
        tracing::info!(
            target: LIFECYCLE_TARGET,
            event = "unit_deferred",
            unit = %unit,
            "unit setup deferred"
        );
    }

    fn unit_blocked(&self, unit: &UnitName, blocking: &UnitName) {
        tracing::debug!(
            target: LIFECYCLE_TARGET,
            event = "unit_blocked",
            unit = %unit,
            blocking = %blocking,
            "unit parked behind activating dependency"
        );
    }

    fn unit_failed(&self, error: &ActivationError) {
        tracing::error!(
            target: LIFECYCLE_TARGET,
            event = "unit_failed",
            unit = %error.unit(),
            error = %error,
            "unit failed to activate"
        );
    }

    fn startup_finished(&self, activated: usize, failed: usize) {
        tracing::info!(
            target: LIFECYCLE_TARGET,
            event = "startup_finished",
            activated,
            failed,
            "startup activation sweep finished"
        );
    }
}
