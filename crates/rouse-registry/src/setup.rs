//! Setup procedures executed when a unit activates.
//!
//! A setup is the opaque initialisation routine supplied alongside an
//! [`rouse_units::ActivationSpec`] at registration. The dispatcher runs it
//! at most once, after every dependency of the unit has become active. A
//! setup either finishes synchronously with [`SetupOutcome::Ready`], hands
//! control back with [`SetupOutcome::Deferred`] to finish through
//! [`crate::Dispatcher::complete_activation`], or fails with [`SetupError`].

use thiserror::Error;

/// Error raised by a setup procedure.
///
/// The message is host-defined free text; the dispatcher wraps it into
/// [`crate::ActivationError::Setup`] together with the unit name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SetupError {
    message: String,
}

impl SetupError {
    /// Creates a setup error from a host-provided message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the host-provided failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result of running a setup procedure to its first yield point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupOutcome {
    /// The unit initialised completely; it becomes active immediately.
    Ready,
    /// Initialisation continues in the background. The unit stays in the
    /// activating state until the host calls
    /// [`crate::Dispatcher::complete_activation`] for it.
    Deferred,
}

/// Opaque initialisation routine for a single unit.
///
/// Implemented for free by any `FnMut` closure with the matching signature,
/// which is how hosts normally supply setups:
///
/// ```
/// use rouse_registry::{Setup, SetupOutcome};
///
/// let mut calls = 0;
/// let mut setup = || {
///     calls += 1;
///     Ok(SetupOutcome::Ready)
/// };
/// assert_eq!(setup.run(), Ok(SetupOutcome::Ready));
/// ```
pub trait Setup {
    /// Runs the setup to completion or to its first deferral point.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] when initialisation fails; the dispatcher
    /// marks the unit failed and never calls the setup again.
    fn run(&mut self) -> Result<SetupOutcome, SetupError>;
}

impl<F> Setup for F
where
    F: FnMut() -> Result<SetupOutcome, SetupError>,
{
    fn run(&mut self) -> Result<SetupOutcome, SetupError> {
        self()
    }
}
