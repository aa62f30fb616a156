//! Activation registry and dispatcher for lazily activated units.
//!
//! This crate implements the runtime half of declarative lazy activation.
//! The host registers [`rouse_units::ActivationSpec`] declarations together
//! with opaque setup procedures, finalises the registry into a
//! [`Dispatcher`], and then feeds observed [`rouse_units::TriggerEvent`]
//! values into it from its event loop. The dispatcher decides which units
//! the event demands, activates them with dependencies first, and tells the
//! host when to replay a swallowed key sequence.
//!
//! # Architecture
//!
//! - [`Registry`] collects specs and setups and rejects duplicates. It is
//!   consumed by [`Registry::finalise`], which validates the dependency
//!   graph; dispatch operations only exist on the [`Dispatcher`] value that
//!   `finalise` returns, so an unvalidated registry cannot dispatch.
//! - [`Dispatcher`] owns all runtime state. It is a plain `&mut self` value
//!   driven from a single-threaded host loop; multi-threaded hosts must
//!   serialise access externally.
//! - [`Setup`] is the opaque boundary to unit initialisation. A setup may
//!   finish synchronously or report [`SetupOutcome::Deferred`] and complete
//!   later through [`Dispatcher::complete_activation`].
//! - [`ActivationReporter`] surfaces lifecycle transitions to telemetry
//!   sinks; [`StructuredReporter`] records them with `tracing`.
//!
//! # Example
//!
//! ```
//! use rouse_registry::{Registry, SetupOutcome, StructuredReporter};
//! use rouse_units::{ActivationSpec, Trigger, TriggerEvent};
//!
//! let mut registry = Registry::new();
//! registry.register(
//!     ActivationSpec::new("finder").with_trigger(Trigger::command("Finder")),
//!     || Ok(SetupOutcome::Ready),
//! )?;
//!
//! let mut dispatcher = registry.finalise(StructuredReporter::new())?;
//! let outcome = dispatcher.dispatch(&TriggerEvent::command("Finder"));
//! assert_eq!(outcome.activated, ["finder"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod dispatch;
pub mod error;
pub mod registry;
pub mod reporter;
pub mod setup;

pub use dispatch::{
    ActivationProgress, CompletionOutcome, DispatchOutcome, Dispatcher, KeyReplay, ReplayAdvice,
};
pub use error::{ActivationError, RegistryError};
pub use registry::Registry;
pub use reporter::{ActivationReporter, StructuredReporter};
pub use setup::{Setup, SetupError, SetupOutcome};

#[cfg(test)]
mod tests;
