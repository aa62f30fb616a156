//! Activation plans derived from a finalised dispatcher.
//!
//! A plan is a pure description of what a manifest would activate and when:
//! the startup sweep order plus, for every declared trigger, the units a
//! matching event would demand. Nothing is activated while building it.

use std::io::{self, Write};

use rouse_registry::Dispatcher;
use rouse_units::{Trigger, TriggerEvent, UnitName};
use serde::Serialize;

/// Dispatch order for one declared trigger.
#[derive(Debug, Serialize)]
pub struct TriggerPlan {
    /// The declared trigger.
    pub trigger: Trigger,
    /// Units a matching event activates, requirements first.
    pub units: Vec<UnitName>,
}

/// Description of what a manifest activates and in which order.
#[derive(Debug, Serialize)]
pub struct ActivationPlan {
    /// Units the startup sweep activates, in order.
    pub startup: Vec<UnitName>,
    /// Dispatch order per declared trigger, in declaration order.
    pub triggers: Vec<TriggerPlan>,
}

impl ActivationPlan {
    /// Derives the plan from a finalised dispatcher.
    ///
    /// Triggers declared by several units collapse into one entry listing
    /// every unit the trigger activates.
    #[must_use]
    pub fn from_dispatcher<R>(dispatcher: &Dispatcher<R>) -> Self {
        let startup = dispatcher.startup_order();
        let mut triggers: Vec<TriggerPlan> = Vec::new();
        for spec in dispatcher.specs() {
            for trigger in spec.triggers() {
                if triggers.iter().any(|plan| plan.trigger == *trigger) {
                    continue;
                }
                let units = dispatcher.candidates(&observe(trigger));
                triggers.push(TriggerPlan {
                    trigger: trigger.clone(),
                    units,
                });
            }
        }
        Self { startup, triggers }
    }

    /// Writes the plan as a human-readable listing.
    ///
    /// # Errors
    ///
    /// Returns any error raised while writing to `out`.
    pub fn render_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "startup: {}", render_names(&self.startup))?;
        for plan in &self.triggers {
            writeln!(out, "{}: {}", plan.trigger, render_names(&plan.units))?;
        }
        Ok(())
    }
}

/// Builds the observed instance a declared trigger would match.
fn observe(trigger: &Trigger) -> TriggerEvent {
    match trigger {
        Trigger::Event { name } => TriggerEvent::event(name.as_str()),
        Trigger::Keys { sequence, mode } => TriggerEvent::keys(sequence.clone(), *mode),
        Trigger::Command { name } => TriggerEvent::command(name.as_str()),
        Trigger::FileType { language } => TriggerEvent::file_type(language.as_str()),
    }
}

fn render_names(names: &[UnitName]) -> String {
    if names.is_empty() {
        return "(none)".to_owned();
    }
    names
        .iter()
        .map(UnitName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
