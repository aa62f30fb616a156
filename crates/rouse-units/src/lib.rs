//! Data model for lazily activated units.
//!
//! The `rouse-units` crate defines the vocabulary shared by the registry,
//! the manifest loader, and the host-facing dispatcher: unit names,
//! [`ActivationSpec`] declarations, the [`Trigger`] shapes a unit can wake
//! on, the key-sequence notation used by key triggers, and the
//! [`UnitState`] lifecycle.
//!
//! Everything here is plain data. Deciding *when* a unit activates, running
//! its setup procedure, and tracking state transitions belong to the
//! `rouse-registry` crate; reading declarations from configuration files
//! belongs to `rouse-config`.
//!
//! # Example
//!
//! ```
//! use rouse_units::{ActivationSpec, KeyMode, KeySequence, Trigger};
//!
//! let sequence: KeySequence = "<leader>ff".parse().expect("valid notation");
//! let spec = ActivationSpec::new("finder")
//!     .with_trigger(Trigger::keys(sequence, KeyMode::Normal))
//!     .with_dependencies(vec!["plenary".into()]);
//!
//! assert_eq!(spec.name().as_str(), "finder");
//! assert!(spec.validate().is_ok());
//! ```

pub mod keys;
mod mode;
mod name;
pub mod spec;
mod state;
pub mod trigger;

pub use self::keys::{Key, KeyNode, KeyParseError, KeySequence, Modifiers, SpecialKey};
pub use self::mode::{KeyMode, KeyModeParseError};
pub use self::name::UnitName;
pub use self::spec::{ActivationSpec, DEFAULT_PRIORITY, SpecError, THEME_PRIORITY};
pub use self::state::UnitState;
pub use self::trigger::{Trigger, TriggerEvent, TriggerKind};
