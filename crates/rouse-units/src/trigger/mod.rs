//! Trigger descriptors and observed trigger instances.
//!
//! A [`Trigger`] describes the host moment that should activate a unit: a
//! named lifecycle event, a key sequence pressed in an editor mode, a user
//! command, or a detected buffer language. The host reports what actually
//! happened as a [`TriggerEvent`]; [`Trigger::matches`] decides whether a
//! descriptor fires for an observed instance.
//!
//! # Example
//!
//! ```
//! use rouse_units::{Trigger, TriggerEvent};
//!
//! let trigger = Trigger::file_type("rust");
//! assert!(trigger.matches(&TriggerEvent::file_type("Rust")));
//! assert!(!trigger.matches(&TriggerEvent::event("BufRead")));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::keys::KeySequence;
use crate::mode::KeyMode;

/// Discriminant of a trigger shape, used for matching and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// Named lifecycle event.
    Event,
    /// Key sequence in an editor mode.
    Keys,
    /// Named user command.
    Command,
    /// Detected buffer language.
    FileType,
}

impl TriggerKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Keys => "keys",
            Self::Command => "command",
            Self::FileType => "filetype",
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declarative condition under which a unit activates.
///
/// Triggers are immutable after construction; the dispatcher compares them
/// against observed [`TriggerEvent`] instances.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Fires when the host emits the named lifecycle event.
    Event {
        /// Host event name, matched exactly.
        name: String,
    },
    /// Fires on the first press of a key sequence in an editor mode.
    Keys {
        /// Parsed key-notation sequence.
        sequence: KeySequence,
        /// Editor mode the mapping applies to.
        mode: KeyMode,
    },
    /// Fires when the named user command is first invoked.
    Command {
        /// Command name, matched exactly.
        name: String,
    },
    /// Fires when a buffer of the given language is detected.
    FileType {
        /// Language identifier, matched case-insensitively.
        language: String,
    },
}

impl Trigger {
    /// Creates a lifecycle-event trigger.
    #[must_use]
    pub fn event(name: impl Into<String>) -> Self {
        Self::Event { name: name.into() }
    }

    /// Creates a key-sequence trigger.
    #[must_use]
    pub const fn keys(sequence: KeySequence, mode: KeyMode) -> Self {
        Self::Keys { sequence, mode }
    }

    /// Creates a user-command trigger.
    #[must_use]
    pub fn command(name: impl Into<String>) -> Self {
        Self::Command { name: name.into() }
    }

    /// Creates a file-type trigger.
    #[must_use]
    pub fn file_type(language: impl Into<String>) -> Self {
        Self::FileType {
            language: language.into(),
        }
    }

    /// Returns the shape discriminant.
    #[must_use]
    pub const fn kind(&self) -> TriggerKind {
        match self {
            Self::Event { .. } => TriggerKind::Event,
            Self::Keys { .. } => TriggerKind::Keys,
            Self::Command { .. } => TriggerKind::Command,
            Self::FileType { .. } => TriggerKind::FileType,
        }
    }

    /// Returns `true` when this descriptor fires for the observed instance.
    ///
    /// Event and command names match exactly. Languages match
    /// case-insensitively. Key sequences compare their normalised forms and
    /// must agree on the editor mode.
    #[must_use]
    pub fn matches(&self, observed: &TriggerEvent) -> bool {
        match (self, observed) {
            (Self::Event { name }, TriggerEvent::Event { name: observed_name })
            | (Self::Command { name }, TriggerEvent::Command { name: observed_name }) => {
                name == observed_name
            }
            (
                Self::Keys { sequence, mode },
                TriggerEvent::Keys {
                    sequence: observed_sequence,
                    mode: observed_mode,
                },
            ) => sequence == observed_sequence && mode == observed_mode,
            (
                Self::FileType { language },
                TriggerEvent::FileType {
                    language: observed_language,
                },
            ) => language.eq_ignore_ascii_case(observed_language),
            _ => false,
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Event { name } => write!(f, "event {name}"),
            Self::Keys { sequence, mode } => write!(f, "keys {sequence} ({mode})"),
            Self::Command { name } => write!(f, "command {name}"),
            Self::FileType { language } => write!(f, "filetype {language}"),
        }
    }
}

/// Observed trigger instance reported by the host.
///
/// Carries the same four shapes as [`Trigger`] so that matching is a
/// shape-and-payload comparison rather than a stringly-typed lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerEvent {
    /// The host emitted a named lifecycle event.
    Event {
        /// Host event name.
        name: String,
    },
    /// A key sequence was pressed in an editor mode.
    Keys {
        /// Parsed key-notation sequence.
        sequence: KeySequence,
        /// Editor mode the keys were pressed in.
        mode: KeyMode,
    },
    /// A user command was invoked.
    Command {
        /// Command name.
        name: String,
    },
    /// A buffer language was detected.
    FileType {
        /// Language identifier.
        language: String,
    },
}

impl TriggerEvent {
    /// Creates an observed lifecycle event.
    #[must_use]
    pub fn event(name: impl Into<String>) -> Self {
        Self::Event { name: name.into() }
    }

    /// Creates an observed key press.
    #[must_use]
    pub const fn keys(sequence: KeySequence, mode: KeyMode) -> Self {
        Self::Keys { sequence, mode }
    }

    /// Creates an observed command invocation.
    #[must_use]
    pub fn command(name: impl Into<String>) -> Self {
        Self::Command { name: name.into() }
    }

    /// Creates an observed file-type detection.
    #[must_use]
    pub fn file_type(language: impl Into<String>) -> Self {
        Self::FileType {
            language: language.into(),
        }
    }

    /// Returns the shape discriminant.
    #[must_use]
    pub const fn kind(&self) -> TriggerKind {
        match self {
            Self::Event { .. } => TriggerKind::Event,
            Self::Keys { .. } => TriggerKind::Keys,
            Self::Command { .. } => TriggerKind::Command,
            Self::FileType { .. } => TriggerKind::FileType,
        }
    }
}

impl fmt::Display for TriggerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Event { name } => write!(f, "event {name}"),
            Self::Keys { sequence, mode } => write!(f, "keys {sequence} ({mode})"),
            Self::Command { name } => write!(f, "command {name}"),
            Self::FileType { language } => write!(f, "filetype {language}"),
        }
    }
}
