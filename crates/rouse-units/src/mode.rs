//! Editor modes a key trigger can bind in.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Editor mode a key sequence is pressed in.
///
/// Key triggers only match observations made in the same mode, mirroring
/// how editor keymaps are scoped.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, Hash, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum KeyMode {
    /// Command-oriented mode; the default for mappings.
    #[default]
    Normal,
    /// Text-entry mode.
    Insert,
    /// Selection mode.
    Visual,
    /// Embedded terminal mode.
    Terminal,
}

/// Errors encountered while parsing a [`KeyMode`] from text.
pub type KeyModeParseError = strum::ParseError;
