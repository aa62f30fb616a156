//! Logging output selection for the host process.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Output format for log lines emitted by the telemetry layer.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// Structured JSON suitable for ingestion by logging stacks.
    Json,
    /// Single-line human-readable output.
    #[default]
    Compact,
    /// Multi-line human-readable output for interactive debugging.
    Pretty,
}

/// Errors encountered while parsing a [`LogFormat`] from text.
pub type LogFormatParseError = strum::ParseError;
