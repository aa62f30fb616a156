//! Host-level settings from the manifest's `[settings]` table.

use serde::{Deserialize, Serialize};

use crate::logging::LogFormat;

/// Default tracing filter expression used when the manifest sets none.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Tunables from the manifest's `[settings]` table.
///
/// Every field has a default, so a partial or absent table is valid.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Filter expression for log output, in tracing env-filter syntax.
    pub log_filter: String,
    /// Output format for log lines.
    pub log_format: LogFormat,
    /// Minimum priority for trigger-less units to join the startup sweep.
    pub eager_floor: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
            log_format: LogFormat::default(),
            eager_floor: 0,
        }
    }
}
