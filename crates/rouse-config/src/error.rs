//! Error types for manifest loading.

use std::io;

use camino::Utf8PathBuf;
use rouse_units::{KeyParseError, SpecError};
use thiserror::Error;

/// Failure raised while reading, parsing, or resolving a manifest.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the manifest file failed.
    #[error("failed to read manifest '{path}': {source}")]
    Read {
        /// Path of the manifest that could not be read.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The manifest text is not valid TOML of the expected shape.
    #[error("failed to parse manifest{}: {source}", render_location(.path))]
    Parse {
        /// Path of the manifest, when it was read from disk.
        path: Option<Utf8PathBuf>,
        /// Underlying TOML deserialisation failure.
        #[source]
        source: Box<toml::de::Error>,
    },
    /// A unit entry survived parsing but failed spec validation.
    #[error("invalid unit '{unit}': {source}")]
    InvalidUnit {
        /// Name of the offending unit entry.
        unit: String,
        /// Underlying validation failure.
        #[source]
        source: SpecError,
    },
    /// A key binding uses notation that does not parse.
    #[error("invalid key notation for unit '{unit}': {source}")]
    KeyNotation {
        /// Name of the unit declaring the binding.
        unit: String,
        /// Underlying notation failure, carrying the byte position.
        #[source]
        source: KeyParseError,
    },
}

impl ConfigError {
    /// Creates a [`ConfigError::Read`] for `path`.
    #[must_use]
    pub fn read(path: Utf8PathBuf, source: io::Error) -> Self {
        Self::Read { path, source }
    }

    /// Creates a [`ConfigError::InvalidUnit`] for `unit`.
    #[must_use]
    pub fn invalid_unit(unit: impl Into<String>, source: SpecError) -> Self {
        Self::InvalidUnit {
            unit: unit.into(),
            source,
        }
    }

    /// Creates a [`ConfigError::KeyNotation`] for `unit`.
    #[must_use]
    pub fn key_notation(unit: impl Into<String>, source: KeyParseError) -> Self {
        Self::KeyNotation {
            unit: unit.into(),
            source,
        }
    }

    /// Returns `true` when the failure came from the filesystem rather
    /// than the manifest's content.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Read { .. })
    }
}

fn render_location(location: &Option<Utf8PathBuf>) -> String {
    location
        .as_ref()
        .map_or_else(String::new, |path| format!(" '{path}'"))
}
