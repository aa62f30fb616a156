//! TOML manifests of activation units.
//!
//! A manifest pairs one optional `[settings]` table with any number of
//! `[[unit]]` tables:
//!
//! ```toml
//! [settings]
//! log_filter = "info"
//!
//! [[unit]]
//! name = "theme"
//! priority = 1000
//!
//! [[unit]]
//! name = "finder"
//! keys = [{ sequence = "<leader>ff" }]
//! dependencies = ["plenary"]
//! ```
//!
//! Entries are plain data; [`Manifest::activation_specs`] converts the
//! enabled ones into validated [`ActivationSpec`] values ready for
//! registration.

use std::fs;
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use rouse_units::{ActivationSpec, DEFAULT_PRIORITY, KeyMode, Trigger, UnitName};
use serde::{Deserialize, Serialize};

use crate::condition::{Condition, HostFacts};
use crate::error::ConfigError;
use crate::settings::Settings;

/// Conventional file name of the unit manifest.
pub const MANIFEST_FILE_NAME: &str = "units.toml";

/// Returns the conventional manifest location under the user's
/// configuration directory, when one can be determined.
#[must_use]
pub fn default_manifest_path() -> Option<Utf8PathBuf> {
    let config_dir = dirs::config_dir()?;
    let base = Utf8PathBuf::from_path_buf(config_dir).ok()?;
    Some(base.join("rouse").join(MANIFEST_FILE_NAME))
}

const fn default_priority() -> i32 {
    DEFAULT_PRIORITY
}

const fn default_enabled() -> bool {
    true
}

/// Key binding declared by a manifest entry.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct KeyBinding {
    /// Key-notation sequence, e.g. `<leader>ff`.
    pub sequence: String,
    /// Editor mode the binding applies in.
    #[serde(default)]
    pub mode: KeyMode,
}

/// One `[[unit]]` table from a manifest.
///
/// Field names mirror the manifest keys. Trigger lists default to empty, so
/// an entry with none of `event`, `keys`, `cmd`, or `ft` describes an eager
/// unit.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct UnitEntry {
    /// Unit name, unique within the manifest.
    pub name: String,
    /// Lifecycle events that demand the unit.
    #[serde(default)]
    pub event: Vec<String>,
    /// Key bindings that demand the unit.
    #[serde(default)]
    pub keys: Vec<KeyBinding>,
    /// User commands that demand the unit.
    #[serde(default)]
    pub cmd: Vec<String>,
    /// Buffer languages that demand the unit.
    #[serde(default)]
    pub ft: Vec<String>,
    /// Startup priority; higher activates first.
    #[serde(default = "default_priority")]
    pub priority: i32,
    /// Units that must be active before this one's setup runs.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Whether the entry participates at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Host condition gating the entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cond: Option<Condition>,
}

impl UnitEntry {
    /// Returns `true` when the entry is enabled and its condition, if any,
    /// holds on the given host.
    #[must_use]
    pub fn is_enabled(&self, facts: &HostFacts) -> bool {
        self.enabled
            && self
                .cond
                .as_ref()
                .is_none_or(|cond| cond.is_satisfied(facts))
    }

    /// Converts the entry into a validated [`ActivationSpec`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::KeyNotation`] when a key binding does not
    /// parse and [`ConfigError::InvalidUnit`] when the assembled spec fails
    /// validation.
    pub fn to_spec(&self) -> Result<ActivationSpec, ConfigError> {
        let mut triggers = Vec::new();
        for name in &self.event {
            triggers.push(Trigger::event(name.as_str()));
        }
        for binding in &self.keys {
            let sequence = binding
                .sequence
                .parse()
                .map_err(|source| ConfigError::key_notation(self.name.as_str(), source))?;
            triggers.push(Trigger::keys(sequence, binding.mode));
        }
        for name in &self.cmd {
            triggers.push(Trigger::command(name.as_str()));
        }
        for language in &self.ft {
            triggers.push(Trigger::file_type(language.as_str()));
        }
        let dependencies = self
            .dependencies
            .iter()
            .map(|name| UnitName::from(name.as_str()))
            .collect();
        let spec = ActivationSpec::new(self.name.as_str())
            .with_priority(self.priority)
            .with_triggers(triggers)
            .with_dependencies(dependencies);
        spec.validate()
            .map_err(|source| ConfigError::invalid_unit(self.name.as_str(), source))?;
        Ok(spec)
    }
}

/// Parsed unit manifest: global settings plus unit entries.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Manifest {
    #[serde(default)]
    settings: Settings,
    #[serde(default, rename = "unit")]
    units: Vec<UnitEntry>,
}

impl FromStr for Manifest {
    type Err = ConfigError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse_inner(text, None)
    }
}

impl Manifest {
    /// Reads and parses the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when its contents are not a valid manifest.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::read(path.to_path_buf(), source))?;
        Self::parse_inner(&text, Some(path))
    }

    /// Loads the manifest from [`default_manifest_path`], returning
    /// `Ok(None)` when no manifest exists there.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Manifest::load`] for a manifest that
    /// exists but cannot be read or parsed.
    pub fn discover() -> Result<Option<Self>, ConfigError> {
        let Some(path) = default_manifest_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load(&path).map(Some)
    }

    /// Returns the global settings table.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns every declared unit entry, enabled or not.
    #[must_use]
    pub fn units(&self) -> &[UnitEntry] {
        &self.units
    }

    /// Converts every enabled entry into a validated [`ActivationSpec`],
    /// dropping entries that are disabled or whose condition fails on
    /// `facts`.
    ///
    /// # Errors
    ///
    /// Returns the first conversion failure; see [`UnitEntry::to_spec`].
    pub fn activation_specs(&self, facts: &HostFacts) -> Result<Vec<ActivationSpec>, ConfigError> {
        self.units
            .iter()
            .filter(|unit| unit.is_enabled(facts))
            .map(UnitEntry::to_spec)
            .collect()
    }

    fn parse_inner(text: &str, path: Option<&Utf8Path>) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.map(Utf8Path::to_path_buf),
            source: Box::new(source),
        })
    }
}
