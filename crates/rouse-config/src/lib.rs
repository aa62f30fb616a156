//! Declarative manifest loading for lazy-activation units.
//!
//! Hosts describe their units in a TOML manifest (`units.toml`): one
//! `[settings]` table for logging and startup tuning, and one `[[unit]]`
//! table per unit naming its triggers, priority, and dependencies. Entries
//! may carry a `cond` table restricting them to particular hosts; the
//! condition is evaluated once against [`HostFacts`] when the manifest is
//! resolved, and unsatisfied entries are dropped before registration.
//! Surviving entries convert into validated
//! [`rouse_units::ActivationSpec`] values.
//!
//! # Example
//!
//! ```
//! use rouse_config::{HostFacts, Manifest};
//!
//! let manifest: Manifest = r#"
//!     [settings]
//!     log_filter = "debug"
//!
//!     [[unit]]
//!     name = "finder"
//!     keys = [{ sequence = "<leader>ff" }]
//!     dependencies = ["plenary"]
//!
//!     [[unit]]
//!     name = "plenary"
//! "#
//! .parse()?;
//!
//! assert_eq!(manifest.settings().log_filter, "debug");
//! let specs = manifest.activation_specs(&HostFacts::detect())?;
//! assert_eq!(specs.len(), 2);
//! # Ok::<(), rouse_config::ConfigError>(())
//! ```

pub mod condition;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod settings;

pub use condition::{Condition, HostFacts};
pub use error::ConfigError;
pub use logging::{LogFormat, LogFormatParseError};
pub use manifest::{KeyBinding, MANIFEST_FILE_NAME, Manifest, UnitEntry, default_manifest_path};
pub use settings::{DEFAULT_LOG_FILTER, Settings};
