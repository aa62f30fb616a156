//! Load-time condition predicates over host facts.
//!
//! A manifest entry may carry a `cond` table restricting it to particular
//! hosts. Conditions are pure data evaluated once against [`HostFacts`]
//! when the manifest is resolved; an unsatisfied condition drops the entry
//! before registration, so the dispatcher never sees it.

use std::collections::HashSet;
use std::env;

use serde::{Deserialize, Serialize};

/// Facts about the running host that conditions are evaluated against.
#[derive(Debug, Clone, Default)]
pub struct HostFacts {
    hostname: Option<String>,
    platform: String,
    env: HashSet<String>,
}

impl HostFacts {
    /// Captures facts from the running process.
    ///
    /// The platform is the compile-time operating system name. The
    /// hostname comes from the `HOSTNAME` variable when set. Environment
    /// facts are a snapshot of the variable names present at call time.
    #[must_use]
    pub fn detect() -> Self {
        let env: HashSet<String> = env::vars().map(|(name, _)| name).collect();
        let hostname = env::var("HOSTNAME").ok().filter(|name| !name.is_empty());
        Self {
            hostname,
            platform: env::consts::OS.to_owned(),
            env,
        }
    }

    /// Replaces the hostname fact.
    #[must_use]
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Replaces the platform fact.
    #[must_use]
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    /// Adds an environment variable name to the snapshot.
    #[must_use]
    pub fn with_env_var(mut self, name: impl Into<String>) -> Self {
        self.env.insert(name.into());
        self
    }
}

/// Restriction on the hosts a unit entry applies to.
///
/// Every present clause must hold; an empty condition is always satisfied.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Condition {
    /// Hostname the entry is restricted to, compared case-insensitively.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Operating system the entry is restricted to, named as reported by
    /// `std::env::consts::OS` (`linux`, `macos`, `windows`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Environment variable that must be present for the entry to apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_set: Option<String>,
}

impl Condition {
    /// Evaluates the condition against the given host facts.
    #[must_use]
    pub fn is_satisfied(&self, facts: &HostFacts) -> bool {
        let hostname_holds = self.hostname.as_ref().is_none_or(|expected| {
            facts
                .hostname
                .as_ref()
                .is_some_and(|actual| actual.eq_ignore_ascii_case(expected))
        });
        let platform_holds = self
            .platform
            .as_ref()
            .is_none_or(|expected| expected == &facts.platform);
        let env_holds = self
            .env_set
            .as_ref()
            .is_none_or(|name| facts.env.contains(name));
        hostname_holds && platform_holds && env_holds
    }
}

#[cfg(test)]
mod tests {
    use super::{Condition, HostFacts};

    fn facts() -> HostFacts {
        HostFacts::default()
            .with_hostname("workstation")
            .with_platform("linux")
            .with_env_var("TMUX")
    }

    #[test]
    fn empty_condition_is_always_satisfied() {
        assert!(Condition::default().is_satisfied(&facts()));
        assert!(Condition::default().is_satisfied(&HostFacts::default()));
    }

    #[test]
    fn platform_clause_requires_an_exact_match() {
        let condition = Condition {
            platform: Some("linux".to_owned()),
            ..Condition::default()
        };
        assert!(condition.is_satisfied(&facts()));
        assert!(!condition.is_satisfied(&facts().with_platform("macos")));
    }

    #[test]
    fn hostname_comparison_ignores_ascii_case() {
        let condition = Condition {
            hostname: Some("Workstation".to_owned()),
            ..Condition::default()
        };
        assert!(condition.is_satisfied(&facts()));
        assert!(!condition.is_satisfied(&facts().with_hostname("laptop")));
    }

    #[test]
    fn hostname_clause_fails_when_the_host_has_no_hostname() {
        let condition = Condition {
            hostname: Some("workstation".to_owned()),
            ..Condition::default()
        };
        assert!(!condition.is_satisfied(&HostFacts::default()));
    }

    #[test]
    fn env_clause_requires_the_variable_to_be_present() {
        let condition = Condition {
            env_set: Some("TMUX".to_owned()),
            ..Condition::default()
        };
        assert!(condition.is_satisfied(&facts()));
        assert!(!condition.is_satisfied(&HostFacts::default().with_platform("linux")));
    }

    #[test]
    fn every_present_clause_must_hold() {
        let condition = Condition {
            hostname: Some("workstation".to_owned()),
            platform: Some("linux".to_owned()),
            env_set: Some("TMUX".to_owned()),
        };
        assert!(condition.is_satisfied(&facts()));
        assert!(!condition.is_satisfied(&facts().with_platform("windows")));
    }

    #[test]
    fn conditions_parse_from_inline_tables() {
        let condition: Condition =
            toml::from_str(r#"platform = "linux""#).expect("condition should parse");
        assert_eq!(condition.platform.as_deref(), Some("linux"));
        assert!(condition.hostname.is_none());
        assert!(condition.env_set.is_none());
    }
}
