//! Typed views over `juju ... --format json` output

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Config keys that carry the release origin, in lookup order
pub const ORIGIN_KEYS: [&str; 2] = ["openstack-origin", "source"];

/// Output of `juju status --format json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FullStatus {
    #[serde(default)]
    pub applications: BTreeMap<String, ApplicationStatus>,
}

/// One application in the status output
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ApplicationStatus {
    /// Charm URL, e.g. `ch:amd64/focal/keystone-698`
    #[serde(default)]
    pub charm: String,

    #[serde(default)]
    pub charm_name: Option<String>,

    #[serde(default)]
    pub charm_channel: Option<String>,

    /// Application workload version
    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub units: BTreeMap<String, UnitStatus>,
}

/// One unit of an application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UnitStatus {
    #[serde(default)]
    pub leader: bool,

    #[serde(default)]
    pub machine: Option<String>,

    #[serde(default)]
    pub workload_version: Option<String>,
}

impl ApplicationStatus {
    /// Bare charm name, preferring `charm-name` over parsing the charm URL
    pub fn charm_name(&self) -> String {
        match &self.charm_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => extract_charm_name(&self.charm),
        }
    }

    /// Name of the leader unit, if one is elected
    pub fn leader_unit(&self) -> Option<&str> {
        self.units
            .iter()
            .find(|(_, unit)| unit.leader)
            .map(|(name, _)| name.as_str())
    }

    /// Workload version a unit reports, falling back to the application's
    pub fn unit_version(&self, unit: &str) -> Option<&str> {
        self.units
            .get(unit)
            .and_then(|u| u.workload_version.as_deref())
            .filter(|v| !v.is_empty())
            .or_else(|| self.version.as_deref().filter(|v| !v.is_empty()))
    }
}

/// Strip scheme, architecture/series path and revision from a charm URL
pub fn extract_charm_name(charm_url: &str) -> String {
    let name = charm_url.rsplit('/').next().unwrap_or(charm_url);
    let name = match name.split_once(':') {
        Some((_, rest)) => rest,
        None => name,
    };

    match name.rsplit_once('-') {
        Some((base, revision))
            if !base.is_empty() && revision.chars().all(|c| c.is_ascii_digit()) =>
        {
            base.to_string()
        }
        _ => name.to_string(),
    }
}

/// Output of `juju config <app> --format json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default)]
    pub application: String,

    #[serde(default)]
    pub settings: BTreeMap<String, ConfigSetting>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigSetting {
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

impl ApplicationConfig {
    /// String value of a setting
    pub fn value(&self, key: &str) -> Option<&str> {
        self.settings
            .get(key)
            .and_then(|s| s.value.as_ref())
            .and_then(|v| v.as_str())
    }

    /// First non-empty origin setting as `(key, value)`
    pub fn origin(&self) -> Option<(&'static str, String)> {
        ORIGIN_KEYS.iter().find_map(|key| {
            self.value(key)
                .filter(|v| !v.is_empty())
                .map(|v| (*key, v.to_string()))
        })
    }
}

/// Result of a completed action
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionResult {
    #[serde(default)]
    pub unit: String,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub results: BTreeMap<String, serde_json::Value>,
}

impl ActionResult {
    /// String value of an action result
    pub fn result_str(&self, key: &str) -> Option<&str> {
        self.results.get(key).and_then(|v| v.as_str())
    }

    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }
}

/// Output of a raw command run on a unit
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}
