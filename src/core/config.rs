//! Upgrader configuration from YAML

use crate::core::release::OpenStackRelease;
use crate::error::UpgradeError;
use crate::juju::JujuClientConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration; every field has a default so an empty file is valid
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgraderConfig {
    /// How to reach juju
    pub juju: JujuConfig,

    /// Ubuntu series the cloud runs on
    pub series: String,

    /// Database backup settings
    pub backup: BackupConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JujuConfig {
    /// Path to the juju executable
    pub binary: String,

    /// Model to operate on (current model when unset)
    pub model: Option<String>,

    /// Timeout for each juju invocation in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupConfig {
    /// Charm of the database application to dump
    pub database_charm: String,

    /// Directory on the database unit the dump is written to
    pub basedir: String,

    /// Local directory the dump is copied into
    pub local_dir: PathBuf,
}

impl Default for UpgraderConfig {
    fn default() -> Self {
        Self {
            juju: JujuConfig::default(),
            series: "focal".to_string(),
            backup: BackupConfig::default(),
        }
    }
}

impl Default for JujuConfig {
    fn default() -> Self {
        let client = JujuClientConfig::default();
        Self {
            binary: client.binary,
            model: client.model,
            timeout_secs: client.timeout_secs,
        }
    }
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            database_charm: "mysql-innodb-cluster".to_string(),
            basedir: "/var/lib/mysql/mysqldump".to_string(),
            local_dir: PathBuf::from("."),
        }
    }
}

impl UpgraderConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, UpgradeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            UpgradeError::Configuration(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, UpgradeError> {
        let config: UpgraderConfig = if yaml.trim().is_empty() {
            UpgraderConfig::default()
        } else {
            serde_yaml::from_str(yaml)
                .map_err(|e| UpgradeError::Configuration(format!("invalid config: {}", e)))?
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), UpgradeError> {
        if self.juju.binary.trim().is_empty() {
            return Err(UpgradeError::Configuration(
                "juju.binary must not be empty".to_string(),
            ));
        }
        if self.juju.timeout_secs == 0 {
            return Err(UpgradeError::Configuration(
                "juju.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if OpenStackRelease::distro_for_series(&self.series).is_none() {
            return Err(UpgradeError::Configuration(format!(
                "unsupported series: {}",
                self.series
            )));
        }
        if self.backup.database_charm.trim().is_empty() || self.backup.basedir.trim().is_empty() {
            return Err(UpgradeError::Configuration(
                "backup.database_charm and backup.basedir must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Juju client settings derived from this configuration
    pub fn client_config(&self) -> JujuClientConfig {
        JujuClientConfig::new()
            .with_binary(self.juju.binary.clone())
            .with_model(self.juju.model.clone())
            .with_timeout(self.juju.timeout_secs)
    }
}
