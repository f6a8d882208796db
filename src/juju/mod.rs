//! Juju client for querying and operating on the deployed model

pub mod client;
pub mod error;
pub mod response;
pub mod subprocess_client;

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;

pub use client::JujuClientConfig;
pub use error::JujuError;
pub use response::{ActionResult, ApplicationConfig, ApplicationStatus, CommandOutput, FullStatus, UnitStatus};
pub use subprocess_client::JujuCli;

/// Operations the upgrader needs from Juju - allows for different implementations
#[async_trait]
pub trait JujuClient: Send + Sync {
    /// Full model status
    async fn status(&self) -> Result<FullStatus, JujuError>;

    /// Configuration of a single application
    async fn application_config(&self, application: &str) -> Result<ApplicationConfig, JujuError>;

    /// Run a named action on a unit and wait for its result
    async fn run_action(
        &self,
        unit: &str,
        action: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<ActionResult, JujuError>;

    /// Run a raw shell command on a unit
    async fn run_command(&self, unit: &str, command: &str) -> Result<CommandOutput, JujuError>;

    /// Copy a file from a unit to the local filesystem
    async fn scp_from_unit(&self, unit: &str, remote: &str, local: &Path) -> Result<(), JujuError>;

    /// Switch the channel an application's charm tracks
    async fn refresh_channel(&self, application: &str, channel: &str) -> Result<(), JujuError>;

    /// Set a single application config value
    async fn set_config(&self, application: &str, key: &str, value: &str) -> Result<(), JujuError>;
}
