//! Juju CLI subprocess client - calls juju with `--format json`

use crate::juju::{
    ActionResult, ApplicationConfig, CommandOutput, FullStatus, JujuClient, JujuClientConfig,
    JujuError,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Client driving the `juju` command line
#[derive(Debug, Clone)]
pub struct JujuCli {
    config: JujuClientConfig,
}

impl JujuCli {
    pub fn new(config: JujuClientConfig) -> Self {
        Self { config }
    }

    /// Full argument list for a juju subcommand, with the model flag
    /// placed right after the subcommand name
    pub fn command_args(&self, args: &[&str]) -> Vec<String> {
        let mut full: Vec<String> = Vec::with_capacity(args.len() + 2);
        let mut rest = args.iter();

        if let Some(subcommand) = rest.next() {
            full.push(subcommand.to_string());
        }
        if let Some(model) = &self.config.model {
            full.push("-m".to_string());
            full.push(model.clone());
        }
        full.extend(rest.map(|a| a.to_string()));
        full
    }

    /// Execute a juju subcommand and capture stdout
    ///
    /// # Errors
    /// Returns `JujuError` if:
    /// - The juju executable cannot be spawned
    /// - juju exits with a non-zero status
    /// - The output is not valid UTF-8
    /// - The command times out
    async fn juju(&self, args: &[&str]) -> Result<CommandOutput, JujuError> {
        let args = self.command_args(args);
        let rendered = args.join(" ");
        debug!("Running juju {}", rendered);

        let result = timeout(
            Duration::from_secs(self.config.timeout_secs),
            Command::new(&self.config.binary)
                .args(&args)
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| JujuError::Timeout(self.config.timeout_secs))?;

        let output = result.map_err(|e| JujuError::Spawn(e.to_string()))?;
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            warn!("juju {} exited with code {}: {}", rendered, code, stderr);
            return Err(JujuError::CommandFailed {
                command: rendered,
                code,
                stderr,
            });
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| JujuError::Parse(format!("juju output is not UTF-8: {}", e)))?;

        debug!("juju {} returned {} bytes of output", rendered, stdout.len());

        Ok(CommandOutput { stdout, stderr })
    }
}

/// Parse `juju run <unit> <action> --format json`, keyed by unit (juju 3)
/// or by unit tag (juju 2.9)
pub fn parse_action_output(unit: &str, json: &str) -> Result<ActionResult, JujuError> {
    let mut by_unit: BTreeMap<String, ActionResult> = serde_json::from_str(json)?;
    let tag = format!("unit-{}", unit.replace('/', "-"));

    let mut result = by_unit
        .remove(unit)
        .or_else(|| by_unit.remove(&tag))
        .or_else(|| by_unit.into_values().next())
        .ok_or_else(|| JujuError::Parse(format!("no action result for {}", unit)))?;

    if result.unit.is_empty() {
        result.unit = unit.to_string();
    }
    Ok(result)
}

#[async_trait]
impl JujuClient for JujuCli {
    async fn status(&self) -> Result<FullStatus, JujuError> {
        let output = self.juju(&["status", "--format", "json"]).await?;
        Ok(serde_json::from_str(&output.stdout)?)
    }

    async fn application_config(&self, application: &str) -> Result<ApplicationConfig, JujuError> {
        let output = self.juju(&["config", application, "--format", "json"]).await?;
        Ok(serde_json::from_str(&output.stdout)?)
    }

    async fn run_action(
        &self,
        unit: &str,
        action: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<ActionResult, JujuError> {
        let pairs: Vec<String> = params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        let mut args = vec!["run", unit, action, "--format", "json"];
        args.extend(pairs.iter().map(String::as_str));

        let output = self.juju(&args).await?;
        let result = parse_action_output(unit, &output.stdout)?;

        if !result.is_completed() {
            return Err(JujuError::ActionFailed {
                unit: unit.to_string(),
                action: action.to_string(),
                status: result.status,
            });
        }

        Ok(result)
    }

    async fn run_command(&self, unit: &str, command: &str) -> Result<CommandOutput, JujuError> {
        self.juju(&["exec", "--unit", unit, "--", command]).await
    }

    async fn scp_from_unit(&self, unit: &str, remote: &str, local: &Path) -> Result<(), JujuError> {
        let source = format!("{}:{}", unit, remote);
        let destination = local.to_string_lossy();
        self.juju(&["scp", &source, &destination]).await?;
        Ok(())
    }

    async fn refresh_channel(&self, application: &str, channel: &str) -> Result<(), JujuError> {
        self.juju(&["refresh", application, "--channel", channel]).await?;
        Ok(())
    }

    async fn set_config(&self, application: &str, key: &str, value: &str) -> Result<(), JujuError> {
        let setting = format!("{}={}", key, value);
        self.juju(&["config", application, &setting]).await?;
        Ok(())
    }
}
