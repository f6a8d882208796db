//! Test utilities: an in-memory Juju model and a scripted operator
#![allow(dead_code)]

use async_trait::async_trait;
use cou::core::StepAction;
use cou::execution::{Decision, Prompter};
use cou::juju::{
    ActionResult, ApplicationConfig, ApplicationStatus, CommandOutput, FullStatus, JujuClient,
    JujuError, UnitStatus,
};
use cou::juju::response::ConfigSetting;
use cou::UpgradeError;
use std::collections::{BTreeMap, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Calls received by [`MockJuju`], in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JujuCall {
    Status,
    Config(String),
    RunAction {
        unit: String,
        action: String,
        params: BTreeMap<String, String>,
    },
    RunCommand { unit: String, command: String },
    Scp { unit: String, remote: String, local: String },
    Refresh { application: String, channel: String },
    SetConfig { application: String, key: String, value: String },
}

/// In-memory Juju model
#[derive(Default)]
pub struct MockJuju {
    pub status: FullStatus,
    pub configs: BTreeMap<String, ApplicationConfig>,
    pub action_results: BTreeMap<String, serde_json::Value>,
    pub fail_scp: bool,
    calls: Mutex<Vec<JujuCall>>,
}

impl MockJuju {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an application whose units report the given workload versions
    pub fn with_application(
        mut self,
        name: &str,
        charm: &str,
        channel: Option<&str>,
        units: &[(&str, &str)],
    ) -> Self {
        let units = units
            .iter()
            .enumerate()
            .map(|(i, (unit, version))| {
                (
                    unit.to_string(),
                    UnitStatus {
                        leader: i == 0,
                        machine: Some(i.to_string()),
                        workload_version: Some(version.to_string()),
                    },
                )
            })
            .collect();

        self.status.applications.insert(
            name.to_string(),
            ApplicationStatus {
                charm: format!("ch:amd64/focal/{}-100", charm),
                charm_name: Some(charm.to_string()),
                charm_channel: channel.map(str::to_string),
                version: None,
                units,
            },
        );
        self
    }

    /// Set a string config value for an application
    pub fn with_config(mut self, application: &str, key: &str, value: &str) -> Self {
        self.configs
            .entry(application.to_string())
            .or_insert_with(|| ApplicationConfig {
                application: application.to_string(),
                settings: BTreeMap::new(),
            })
            .settings
            .insert(
                key.to_string(),
                ConfigSetting {
                    value: Some(serde_json::Value::String(value.to_string())),
                },
            );
        self
    }

    /// Result returned by an action
    pub fn with_action_result(mut self, key: &str, value: &str) -> Self {
        self.action_results
            .insert(key.to_string(), serde_json::Value::String(value.to_string()));
        self
    }

    pub fn failing_scp(mut self) -> Self {
        self.fail_scp = true;
        self
    }

    pub fn calls(&self) -> Vec<JujuCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: JujuCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl JujuClient for MockJuju {
    async fn status(&self) -> Result<FullStatus, JujuError> {
        self.record(JujuCall::Status);
        Ok(self.status.clone())
    }

    async fn application_config(&self, application: &str) -> Result<ApplicationConfig, JujuError> {
        self.record(JujuCall::Config(application.to_string()));
        Ok(self.configs.get(application).cloned().unwrap_or_default())
    }

    async fn run_action(
        &self,
        unit: &str,
        action: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<ActionResult, JujuError> {
        self.record(JujuCall::RunAction {
            unit: unit.to_string(),
            action: action.to_string(),
            params: params.clone(),
        });
        Ok(ActionResult {
            unit: unit.to_string(),
            status: "completed".to_string(),
            results: self.action_results.clone(),
        })
    }

    async fn run_command(&self, unit: &str, command: &str) -> Result<CommandOutput, JujuError> {
        self.record(JujuCall::RunCommand {
            unit: unit.to_string(),
            command: command.to_string(),
        });
        Ok(CommandOutput::default())
    }

    async fn scp_from_unit(&self, unit: &str, remote: &str, local: &Path) -> Result<(), JujuError> {
        self.record(JujuCall::Scp {
            unit: unit.to_string(),
            remote: remote.to_string(),
            local: local.to_string_lossy().to_string(),
        });
        if self.fail_scp {
            return Err(JujuError::CommandFailed {
                command: format!("scp {}:{}", unit, remote),
                code: 1,
                stderr: "permission denied".to_string(),
            });
        }
        Ok(())
    }

    async fn refresh_channel(&self, application: &str, channel: &str) -> Result<(), JujuError> {
        self.record(JujuCall::Refresh {
            application: application.to_string(),
            channel: channel.to_string(),
        });
        Ok(())
    }

    async fn set_config(&self, application: &str, key: &str, value: &str) -> Result<(), JujuError> {
        self.record(JujuCall::SetConfig {
            application: application.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }
}

/// Operator answering from a fixed script, recording every question
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<Decision>>,
    asked: Arc<Mutex<Vec<String>>>,
}

impl ScriptedPrompter {
    pub fn new(answers: Vec<Decision>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            asked: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared log of the questions asked, readable after the engine took ownership
    pub fn asked(&self) -> Arc<Mutex<Vec<String>>> {
        self.asked.clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn is_interactive(&self) -> bool {
        true
    }

    fn ask(&self, description: &str) -> Result<Decision, UpgradeError> {
        self.asked.lock().unwrap().push(description.to_string());
        Ok(self
            .answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Decision::Continue))
    }
}

/// Action that appends its name to a shared log
pub struct RecordingAction {
    name: String,
    log: Arc<Mutex<Vec<String>>>,
    delay: Option<Duration>,
    fail: bool,
}

impl RecordingAction {
    pub fn new(name: &str, log: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            name: name.to_string(),
            log: log.clone(),
            delay: None,
            fail: false,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl StepAction for RecordingAction {
    async fn run(&self) -> Result<(), UpgradeError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(JujuError::Timeout(1).into());
        }
        self.log.lock().unwrap().push(self.name.clone());
        Ok(())
    }
}

/// Tracks the highest number of actions running at once
pub struct ConcurrencyProbe {
    running: AtomicUsize,
    pub peak: AtomicUsize,
}

impl ConcurrencyProbe {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            running: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        })
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

pub struct ProbedAction(pub Arc<ConcurrencyProbe>);

#[async_trait]
impl StepAction for ProbedAction {
    async fn run(&self) -> Result<(), UpgradeError> {
        let now = self.0.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.0.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.0.running.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}
