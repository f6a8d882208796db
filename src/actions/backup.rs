//! Backup of the OpenStack databases

use crate::core::config::BackupConfig;
use crate::core::StepAction;
use crate::error::UpgradeError;
use crate::juju::{JujuClient, JujuError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

const DUMP_ACTION: &str = "mysqldump";
const DUMP_RESULT_KEY: &str = "mysqldump-file";

/// Dumps the database cluster on its leader and copies the dump locally
pub struct BackupAction {
    client: Arc<dyn JujuClient>,
    config: BackupConfig,
}

impl BackupAction {
    pub fn new(client: Arc<dyn JujuClient>, config: BackupConfig) -> Self {
        Self { client, config }
    }

    /// Name and leader unit of the database application
    async fn database_leader(&self) -> Result<(String, String), JujuError> {
        let status = self.client.status().await?;
        let (app, app_status) = status
            .applications
            .iter()
            .find(|(_, a)| a.charm_name() == self.config.database_charm)
            .ok_or_else(|| {
                JujuError::NotFound(format!("application for charm {}", self.config.database_charm))
            })?;

        let leader = app_status
            .leader_unit()
            .ok_or_else(|| JujuError::NotFound(format!("leader unit of {}", app)))?;
        Ok((app.clone(), leader.to_string()))
    }

    /// Run the backup and return the path of the local copy
    pub async fn backup(&self) -> Result<PathBuf, UpgradeError> {
        let (app, leader) = self.database_leader().await?;
        let basedir = &self.config.basedir;

        info!("mysqldump {} databases on {} ...", app, leader);
        let params = BTreeMap::from([("basedir".to_string(), basedir.clone())]);
        let action = self.client.run_action(&leader, DUMP_ACTION, &params).await?;
        let remote_file = action
            .result_str(DUMP_RESULT_KEY)
            .ok_or_else(|| JujuError::Parse(format!("{} result has no {}", DUMP_ACTION, DUMP_RESULT_KEY)))?
            .to_string();

        info!("Set permissions to read {}:{} ...", app, basedir);
        self.client
            .run_command(&leader, &format!("chmod o+rx {}", basedir))
            .await?;

        let file_name = Path::new(&remote_file)
            .file_name()
            .ok_or_else(|| JujuError::Parse(format!("invalid dump path {}", remote_file)))?;
        let local_file = self.config.local_dir.join(file_name);
        info!("SCP from {}:{} to {} ...", leader, remote_file, local_file.display());
        let copied = self.client.scp_from_unit(&leader, &remote_file, &local_file).await;

        info!("Remove permissions to read {}:{} ...", app, basedir);
        let revoked = self
            .client
            .run_command(&leader, &format!("chmod o-rx {}", basedir))
            .await;

        if let Err(e) = copied {
            if let Err(revoke_err) = revoked {
                warn!("Failed to remove read permissions on {}: {}", basedir, revoke_err);
            }
            return Err(e.into());
        }
        revoked?;

        Ok(local_file)
    }
}

#[async_trait]
impl StepAction for BackupAction {
    async fn run(&self) -> Result<(), UpgradeError> {
        let local_file = self.backup().await?;
        info!("Database backup saved to {}", local_file.display());
        Ok(())
    }
}
