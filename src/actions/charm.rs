//! Charm channel and origin changes

use crate::core::StepAction;
use crate::error::UpgradeError;
use crate::juju::JujuClient;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Switches the channel an application tracks
pub struct ChannelRefreshAction {
    client: Arc<dyn JujuClient>,
    application: String,
    channel: String,
}

impl ChannelRefreshAction {
    pub fn new(client: Arc<dyn JujuClient>, application: String, channel: String) -> Self {
        Self {
            client,
            application,
            channel,
        }
    }
}

#[async_trait]
impl StepAction for ChannelRefreshAction {
    async fn run(&self) -> Result<(), UpgradeError> {
        info!("Refreshing {} to channel {}", self.application, self.channel);
        self.client
            .refresh_channel(&self.application, &self.channel)
            .await?;
        Ok(())
    }
}

/// Sets the release origin config value of an application
pub struct OriginConfigAction {
    client: Arc<dyn JujuClient>,
    application: String,
    key: String,
    value: String,
}

impl OriginConfigAction {
    pub fn new(client: Arc<dyn JujuClient>, application: String, key: String, value: String) -> Self {
        Self {
            client,
            application,
            key,
            value,
        }
    }
}

#[async_trait]
impl StepAction for OriginConfigAction {
    async fn run(&self) -> Result<(), UpgradeError> {
        info!("Setting {} of {} to {}", self.key, self.application, self.value);
        self.client
            .set_config(&self.application, &self.key, &self.value)
            .await?;
        Ok(())
    }
}
