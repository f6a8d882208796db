//! Upgrade plan generation

use crate::actions::{BackupAction, ChannelRefreshAction, OriginConfigAction};
use crate::analysis::{Observations, Reconciliation};
use crate::core::config::UpgraderConfig;
use crate::core::step::UpgradeStep;
use crate::juju::response::ORIGIN_KEYS;
use crate::juju::JujuClient;
use std::sync::Arc;
use tracing::{info, warn};

/// Build the plan for the analysed deployment
pub fn generate_plan(
    client: Arc<dyn JujuClient>,
    config: &UpgraderConfig,
    observations: &Observations,
    reconciliation: &Reconciliation,
) -> UpgradeStep {
    report_upgrades(reconciliation);

    let mut plan = UpgradeStep::group("Top level plan", false);
    plan.add_step(UpgradeStep::new(
        "Backup mysql databases",
        false,
        Some(Arc::new(BackupAction::new(client.clone(), config.backup.clone()))),
    ));

    if !reconciliation.change_channel.is_empty() {
        let mut channels = UpgradeStep::group("Change charm channels", true);
        for (channel, apps) in &reconciliation.change_channel {
            for app in apps {
                channels.add_step(UpgradeStep::new(
                    format!("Refresh {} to channel {}", app, channel),
                    false,
                    Some(Arc::new(ChannelRefreshAction::new(
                        client.clone(),
                        app.clone(),
                        channel.clone(),
                    ))),
                ));
            }
        }
        plan.add_step(channels);
    }

    if !reconciliation.change_openstack_release.is_empty() {
        let mut origins = UpgradeStep::group("Change OpenStack release configuration", true);
        for (value, apps) in &reconciliation.change_openstack_release {
            for app in apps {
                let key = observations
                    .get(app)
                    .and_then(|o| o.origin_key.clone())
                    .unwrap_or_else(|| ORIGIN_KEYS[0].to_string());
                origins.add_step(UpgradeStep::new(
                    format!("Set {} of {} to {}", key, app, value),
                    false,
                    Some(Arc::new(OriginConfigAction::new(
                        client.clone(),
                        app.clone(),
                        key,
                        value.clone(),
                    ))),
                ));
            }
        }
        plan.add_step(origins);
    }

    plan
}

fn report_upgrades(reconciliation: &Reconciliation) {
    for (release, units) in &reconciliation.upgrade_units {
        warn!("Units to upgrade to {}: {:?}", release, units);
    }
    for (release, apps) in &reconciliation.upgrade_charms {
        info!("Applications to upgrade to {}: {:?}", release, apps);
    }
}
