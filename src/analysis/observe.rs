//! Collect per-application release observations from the live model

use crate::core::release::{is_openstack_charm, release_from_workload_version, OpenStackRelease};
use crate::error::UpgradeError;
use crate::juju::{ApplicationStatus, JujuClient};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// What was observed about one OpenStack application
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppObservation {
    /// Bare charm name
    pub charm: String,

    /// Release -> units running it
    pub versions: BTreeMap<OpenStackRelease, BTreeSet<String>>,

    /// Channel the charm tracks (empty when unknown)
    pub channel: String,

    /// Config key carrying the origin, when one is set
    pub origin_key: Option<String>,

    /// Origin config value (empty when unset)
    pub origin: String,
}

impl AppObservation {
    /// Lowest release any unit runs
    pub fn lowest_release(&self) -> Option<OpenStackRelease> {
        self.versions.keys().next().copied()
    }
}

/// Application name -> observation
pub type Observations = BTreeMap<String, AppObservation>;

/// Query status and config for every OpenStack application in the model
pub async fn extract_os_versions(client: &dyn JujuClient) -> Result<Observations, UpgradeError> {
    info!("Analyzing the OpenStack release in the deployment...");
    let status = client.status().await?;
    let mut observations = Observations::new();

    for (app, app_status) in &status.applications {
        let charm = app_status.charm_name();
        if !is_openstack_charm(&charm) {
            debug!("Skipping {} ({}): not an OpenStack charm", app, charm);
            continue;
        }

        let versions = unit_releases(app, &charm, app_status);
        if versions.is_empty() {
            warn!("No OpenStack release could be determined for {}", app);
            continue;
        }

        let (origin_key, origin) = extract_os_charm_config(client, app).await?;
        observations.insert(
            app.clone(),
            AppObservation {
                charm,
                versions,
                channel: app_status.charm_channel.clone().unwrap_or_default(),
                origin_key,
                origin,
            },
        );
    }

    debug!("Observed releases: {:?}", observations);
    Ok(observations)
}

/// Group an application's units by the release their workload version maps to
fn unit_releases(
    app: &str,
    charm: &str,
    app_status: &ApplicationStatus,
) -> BTreeMap<OpenStackRelease, BTreeSet<String>> {
    let mut versions: BTreeMap<OpenStackRelease, BTreeSet<String>> = BTreeMap::new();

    for unit in app_status.units.keys() {
        let version = app_status.unit_version(unit);
        match version.and_then(|v| release_from_workload_version(charm, v)) {
            Some(release) => {
                versions.entry(release).or_default().insert(unit.clone());
            }
            None => warn!(
                "Unit {} of {} reports unrecognised workload version {:?}",
                unit, app, version
            ),
        }
    }

    versions
}

/// Origin config of an application as `(key, value)`; missing origin is
/// logged and reported as an empty value
pub async fn extract_os_charm_config(
    client: &dyn JujuClient,
    app: &str,
) -> Result<(Option<String>, String), UpgradeError> {
    let config = client.application_config(app).await?;
    match config.origin() {
        Some((key, value)) => Ok((Some(key.to_string()), value)),
        None => {
            warn!("Failed to get origin for {}, no origin config found", app);
            Ok((None, String::new()))
        }
    }
}
