//! Analysis of the deployment before planning

pub mod observe;
pub mod reconcile;

pub use observe::{extract_os_versions, AppObservation, Observations};
pub use reconcile::{check_os_versions, Reconciliation};

use crate::error::UpgradeError;
use crate::juju::JujuClient;

/// Observe the live model and reconcile its releases
pub async fn analyze(
    client: &dyn JujuClient,
    series: &str,
) -> Result<(Observations, Reconciliation), UpgradeError> {
    let observations = extract_os_versions(client).await?;
    let reconciliation = check_os_versions(&observations, series)?;
    Ok((observations, reconciliation))
}
