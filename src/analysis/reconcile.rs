//! Decide which units, charms, channels and origins must change next

use crate::analysis::observe::Observations;
use crate::core::release::OpenStackRelease;
use crate::error::UpgradeError;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

pub type ReleaseTargets = BTreeMap<OpenStackRelease, BTreeSet<String>>;
pub type ValueTargets = BTreeMap<String, BTreeSet<String>>;

/// Outcome of comparing the observed releases
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Next release -> units lagging behind the rest of their application
    pub upgrade_units: ReleaseTargets,

    /// Next release -> applications to upgrade
    pub upgrade_charms: ReleaseTargets,

    /// `<release>/stable` -> applications tracking another channel
    pub change_channel: ValueTargets,

    /// Expected origin value -> applications configured otherwise
    pub change_openstack_release: ValueTargets,
}

impl Reconciliation {
    /// The four results in order: units, charms, channels, origins
    pub fn into_parts(self) -> (ReleaseTargets, ReleaseTargets, ValueTargets, ValueTargets) {
        (
            self.upgrade_units,
            self.upgrade_charms,
            self.change_channel,
            self.change_openstack_release,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.upgrade_units.is_empty()
            && self.upgrade_charms.is_empty()
            && self.change_channel.is_empty()
            && self.change_openstack_release.is_empty()
    }
}

/// Check the consistency of OpenStack releases across the deployment
pub fn check_os_versions(
    observations: &Observations,
    series: &str,
) -> Result<Reconciliation, UpgradeError> {
    let mut result = Reconciliation::default();
    let mut versions: BTreeMap<OpenStackRelease, BTreeSet<&str>> = BTreeMap::new();

    for (app, observation) in observations {
        for release in observation.versions.keys() {
            versions.entry(*release).or_default().insert(app.as_str());
        }

        if observation.versions.len() > 1 {
            warn!("Units of {} are not in the same OpenStack release", app);
            let lagging = observation.versions.len() - 1;
            for (release, units) in observation.versions.iter().take(lagging) {
                let next = release.next()?;
                warn!("Upgrade units {:?} from {} to {}", units, release, next);
                result
                    .upgrade_units
                    .entry(next)
                    .or_default()
                    .extend(units.iter().cloned());
            }
        }
    }

    let (current, highest) = match (versions.keys().next(), versions.keys().next_back()) {
        (Some(lowest), Some(highest)) => (*lowest, *highest),
        _ => {
            info!("No OpenStack applications found, nothing to reconcile");
            return Ok(result);
        }
    };

    if versions.len() > 1 {
        warn!("Charms are not in the same OpenStack release");
        for (app, observation) in observations {
            let Some(lowest) = observation.lowest_release() else {
                continue;
            };
            if lowest < highest {
                let next = lowest.next()?;
                warn!("Upgrade charm {} from {} to {}", app, lowest, next);
                result
                    .upgrade_charms
                    .entry(next)
                    .or_default()
                    .insert(app.clone());
            }
        }
        return Ok(result);
    }

    let next = current.next()?;
    info!(
        "Charms are in the same OpenStack release and can be upgraded from {} to {}",
        current, next
    );
    result
        .upgrade_charms
        .entry(next)
        .or_default()
        .extend(observations.keys().cloned());

    let channel = current.stable_channel();
    let expected_origin = current.expected_origin(series);
    for (app, observation) in observations {
        if !observation.channel.contains(current.name()) {
            warn!("{} needs to track the channel {}", app, channel);
            result
                .change_channel
                .entry(channel.clone())
                .or_default()
                .insert(app.clone());
        }

        if observation.origin != expected_origin {
            warn!("{} needs openstack-origin or source set to {}", app, expected_origin);
            result
                .change_openstack_release
                .entry(expected_origin.clone())
                .or_default()
                .insert(app.clone());
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::observe::AppObservation;

    fn release(name: &str) -> OpenStackRelease {
        OpenStackRelease::parse(name).unwrap()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn app(versions: Vec<(&str, Vec<&str>)>, channel: &str, origin: &str) -> AppObservation {
        AppObservation {
            charm: "keystone".to_string(),
            versions: versions
                .into_iter()
                .map(|(r, units)| (release(r), set(&units)))
                .collect(),
            channel: channel.to_string(),
            origin_key: Some("openstack-origin".to_string()),
            origin: origin.to_string(),
        }
    }

    #[test]
    fn test_consistent_deployment() {
        let mut observations = Observations::new();
        observations.insert(
            "keystone".to_string(),
            app(vec![("ussuri", vec!["keystone/0", "keystone/1", "keystone/2"])], "ussuri/stable", "distro"),
        );
        observations.insert(
            "cinder".to_string(),
            app(vec![("ussuri", vec!["cinder/0"])], "ussuri/stable", "distro"),
        );

        let (units, charms, channels, origins) =
            check_os_versions(&observations, "focal").unwrap().into_parts();

        assert!(units.is_empty());
        assert!(channels.is_empty());
        assert!(origins.is_empty());
        assert_eq!(charms.len(), 1);
        assert_eq!(charms[&release("victoria")], set(&["keystone", "cinder"]));
    }

    #[test]
    fn test_upgrade_lagging_units() {
        let mut observations = Observations::new();
        observations.insert(
            "keystone".to_string(),
            app(
                vec![("ussuri", vec!["keystone/1", "keystone/2"]), ("victoria", vec!["keystone/0"])],
                "victoria/stable",
                "cloud:focal-victoria",
            ),
        );

        let result = check_os_versions(&observations, "focal").unwrap();
        let mut expected = ReleaseTargets::new();
        expected.insert(release("victoria"), set(&["keystone/1", "keystone/2"]));
        assert_eq!(result.upgrade_units, expected);
    }

    #[test]
    fn test_upgrade_lagging_charms() {
        let mut observations = Observations::new();
        observations.insert(
            "keystone".to_string(),
            app(vec![("victoria", vec!["keystone/0"])], "victoria/stable", "cloud:focal-victoria"),
        );
        observations.insert(
            "glance".to_string(),
            app(vec![("victoria", vec!["glance/0"])], "victoria/stable", "cloud:focal-victoria"),
        );
        observations.insert(
            "cinder".to_string(),
            app(vec![("ussuri", vec!["cinder/0"])], "ussuri/stable", "distro"),
        );

        let (_, charms, channels, origins) =
            check_os_versions(&observations, "focal").unwrap().into_parts();

        let mut expected = ReleaseTargets::new();
        expected.insert(release("victoria"), set(&["cinder"]));
        assert_eq!(charms, expected);
        assert!(channels.is_empty());
        assert!(origins.is_empty());
    }

    #[test]
    fn test_mixed_app_is_keyed_once() {
        let mut observations = Observations::new();
        observations.insert(
            "keystone".to_string(),
            app(vec![("ussuri", vec!["keystone/0"]), ("victoria", vec!["keystone/1"])], "", ""),
        );
        observations.insert(
            "cinder".to_string(),
            app(vec![("wallaby", vec!["cinder/0"])], "", ""),
        );

        let result = check_os_versions(&observations, "focal").unwrap();
        let mut expected = ReleaseTargets::new();
        expected.insert(release("victoria"), set(&["keystone"]));
        assert_eq!(result.upgrade_charms, expected);
    }

    #[test]
    fn test_change_channel() {
        let mut observations = Observations::new();
        observations.insert(
            "keystone".to_string(),
            app(vec![("victoria", vec!["keystone/0"])], "ussuri/stable", "cloud:focal-victoria"),
        );

        let result = check_os_versions(&observations, "focal").unwrap();
        let mut expected = ValueTargets::new();
        expected.insert("victoria/stable".to_string(), set(&["keystone"]));
        assert_eq!(result.change_channel, expected);
        assert!(result.change_openstack_release.is_empty());
    }

    #[test]
    fn test_change_origin_to_cloud_archive() {
        let mut observations = Observations::new();
        observations.insert(
            "keystone".to_string(),
            app(vec![("victoria", vec!["keystone/0"])], "ussuri/stable", "distro"),
        );

        let result = check_os_versions(&observations, "focal").unwrap();
        let mut expected = ValueTargets::new();
        expected.insert("cloud:focal-victoria".to_string(), set(&["keystone"]));
        assert_eq!(result.change_openstack_release, expected);
    }

    #[test]
    fn test_change_origin_to_distro() {
        let mut observations = Observations::new();
        observations.insert(
            "keystone".to_string(),
            app(vec![("ussuri", vec!["keystone/0"])], "ussuri/stable", "cloud:focal-ussuri"),
        );

        let result = check_os_versions(&observations, "focal").unwrap();
        let mut expected = ValueTargets::new();
        expected.insert("distro".to_string(), set(&["keystone"]));
        assert_eq!(result.change_openstack_release, expected);
    }

    #[test]
    fn test_missing_origin_needs_change() {
        let mut observations = Observations::new();
        let mut observation = app(vec![("ussuri", vec!["keystone/0"])], "ussuri/stable", "");
        observation.origin_key = None;
        observations.insert("keystone".to_string(), observation);

        let result = check_os_versions(&observations, "focal").unwrap();
        assert_eq!(result.change_openstack_release["distro"], set(&["keystone"]));
    }

    #[test]
    fn test_empty_observations() {
        let result = check_os_versions(&Observations::new(), "focal").unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_single_release_without_successor() {
        let mut observations = Observations::new();
        observations.insert(
            "keystone".to_string(),
            app(vec![("caracal", vec!["keystone/0"])], "caracal/stable", "distro"),
        );

        let result = check_os_versions(&observations, "noble");
        assert!(matches!(result, Err(UpgradeError::UnknownRelease(_))));
    }
}
