//! OpenStack release catalogue
//!
//! Releases are ordered by their position in [`OPENSTACK_RELEASES`], never
//! lexically, so `OpenStackRelease` can key sorted maps directly.

use crate::error::UpgradeError;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Known release codenames, oldest first
pub const OPENSTACK_RELEASES: &[&str] = &[
    "diablo", "essex", "folsom", "grizzly", "havana", "icehouse", "juno", "kilo", "liberty",
    "mitaka", "newton", "ocata", "pike", "queens", "rocky", "stein", "train", "ussuri",
    "victoria", "wallaby", "xena", "yoga", "zed", "antelope", "bobcat", "caracal",
];

/// Ubuntu series and the release each ships in its main archive
const DISTRO_RELEASES: &[(&str, &str)] = &[
    ("xenial", "mitaka"),
    ("bionic", "queens"),
    ("focal", "ussuri"),
    ("jammy", "yoga"),
    ("noble", "caracal"),
];

/// Workload version prefixes per charm, from ussuri onwards. A prefix is a
/// major version, or `major.minor` where several releases share a major.
/// When one version ships in several releases the oldest is listed.
const CHARM_VERSIONS: &[(&str, &[(&str, &str)])] = &[
    ("aodh", &MAJOR_10),
    ("barbican", &MAJOR_10),
    ("ceilometer", &MAJOR_14),
    ("cinder", &MAJOR_16),
    ("designate", &MAJOR_10),
    ("glance", &MAJOR_20),
    (
        "gnocchi",
        &[("4.3", "ussuri"), ("4.4", "wallaby"), ("4.5", "antelope"), ("4.6", "bobcat")],
    ),
    ("heat", &MAJOR_14),
    ("keystone", &MAJOR_17),
    ("manila", &MAJOR_10),
    ("neutron-api", &MAJOR_16),
    ("neutron-gateway", &MAJOR_16),
    ("nova-cloud-controller", &MAJOR_21),
    ("nova-compute", &MAJOR_21),
    ("octavia", &MAJOR_6),
    (
        "openstack-dashboard",
        &[
            ("18.3", "ussuri"),
            ("18.6", "victoria"),
            ("19", "wallaby"),
            ("20", "xena"),
            ("22", "yoga"),
            ("23.0", "zed"),
            ("23.1", "antelope"),
            ("23.3", "bobcat"),
            ("24", "caracal"),
        ],
    ),
    ("placement", &MAJOR_3),
    ("swift-proxy", &SWIFT),
    ("swift-storage", &SWIFT),
];

const MAJOR_3: [(&str, &str); 9] = by_major(["3", "4", "5", "6", "7", "8", "9", "10", "11"]);
const MAJOR_6: [(&str, &str); 9] = by_major(["6", "7", "8", "9", "10", "11", "12", "13", "14"]);
const MAJOR_10: [(&str, &str); 9] = by_major(["10", "11", "12", "13", "14", "15", "16", "17", "18"]);
const MAJOR_14: [(&str, &str); 9] = by_major(["14", "15", "16", "17", "18", "19", "20", "21", "22"]);
const MAJOR_16: [(&str, &str); 9] = by_major(["16", "17", "18", "19", "20", "21", "22", "23", "24"]);
const MAJOR_17: [(&str, &str); 9] = by_major(["17", "18", "19", "20", "21", "22", "23", "24", "25"]);
const MAJOR_20: [(&str, &str); 9] = by_major(["20", "21", "22", "23", "24", "25", "26", "27", "28"]);
const MAJOR_21: [(&str, &str); 9] = by_major(["21", "22", "23", "24", "25", "26", "27", "28", "29"]);
const SWIFT: [(&str, &str); 9] =
    by_major(["2.25", "2.26", "2.27", "2.28", "2.29", "2.30", "2.31", "2.32", "2.33"]);

/// Pair prefixes with the releases ussuri through caracal
const fn by_major(prefixes: [&'static str; 9]) -> [(&'static str, &'static str); 9] {
    const FROM_USSURI: [&str; 9] = [
        "ussuri", "victoria", "wallaby", "xena", "yoga", "zed", "antelope", "bobcat", "caracal",
    ];
    let mut table = [("", ""); 9];
    let mut i = 0;
    while i < 9 {
        table[i] = (prefixes[i], FROM_USSURI[i]);
        i += 1;
    }
    table
}

/// A release codename with a total order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OpenStackRelease(usize);

impl OpenStackRelease {
    /// Look up a codename
    pub fn parse(name: &str) -> Result<Self, UpgradeError> {
        OPENSTACK_RELEASES
            .iter()
            .position(|r| r.eq_ignore_ascii_case(name))
            .map(OpenStackRelease)
            .ok_or_else(|| UpgradeError::UnknownRelease(name.to_string()))
    }

    pub fn name(&self) -> &'static str {
        OPENSTACK_RELEASES[self.0]
    }

    /// The release that follows this one
    pub fn next(&self) -> Result<Self, UpgradeError> {
        if self.0 + 1 < OPENSTACK_RELEASES.len() {
            Ok(OpenStackRelease(self.0 + 1))
        } else {
            Err(UpgradeError::UnknownRelease(format!(
                "no release is known after {}",
                self.name()
            )))
        }
    }

    /// Release shipped by a series' main archive
    pub fn distro_for_series(series: &str) -> Option<Self> {
        DISTRO_RELEASES
            .iter()
            .find(|(s, _)| *s == series)
            .and_then(|(_, release)| Self::parse(release).ok())
    }

    /// Origin config value a charm on this release is expected to carry
    pub fn expected_origin(&self, series: &str) -> String {
        if Self::distro_for_series(series) == Some(*self) {
            "distro".to_string()
        } else {
            format!("cloud:{}-{}", series, self.name())
        }
    }

    /// Channel tracking this release
    pub fn stable_channel(&self) -> String {
        format!("{}/stable", self.name())
    }
}

impl fmt::Display for OpenStackRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OpenStackRelease {
    type Err = UpgradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Whether a charm is one whose workload version maps to a release
pub fn is_openstack_charm(charm: &str) -> bool {
    CHARM_VERSIONS.iter().any(|(c, _)| *c == charm)
}

/// Map a charm's workload version (e.g. `17.0.1`) to its release.
/// A `major.minor` prefix wins over a bare major.
pub fn release_from_workload_version(charm: &str, version: &str) -> Option<OpenStackRelease> {
    static VERSION: OnceLock<Regex> = OnceLock::new();
    let version_re =
        VERSION.get_or_init(|| Regex::new(r"^\s*(\d+)(?:\.(\d+))?").expect("valid regex"));

    let (_, prefixes) = CHARM_VERSIONS.iter().find(|(c, _)| *c == charm)?;
    let captures = version_re.captures(version)?;
    let major = captures.get(1)?.as_str();
    let major_minor = captures.get(2).map(|minor| format!("{}.{}", major, minor.as_str()));

    let lookup = |prefix: &str| {
        prefixes
            .iter()
            .find(|(p, _)| *p == prefix)
            .and_then(|(_, release)| OpenStackRelease::parse(release).ok())
    };
    major_minor.as_deref().and_then(lookup).or_else(|| lookup(major))
}
