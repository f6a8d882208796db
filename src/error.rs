//! Error types shared across the upgrader

use crate::juju::JujuError;
use thiserror::Error;

/// Errors that terminate an upgrade run
#[derive(Debug, Error)]
pub enum UpgradeError {
    /// Invalid log level, unreadable or inconsistent config file
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Release codename is unknown or has no successor
    #[error("Unknown OpenStack release: {0}")]
    UnknownRelease(String),

    /// Failure reported by the Juju collaborator
    #[error(transparent)]
    Transport(#[from] JujuError),

    /// The operator chose to abort
    #[error("Upgrade aborted by user")]
    UserAbort,
}
