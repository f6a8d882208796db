//! cou - Charmed OpenStack upgrader

pub mod actions;
pub mod analysis;
pub mod cli;
pub mod core;
pub mod error;
pub mod execution;
pub mod juju;

// Re-export commonly used types
pub use analysis::{analyze, check_os_versions, AppObservation, Observations, Reconciliation};
pub use core::{generate_plan, OpenStackRelease, StepAction, UpgradeStep, UpgraderConfig};
pub use error::UpgradeError;
pub use execution::{dump_plan, Decision, ExecutionEngine, ExecutionEvent, Prompter, SchedulingStrategy};
pub use juju::{JujuCli, JujuClient, JujuClientConfig, JujuError};
