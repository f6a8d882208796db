//! Core domain models for the upgrade
//!
//! This module defines the release catalogue, the step tree that
//! represents an upgrade plan, and the configuration the plan is built from.

pub mod config;
pub mod plan;
pub mod release;
pub mod step;

pub use config::UpgraderConfig;
pub use plan::generate_plan;
pub use release::OpenStackRelease;
pub use step::*;
