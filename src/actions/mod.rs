//! Concrete step actions run against the model

pub mod backup;
pub mod charm;

pub use backup::BackupAction;
pub use charm::{ChannelRefreshAction, OriginConfigAction};
