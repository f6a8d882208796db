//! Juju transport errors

use thiserror::Error;

/// Error types for Juju operations
#[derive(Debug, Error)]
pub enum JujuError {
    #[error("failed to spawn juju: {0}")]
    Spawn(String),

    #[error("juju command timed out after {0} seconds")]
    Timeout(u64),

    #[error("`juju {command}` exited with code {code}: {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("action {action} on {unit} finished with status {status}")]
    ActionFailed {
        unit: String,
        action: String,
        status: String,
    },

    #[error("failed to parse juju output: {0}")]
    Parse(String),

    #[error("{0} not found")]
    NotFound(String),
}

impl From<serde_json::Error> for JujuError {
    fn from(err: serde_json::Error) -> Self {
        JujuError::Parse(err.to_string())
    }
}
