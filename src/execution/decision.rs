//! Operator decisions taken before each step

use crate::error::UpgradeError;

/// Answer to the "[Continue/abort/skip]" prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Run the step's action, then its sub steps
    Continue,
    /// Stop the whole run
    Abort,
    /// Leave out this step's action but still run its sub steps
    Skip,
}

impl Decision {
    /// Parse operator input; `None` for anything that isn't c, a or s
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "C" | "c" => Some(Decision::Continue),
            "A" | "a" => Some(Decision::Abort),
            "S" | "s" => Some(Decision::Skip),
            _ => None,
        }
    }
}

/// Source of decisions for the execution engine
pub trait Prompter: Send + Sync {
    /// Whether a human answers the prompts
    fn is_interactive(&self) -> bool;

    /// Decide what to do with the step described by `description`
    fn ask(&self, description: &str) -> Result<Decision, UpgradeError>;
}

/// Continues every step without asking
#[derive(Debug, Clone, Copy, Default)]
pub struct Unattended;

impl Prompter for Unattended {
    fn is_interactive(&self) -> bool {
        false
    }

    fn ask(&self, _description: &str) -> Result<Decision, UpgradeError> {
        Ok(Decision::Continue)
    }
}
