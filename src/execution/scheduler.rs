//! Execution scheduler - decides whether sub steps may run concurrently

use crate::core::UpgradeStep;

/// Strategy for scheduling sub step execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulingStrategy {
    /// Pre-order, one step at a time, ignoring the `parallel` flag
    #[default]
    Sequential,

    /// Sub steps of a `parallel` step run concurrently in unattended runs
    Parallel,
}

/// Scheduler for sub step execution
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutionScheduler {
    strategy: SchedulingStrategy,
}

impl ExecutionScheduler {
    pub fn new(strategy: SchedulingStrategy) -> Self {
        Self { strategy }
    }

    /// Whether the sub steps of `step` run concurrently. Prompts are never
    /// interleaved, so interactive runs are always sequential.
    pub fn runs_concurrently(&self, step: &UpgradeStep, interactive: bool) -> bool {
        self.strategy == SchedulingStrategy::Parallel
            && step.parallel
            && !interactive
            && step.sub_steps.len() > 1
    }
}
