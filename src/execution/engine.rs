//! Main execution engine - walks the upgrade plan

use crate::{
    core::{StepAction, UpgradeStep},
    error::UpgradeError,
    execution::{Decision, ExecutionScheduler, Prompter, SchedulingStrategy},
};
use chrono::{DateTime, Utc};
use futures::future::{try_join_all, BoxFuture, FutureExt};
use std::ops::AddAssign;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Events that can occur during plan execution
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    PlanStarted {
        execution_id: Uuid,
        total_steps: usize,
    },
    StepStarted {
        description: String,
        depth: usize,
    },
    StepCompleted {
        description: String,
    },
    StepSkipped {
        description: String,
    },
    StepFailed {
        description: String,
        error: String,
    },
    PlanAborted {
        execution_id: Uuid,
        description: String,
    },
    PlanCompleted {
        execution_id: Uuid,
        executed: usize,
        skipped: usize,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(ExecutionEvent) + Send + Sync>;

/// Summary of a finished run
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    pub execution_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// Actions that ran
    pub executed: usize,
    /// Steps the operator skipped
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, Default)]
struct StepTally {
    executed: usize,
    skipped: usize,
}

impl AddAssign for StepTally {
    fn add_assign(&mut self, other: Self) {
        self.executed += other.executed;
        self.skipped += other.skipped;
    }
}

/// Runs an upgrade plan, asking the prompter before every step
pub struct ExecutionEngine<P> {
    prompter: P,
    scheduler: ExecutionScheduler,
    event_handlers: Vec<EventHandler>,
}

impl<P: Prompter> ExecutionEngine<P> {
    pub fn new(prompter: P, strategy: SchedulingStrategy) -> Self {
        Self {
            prompter,
            scheduler: ExecutionScheduler::new(strategy),
            event_handlers: Vec::new(),
        }
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(ExecutionEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    /// Emit an event to all handlers
    fn emit_event(&self, event: ExecutionEvent) {
        for handler in &self.event_handlers {
            handler(event.clone());
        }
    }

    /// Execute the plan depth-first, pre-order. An abort or a failing action
    /// stops the run immediately.
    pub async fn execute(&self, plan: &UpgradeStep) -> Result<ExecutionReport, UpgradeError> {
        let execution_id = Uuid::new_v4();
        let started_at = Utc::now();

        info!("Starting upgrade plan execution ({})", execution_id);
        self.emit_event(ExecutionEvent::PlanStarted {
            execution_id,
            total_steps: plan.len(),
        });

        let tally = match self.apply_step(plan, 0).await {
            Ok(tally) => tally,
            Err(UpgradeError::UserAbort) => {
                self.emit_event(ExecutionEvent::PlanAborted {
                    execution_id,
                    description: plan.description.clone(),
                });
                return Err(UpgradeError::UserAbort);
            }
            Err(e) => return Err(e),
        };

        info!(
            "Upgrade plan finished: {} actions executed, {} steps skipped",
            tally.executed, tally.skipped
        );
        self.emit_event(ExecutionEvent::PlanCompleted {
            execution_id,
            executed: tally.executed,
            skipped: tally.skipped,
        });

        Ok(ExecutionReport {
            execution_id,
            started_at,
            completed_at: Utc::now(),
            executed: tally.executed,
            skipped: tally.skipped,
        })
    }

    /// Apply a step, then its sub steps. Skip leaves out only this step's action.
    fn apply_step<'a>(
        &'a self,
        step: &'a UpgradeStep,
        depth: usize,
    ) -> BoxFuture<'a, Result<StepTally, UpgradeError>> {
        async move {
            let mut tally = StepTally::default();

            match self.prompter.ask(&step.description)? {
                Decision::Continue => {
                    if let Some(action) = &step.action {
                        self.run_action(step, action.as_ref(), depth).await?;
                        tally.executed += 1;
                    }
                }
                Decision::Abort => {
                    warn!("Aborted at step: {}", step.description);
                    return Err(UpgradeError::UserAbort);
                }
                Decision::Skip => {
                    info!("Skipping step: {}", step.description);
                    self.emit_event(ExecutionEvent::StepSkipped {
                        description: step.description.clone(),
                    });
                    tally.skipped += 1;
                }
            }

            if self
                .scheduler
                .runs_concurrently(step, self.prompter.is_interactive())
            {
                let sub_steps = step
                    .sub_steps
                    .iter()
                    .map(|sub_step| self.apply_step(sub_step, depth + 1));
                for sub_tally in try_join_all(sub_steps).await? {
                    tally += sub_tally;
                }
            } else {
                for sub_step in &step.sub_steps {
                    tally += self.apply_step(sub_step, depth + 1).await?;
                }
            }

            Ok(tally)
        }
        .boxed()
    }

    async fn run_action(
        &self,
        step: &UpgradeStep,
        action: &dyn StepAction,
        depth: usize,
    ) -> Result<(), UpgradeError> {
        info!("Running step: {}", step.description);
        self.emit_event(ExecutionEvent::StepStarted {
            description: step.description.clone(),
            depth,
        });

        match action.run().await {
            Ok(()) => {
                self.emit_event(ExecutionEvent::StepCompleted {
                    description: step.description.clone(),
                });
                Ok(())
            }
            Err(e) => {
                error!("Step '{}' failed: {}", step.description, e);
                self.emit_event(ExecutionEvent::StepFailed {
                    description: step.description.clone(),
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }
}

/// Render the plan one line per step, indented by one tab per level
pub fn dump_plan(plan: &UpgradeStep) -> String {
    plan.walk()
        .into_iter()
        .map(|(depth, step)| format!("{}{}\n", "\t".repeat(depth), step.description))
        .collect()
}
