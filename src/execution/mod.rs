//! Upgrade plan execution

pub mod decision;
pub mod engine;
pub mod scheduler;

pub use decision::{Decision, Prompter, Unattended};
pub use engine::{dump_plan, ExecutionEngine, ExecutionEvent, ExecutionReport};
pub use scheduler::{ExecutionScheduler, SchedulingStrategy};
