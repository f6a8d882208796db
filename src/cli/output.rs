//! CLI output formatting

use crate::analysis::Reconciliation;
use crate::execution::ExecutionEvent;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");
pub static SKIP: Emoji<'_, '_> = Emoji("⏭️  ", "- ");

/// Create a spinner shown while a step action runs
pub fn create_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Format an execution event for display
pub fn format_execution_event(event: &ExecutionEvent) -> String {
    match event {
        ExecutionEvent::PlanStarted {
            execution_id,
            total_steps,
        } => format!(
            "{} Starting upgrade plan ({}) with {} steps",
            ROCKET,
            style(&execution_id.to_string()[..8]).dim(),
            style(total_steps).cyan()
        ),
        ExecutionEvent::StepStarted { description, .. } => {
            format!("{} {}", SPINNER, style(description).cyan())
        }
        ExecutionEvent::StepCompleted { description } => {
            format!("{} {}", CHECK, style(description).green())
        }
        ExecutionEvent::StepSkipped { description } => {
            format!("{} {} {}", SKIP, style(description).dim(), style("(skipped)").dim())
        }
        ExecutionEvent::StepFailed { description, error } => {
            format!("{} {}: {}", CROSS, style(description).red(), style(error).dim())
        }
        ExecutionEvent::PlanAborted {
            execution_id,
            description,
        } => format!(
            "{} Upgrade plan ({}) {} at {}",
            WARN,
            style(&execution_id.to_string()[..8]).dim(),
            style("aborted").yellow(),
            style(description).bold()
        ),
        ExecutionEvent::PlanCompleted {
            execution_id,
            executed,
            skipped,
        } => format!(
            "{} Upgrade plan ({}) {} - {} executed, {} skipped",
            INFO,
            style(&execution_id.to_string()[..8]).dim(),
            style("completed").green(),
            style(executed).cyan(),
            style(skipped).dim()
        ),
    }
}

/// Format the reconciliation results as a short summary
pub fn format_reconciliation(reconciliation: &Reconciliation) -> String {
    if reconciliation.is_empty() {
        return format!("{} No OpenStack applications need changes", INFO);
    }

    let mut lines = Vec::new();
    push_targets(&mut lines, "Upgrade units", &reconciliation.upgrade_units);
    push_targets(&mut lines, "Upgrade charms", &reconciliation.upgrade_charms);
    push_targets(&mut lines, "Change channel", &reconciliation.change_channel);
    push_targets(
        &mut lines,
        "Change openstack-origin/source",
        &reconciliation.change_openstack_release,
    );
    lines.join("\n")
}

fn push_targets<K: Display>(
    lines: &mut Vec<String>,
    title: &str,
    targets: &BTreeMap<K, BTreeSet<String>>,
) {
    for (target, names) in targets {
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        lines.push(format!(
            "{} {} to {}: {}",
            INFO,
            style(title).bold(),
            style(target).cyan(),
            names.join(", ")
        ));
    }
}
