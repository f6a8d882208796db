//! Upgrade step tree

use crate::error::UpgradeError;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// A deferred operation attached to a step; carries its own parameters
#[async_trait]
pub trait StepAction: Send + Sync {
    async fn run(&self) -> Result<(), UpgradeError>;
}

/// A node in the upgrade plan
#[derive(Clone)]
pub struct UpgradeStep {
    /// Human-readable text shown to the operator
    pub description: String,

    /// Whether the sub steps may run concurrently with each other
    pub parallel: bool,

    /// Operation to run when the operator continues; `None` for grouping nodes
    pub action: Option<Arc<dyn StepAction>>,

    /// Ordered child steps
    pub sub_steps: Vec<UpgradeStep>,
}

impl UpgradeStep {
    pub fn new(
        description: impl Into<String>,
        parallel: bool,
        action: Option<Arc<dyn StepAction>>,
    ) -> Self {
        Self {
            description: description.into(),
            parallel,
            action,
            sub_steps: Vec::new(),
        }
    }

    /// A step without an action that only groups sub steps
    pub fn group(description: impl Into<String>, parallel: bool) -> Self {
        Self::new(description, parallel, None)
    }

    pub fn add_step(&mut self, step: UpgradeStep) {
        self.sub_steps.push(step);
    }

    /// Number of nodes in this tree, including self
    pub fn len(&self) -> usize {
        1 + self.sub_steps.iter().map(UpgradeStep::len).sum::<usize>()
    }

    /// Nodes in pre-order, paired with their depth
    pub fn walk(&self) -> Vec<(usize, &UpgradeStep)> {
        let mut nodes = Vec::with_capacity(self.len());
        self.collect(0, &mut nodes);
        nodes
    }

    fn collect<'a>(&'a self, depth: usize, nodes: &mut Vec<(usize, &'a UpgradeStep)>) {
        nodes.push((depth, self));
        for sub_step in &self.sub_steps {
            sub_step.collect(depth + 1, nodes);
        }
    }
}

impl fmt::Debug for UpgradeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpgradeStep")
            .field("description", &self.description)
            .field("parallel", &self.parallel)
            .field("action", &self.action.as_ref().map(|_| "<action>"))
            .field("sub_steps", &self.sub_steps)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    #[async_trait]
    impl StepAction for Noop {
        async fn run(&self) -> Result<(), UpgradeError> {
            Ok(())
        }
    }

    fn sample_tree() -> UpgradeStep {
        let mut root = UpgradeStep::group("Top level plan", false);
        let mut group = UpgradeStep::group("Change charm channels", true);
        group.add_step(UpgradeStep::new("Refresh keystone", false, Some(Arc::new(Noop))));
        group.add_step(UpgradeStep::new("Refresh cinder", false, Some(Arc::new(Noop))));
        root.add_step(UpgradeStep::new("Backup mysql databases", false, Some(Arc::new(Noop))));
        root.add_step(group);
        root
    }

    #[test]
    fn test_add_step_keeps_order() {
        let root = sample_tree();
        let names: Vec<_> = root.sub_steps.iter().map(|s| s.description.as_str()).collect();
        assert_eq!(names, vec!["Backup mysql databases", "Change charm channels"]);
        assert!(root.action.is_none());
    }

    #[test]
    fn test_walk_is_pre_order_with_depth() {
        let root = sample_tree();
        let walked: Vec<_> = root
            .walk()
            .into_iter()
            .map(|(depth, s)| (depth, s.description.clone()))
            .collect();

        assert_eq!(
            walked,
            vec![
                (0, "Top level plan".to_string()),
                (1, "Backup mysql databases".to_string()),
                (1, "Change charm channels".to_string()),
                (2, "Refresh keystone".to_string()),
                (2, "Refresh cinder".to_string()),
            ]
        );
        assert_eq!(root.len(), 5);
    }
}
