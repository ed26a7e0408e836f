//! Control-split tracking.
//!
//! A control split is a point where flow diverges and later rejoins: a loop
//! body, or a try block together with its label blocks. Every variable
//! mutated inside a split may hold a path-dependent value at the join, so
//! the pass records those variables for the backend.
//!
//! Splits nest. A mutation is added to every split that is active at the
//! time, not just the innermost one.

use indexmap::{IndexMap, IndexSet};
use tern_core::{NodeId, VariableId};
use tern_registry::SpecializationKey;

/// Variables mutated inside one split, in first-mutation order.
pub type ChangedVariables = IndexSet<VariableId>;

/// Stack of mutation sets for the splits currently being visited.
#[derive(Debug, Default)]
pub struct ControlSplitTracker {
    stack: Vec<ChangedVariables>,
}

impl ControlSplitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a split.
    pub fn push(&mut self) {
        self.stack.push(ChangedVariables::default());
    }

    /// Leave the innermost split, returning what changed inside it.
    pub fn pop(&mut self) -> ChangedVariables {
        self.stack.pop().unwrap_or_default()
    }

    /// Record a mutation in every active split.
    pub fn mark_modified(&mut self, variable: VariableId) {
        for changed in &mut self.stack {
            changed.insert(variable);
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_active(&self) -> bool {
        !self.stack.is_empty()
    }
}

/// Identity of one split instance: the split's syntax node under the
/// specialization being visited (`None` outside generics).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControlSplitKey {
    pub node: NodeId,
    pub specialization: Option<SpecializationKey>,
}

/// Changed-variable records for every split visited by the pass.
#[derive(Debug, Default, Clone)]
pub struct ControlSplits {
    records: IndexMap<ControlSplitKey, ChangedVariables>,
}

impl ControlSplits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the variables changed in one split instance, merging with any
    /// earlier record for the same instance.
    pub fn record(&mut self, key: ControlSplitKey, changed: ChangedVariables) {
        self.records.entry(key).or_default().extend(changed);
    }

    pub fn get(
        &self,
        node: NodeId,
        specialization: Option<&SpecializationKey>,
    ) -> Option<&ChangedVariables> {
        self.records.get(&ControlSplitKey {
            node,
            specialization: specialization.cloned(),
        })
    }

    /// Whether a variable was recorded as changed in a split instance.
    pub fn contains(
        &self,
        node: NodeId,
        specialization: Option<&SpecializationKey>,
        variable: VariableId,
    ) -> bool {
        self.get(node, specialization)
            .is_some_and(|changed| changed.contains(&variable))
    }

    /// Records in the order the splits were left.
    pub fn iter(&self) -> impl Iterator<Item = (&ControlSplitKey, &ChangedVariables)> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tern_core::{GenericId, TypeHash};

    #[test]
    fn mutation_escapes_to_enclosing_splits() {
        let mut tracker = ControlSplitTracker::new();
        let outer_only = VariableId::new(0);
        let both = VariableId::new(1);

        tracker.push();
        tracker.mark_modified(outer_only);
        tracker.push();
        tracker.mark_modified(both);
        let inner = tracker.pop();
        let outer = tracker.pop();

        assert_eq!(inner.iter().copied().collect::<Vec<_>>(), vec![both]);
        assert_eq!(outer.iter().copied().collect::<Vec<_>>(), vec![outer_only, both]);
        assert!(!tracker.is_active());
    }

    #[test]
    fn mutations_outside_splits_are_dropped() {
        let mut tracker = ControlSplitTracker::new();
        tracker.mark_modified(VariableId::new(3));
        tracker.push();
        assert!(tracker.pop().is_empty());
    }

    #[test]
    fn pop_on_empty_stack_is_empty() {
        let mut tracker = ControlSplitTracker::new();
        assert!(tracker.pop().is_empty());
        assert_eq!(tracker.depth(), 0);
    }

    #[test]
    fn records_are_keyed_per_specialization() {
        let mut splits = ControlSplits::new();
        let node = NodeId::new(5);
        let key = SpecializationKey::new(GenericId::new(0), vec![TypeHash::from_name("Smi")]);
        let x = VariableId::new(0);
        let y = VariableId::new(1);

        splits.record(
            ControlSplitKey {
                node,
                specialization: None,
            },
            [x].into_iter().collect(),
        );
        splits.record(
            ControlSplitKey {
                node,
                specialization: Some(key.clone()),
            },
            [y].into_iter().collect(),
        );

        assert!(splits.contains(node, None, x));
        assert!(!splits.contains(node, None, y));
        assert!(splits.contains(node, Some(&key), y));
        assert_eq!(splits.len(), 2);
    }
}
