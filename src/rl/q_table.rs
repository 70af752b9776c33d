use std::collections::HashMap;

use crate::maze::{Action, StateKey};

/// Sparse table of action values keyed by tabular state
///
/// Unseen states read as all zeros.
#[derive(Debug, Clone, Default)]
pub struct ActionValues {
    table: HashMap<StateKey, [f32; Action::COUNT]>,
}

impl ActionValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values of all four actions in a state
    pub fn values(&self, key: &StateKey) -> [f32; Action::COUNT] {
        self.table.get(key).copied().unwrap_or([0.0; Action::COUNT])
    }

    pub fn get(&self, key: &StateKey, action: Action) -> f32 {
        self.values(key)[action.index()]
    }

    pub fn set(&mut self, key: StateKey, action: Action, value: f32) {
        self.table.entry(key).or_insert([0.0; Action::COUNT])[action.index()] = value;
    }

    /// Greedy action; ties go to the lowest action index
    pub fn best_action(&self, key: &StateKey) -> Action {
        let values = self.values(key);
        let mut best = 0;
        for (idx, &value) in values.iter().enumerate().skip(1) {
            if value > values[best] {
                best = idx;
            }
        }
        Action::ALL[best]
    }

    pub fn max_value(&self, key: &StateKey) -> f32 {
        self.values(key)
            .into_iter()
            .fold(f32::NEG_INFINITY, f32::max)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, &[f32; Action::COUNT])> {
        self.table.iter()
    }
}
