//! First-visit Monte Carlo control
//!
//! The agent only learns at the end of an episode. Walking the episode
//! backwards with `G = γ·G + r`, each `(state, action)` pair takes the return
//! of its first visit, and `Q(s, a)` is the mean of every such return seen so
//! far.

use std::collections::HashMap;

use rand::rngs::StdRng;

use super::agent::{Agent, Algorithm, LossReport, Transition, explore};
use super::q_table::ActionValues;
use super::settings::AlgorithmSettings;
use crate::maze::{Action, MazeState, StateKey};

#[derive(Debug, Clone, Copy, Default)]
struct ReturnStats {
    sum: f64,
    count: u32,
}

pub struct MonteCarloAgent {
    q: ActionValues,
    returns: HashMap<(StateKey, Action), ReturnStats>,
    episode: Vec<(StateKey, Action, f32)>,
    epsilon: f32,
    gamma: f32,
    rng: StdRng,
}

impl MonteCarloAgent {
    pub fn new(epsilon: f32, gamma: f32, rng: StdRng) -> Self {
        Self {
            q: ActionValues::new(),
            returns: HashMap::new(),
            episode: Vec::new(),
            epsilon,
            gamma,
            rng,
        }
    }

    pub fn from_settings(settings: &AlgorithmSettings) -> Self {
        Self::new(settings.epsilon, settings.gamma, settings.rng())
    }

    /// Number of returns averaged into `Q(s, a)`
    pub fn visit_count(&self, key: &StateKey, action: Action) -> u32 {
        self.returns
            .get(&(*key, action))
            .map_or(0, |stats| stats.count)
    }
}

impl Agent for MonteCarloAgent {
    fn algorithm(&self) -> Algorithm {
        Algorithm::MonteCarlo
    }

    fn select_action(&mut self, state: &MazeState) -> Action {
        explore(&mut self.rng, self.epsilon).unwrap_or_else(|| self.q.best_action(&state.key()))
    }

    fn observe(&mut self, transition: &Transition) -> Option<LossReport> {
        self.episode
            .push((transition.state.key(), transition.action, transition.reward));
        None
    }

    fn end_episode(&mut self) {
        if self.episode.is_empty() {
            return;
        }

        let mut first_visit: HashMap<(StateKey, Action), usize> = HashMap::new();
        for (t, &(key, action, _)) in self.episode.iter().enumerate() {
            first_visit.entry((key, action)).or_insert(t);
        }

        let gamma = self.gamma as f64;
        let mut g = 0.0f64;
        for (t, &(key, action, reward)) in self.episode.iter().enumerate().rev() {
            g = gamma * g + reward as f64;
            if first_visit.get(&(key, action)) != Some(&t) {
                continue;
            }
            let stats = self.returns.entry((key, action)).or_default();
            stats.sum += g;
            stats.count += 1;
            self.q
                .set(key, action, (stats.sum / stats.count as f64) as f32);
        }

        self.episode.clear();
    }

    fn state_value(&self, state: &MazeState) -> Option<f32> {
        Some(self.q.max_value(&state.key()))
    }

    fn action_values(&self) -> Option<&ActionValues> {
        Some(&self.q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{Layout, Position};
    use rand::SeedableRng;

    fn state_at(x: i32, y: i32) -> MazeState {
        let mut state = MazeState::from_layout(&Layout::classic());
        state.agent = Position::new(x, y);
        state
    }

    fn transition(from: &MazeState, action: Action, reward: f32, to: &MazeState) -> Transition {
        Transition {
            state: from.clone(),
            action,
            reward,
            next_state: to.clone(),
            terminated: false,
            truncated: false,
        }
    }

    fn greedy_agent(gamma: f32) -> MonteCarloAgent {
        MonteCarloAgent::new(0.0, gamma, StdRng::seed_from_u64(0))
    }

    #[test]
    fn test_no_learning_before_episode_end() {
        let mut agent = greedy_agent(0.9);
        let (a, b) = (state_at(0, 0), state_at(1, 0));
        assert!(agent.observe(&transition(&a, Action::Right, 5.0, &b)).is_none());
        assert!(agent.action_values().unwrap().is_empty());
    }

    #[test]
    fn test_discounted_returns() {
        let mut agent = greedy_agent(0.5);
        let (a, b, c) = (state_at(0, 0), state_at(1, 0), state_at(2, 0));

        agent.observe(&transition(&a, Action::Right, 1.0, &b));
        agent.observe(&transition(&b, Action::Right, 4.0, &c));
        agent.end_episode();

        let q = agent.action_values().unwrap();
        assert_eq!(q.get(&b.key(), Action::Right), 4.0);
        assert_eq!(q.get(&a.key(), Action::Right), 1.0 + 0.5 * 4.0);
    }

    #[test]
    fn test_first_visit_only() {
        let mut agent = greedy_agent(1.0);
        let (a, b) = (state_at(0, 0), state_at(1, 0));

        // a → b → a → b, each pair repeated; only the first visit counts
        agent.observe(&transition(&a, Action::Right, 1.0, &b));
        agent.observe(&transition(&b, Action::Left, 2.0, &a));
        agent.observe(&transition(&a, Action::Right, 3.0, &b));
        agent.observe(&transition(&b, Action::Left, 4.0, &a));
        agent.end_episode();

        let q = agent.action_values().unwrap();
        assert_eq!(q.get(&a.key(), Action::Right), 10.0);
        assert_eq!(q.get(&b.key(), Action::Left), 9.0);
        assert_eq!(agent.visit_count(&a.key(), Action::Right), 1);
    }

    #[test]
    fn test_returns_are_averaged_across_episodes() {
        let mut agent = greedy_agent(1.0);
        let (a, b) = (state_at(0, 0), state_at(1, 0));

        agent.observe(&transition(&a, Action::Right, 10.0, &b));
        agent.end_episode();
        agent.observe(&transition(&a, Action::Right, 20.0, &b));
        agent.end_episode();

        assert_eq!(agent.action_values().unwrap().get(&a.key(), Action::Right), 15.0);
        assert_eq!(agent.visit_count(&a.key(), Action::Right), 2);
    }

    #[test]
    fn test_empty_episode_is_ignored() {
        let mut agent = greedy_agent(0.9);
        agent.end_episode();
        assert!(agent.action_values().unwrap().is_empty());
    }

    #[test]
    fn test_greedy_selection_uses_learned_values() {
        let mut agent = greedy_agent(1.0);
        let (a, b) = (state_at(0, 0), state_at(0, 1));

        agent.observe(&transition(&a, Action::Right, -5.0, &b));
        agent.end_episode();
        agent.observe(&transition(&a, Action::Down, 3.0, &b));
        agent.end_episode();

        assert_eq!(agent.select_action(&a), Action::Down);
        assert_eq!(agent.state_value(&a), Some(3.0));
    }
}
