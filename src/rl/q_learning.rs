//! Tabular one-step Q-learning
//!
//! `Q(s,a) ← Q(s,a) + α [r + γ · max_a' Q(s',a') − Q(s,a)]`, with no bootstrap
//! from a terminal next state. Truncated transitions still bootstrap since the
//! next state is not terminal, only unexplored.

use rand::rngs::StdRng;

use super::agent::{Agent, Algorithm, LossReport, Transition, explore};
use super::q_table::ActionValues;
use super::settings::AlgorithmSettings;
use crate::maze::{Action, MazeState};

pub struct QLearningAgent {
    q: ActionValues,
    alpha: f32,
    epsilon: f32,
    gamma: f32,
    rng: StdRng,
}

impl QLearningAgent {
    pub fn new(alpha: f32, epsilon: f32, gamma: f32, rng: StdRng) -> Self {
        Self {
            q: ActionValues::new(),
            alpha,
            epsilon,
            gamma,
            rng,
        }
    }

    pub fn from_settings(settings: &AlgorithmSettings) -> Self {
        Self::new(
            settings.alpha,
            settings.epsilon,
            settings.gamma,
            settings.rng(),
        )
    }
}

impl Agent for QLearningAgent {
    fn algorithm(&self) -> Algorithm {
        Algorithm::QLearning
    }

    fn select_action(&mut self, state: &MazeState) -> Action {
        explore(&mut self.rng, self.epsilon).unwrap_or_else(|| self.q.best_action(&state.key()))
    }

    fn observe(&mut self, transition: &Transition) -> Option<LossReport> {
        let key = transition.state.key();
        let bootstrap = if transition.terminated {
            0.0
        } else {
            self.q.max_value(&transition.next_state.key())
        };

        let target = transition.reward + self.gamma * bootstrap;
        let current = self.q.get(&key, transition.action);
        self.q.set(
            key,
            transition.action,
            current + self.alpha * (target - current),
        );
        None
    }

    fn end_episode(&mut self) {}

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

    fn agent() -> QLearningAgent {
        QLearningAgent::new(0.5, 0.0, 0.9, StdRng::seed_from_u64(0))
    }

    fn transition(
        from: &MazeState,
        action: Action,
        reward: f32,
        to: &MazeState,
        terminated: bool,
        truncated: bool,
    ) -> Transition {
        Transition {
            state: from.clone(),
            action,
            reward,
            next_state: to.clone(),
            terminated,
            truncated,
        }
    }

    #[test]
    fn test_single_update() {
        let mut agent = agent();
        let (a, b) = (state_at(0, 0), state_at(1, 0));

        agent.observe(&transition(&a, Action::Right, 10.0, &b, false, false));

        // 0 + 0.5 * (10 + 0.9 * 0 - 0)
        assert_eq!(agent.action_values().unwrap().get(&a.key(), Action::Right), 5.0);
    }

    #[test]
    fn test_bootstraps_from_next_state() {
        let mut agent = agent();
        let (a, b, c) = (state_at(0, 0), state_at(1, 0), state_at(2, 0));

        agent.observe(&transition(&b, Action::Right, 10.0, &c, false, false));
        agent.observe(&transition(&a, Action::Right, 0.0, &b, false, false));

        // Q(b, Right) = 5, so Q(a, Right) = 0.5 * 0.9 * 5
        let value = agent.action_values().unwrap().get(&a.key(), Action::Right);
        assert!((value - 2.25).abs() < 1e-6);
    }

    #[test]
    fn test_terminal_transition_does_not_bootstrap() {
        let mut agent = agent();
        let (a, b) = (state_at(0, 0), state_at(1, 0));

        agent.observe(&transition(&b, Action::Right, 10.0, &a, false, false));
        agent.observe(&transition(&a, Action::Right, -20.0, &b, true, false));

        assert_eq!(agent.action_values().unwrap().get(&a.key(), Action::Right), -10.0);
    }

    #[test]
    fn test_truncated_transition_still_bootstraps() {
        let mut agent = agent();
        let (a, b, c) = (state_at(0, 0), state_at(1, 0), state_at(2, 0));

        agent.observe(&transition(&b, Action::Right, 10.0, &c, false, false));
        agent.observe(&transition(&a, Action::Right, 0.0, &b, false, true));

        let value = agent.action_values().unwrap().get(&a.key(), Action::Right);
        assert!(value > 0.0);
    }

    #[test]
    fn test_greedy_action_after_learning() {
        let mut agent = agent();
        let (a, b) = (state_at(0, 0), state_at(0, 1));

        agent.observe(&transition(&a, Action::Down, 4.0, &b, false, false));

        assert_eq!(agent.select_action(&a), Action::Down);
        assert_eq!(agent.state_value(&a), Some(2.0));
    }
}
