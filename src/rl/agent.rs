//! The contract every learning agent implements
//!
//! Training and watch modes only talk to agents through [`Agent`], so the three
//! algorithms are interchangeable: the mode asks for an action, feeds the
//! resulting [`Transition`] back and closes the episode.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use rand::{Rng, distributions::Standard};
use serde::{Deserialize, Serialize};

use super::q_table::ActionValues;
use crate::error::Error;
use crate::maze::{Action, MazeState};

/// Learning algorithm selectable from the settings file or the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Algorithm {
    MonteCarlo,
    QLearning,
    ActorCritic,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::MonteCarlo => "monte_carlo",
            Algorithm::QLearning => "q_learning",
            Algorithm::ActorCritic => "actor_critic",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Algorithm::MonteCarlo => "Monte Carlo",
            Algorithm::QLearning => "Q-Learning",
            Algorithm::ActorCritic => "Actor-Critic",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "monte_carlo" | "mc" => Ok(Algorithm::MonteCarlo),
            "q_learning" | "q" => Ok(Algorithm::QLearning),
            "actor_critic" | "ac" => Ok(Algorithm::ActorCritic),
            _ => Err(Error::UnknownAlgorithm {
                input: s.to_string(),
            }),
        }
    }
}

/// One step of experience handed to [`Agent::observe`]
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: MazeState,
    pub action: Action,
    pub reward: f32,
    pub next_state: MazeState,
    pub terminated: bool,
    pub truncated: bool,
}

impl Transition {
    pub fn is_done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Losses from one actor-critic update
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LossReport {
    pub policy_loss: f32,
    pub value_loss: f32,
    pub entropy: f32,
}

pub trait Agent {
    fn algorithm(&self) -> Algorithm;

    /// Pick the next move for the given state
    fn select_action(&mut self, state: &MazeState) -> Action;

    /// Learn from one step; returns losses when the agent trains a network
    fn observe(&mut self, transition: &Transition) -> Option<LossReport>;

    /// Called once after the last transition of an episode
    fn end_episode(&mut self);

    /// Current estimate of how good the state is
    fn state_value(&self, state: &MazeState) -> Option<f32>;

    /// Tabular action values, when the agent keeps them
    fn action_values(&self) -> Option<&ActionValues>;
}

/// ε-greedy exploration: a uniformly random move when the draw falls below ε
pub(crate) fn explore<R: Rng>(rng: &mut R, epsilon: f32) -> Option<Action> {
    let draw: f32 = rng.sample(Standard);
    if draw < epsilon {
        Action::from_index(rng.gen_range(0..Action::COUNT))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("monte_carlo".parse::<Algorithm>().unwrap(), Algorithm::MonteCarlo);
        assert_eq!("Q-Learning".parse::<Algorithm>().unwrap(), Algorithm::QLearning);
        assert_eq!("ac".parse::<Algorithm>().unwrap(), Algorithm::ActorCritic);
        assert!(matches!(
            "sarsa".parse::<Algorithm>(),
            Err(Error::UnknownAlgorithm { .. })
        ));
    }

    #[test]
    fn test_algorithm_serde_names() {
        let json = serde_json::to_string(&Algorithm::ActorCritic).unwrap();
        assert_eq!(json, "\"actor_critic\"");
        let parsed: Algorithm = serde_json::from_str("\"q_learning\"").unwrap();
        assert_eq!(parsed, Algorithm::QLearning);
    }

    #[test]
    fn test_explore_respects_epsilon() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            assert!(explore(&mut rng, 0.0).is_none());
        }
        for _ in 0..100 {
            assert!(explore(&mut rng, 1.0).is_some());
        }
    }

    #[test]
    fn test_explore_covers_all_actions() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = [false; Action::COUNT];
        for _ in 0..200 {
            if let Some(action) = explore(&mut rng, 1.0) {
                seen[action.index()] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }
}
