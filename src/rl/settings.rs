//! Hyperparameters and run options persisted between sessions
//!
//! Settings live in a flat JSON file. Keys missing from the file fall back to
//! their defaults, so older files keep loading as new options appear.

use std::path::{Path, PathBuf};

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::agent::Algorithm;
use crate::error::{Error, Result};
use crate::maze::{AdversaryConfig, Layout, MazeConfig, RewardTable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgorithmSettings {
    pub algorithm: Algorithm,
    pub episodes: u32,
    pub epsilon: f32,
    pub gamma: f32,
    pub max_steps: u32,

    /// Q-learning step size
    pub alpha: f32,

    /// Adam learning rate for the policy head, default 1e-3
    ///
    /// Kept well below 0.1, the usual tabular step size: with Adam a rate
    /// that large makes the policy collapse within a few episodes.
    pub actor_lr: f32,
    /// Adam learning rate for the value head, default 1e-2 (see `actor_lr`)
    pub critic_lr: f32,
    /// Softmax temperature applied to the policy logits
    pub beta: f32,
    pub entropy_weight: f32,
    pub value_weight: f32,
    pub advantage_weight: f32,

    pub step_penalty: f32,
    pub wall_bump_penalty: f32,
    pub trash_reward: f32,
    pub mine_penalty: f32,
    pub evil_penalty: f32,
    pub exit_reward: f32,

    pub adversary_enabled: bool,
    /// Environment steps between adversary moves
    pub adversary_interval: u32,

    /// Simulation steps per second in watch mode
    pub simulation_speed: u32,
    pub show_reward_graph: bool,
    pub show_heatmap: bool,
    pub show_value_map: bool,

    /// Seed for every random draw the agents make; entropy when absent
    pub seed: Option<u64>,
    /// Character-grid layout to use instead of the classic maze
    pub layout_file: Option<PathBuf>,
}

impl Default for AlgorithmSettings {
    fn default() -> Self {
        let rewards = RewardTable::default();
        let adversary = AdversaryConfig::default();
        Self {
            algorithm: Algorithm::MonteCarlo,
            episodes: 200,
            epsilon: 0.1,
            gamma: 0.99,
            max_steps: 100,
            alpha: 0.1,
            actor_lr: 1e-3,
            critic_lr: 1e-2,
            beta: 2.3,
            entropy_weight: 0.01,
            value_weight: 0.5,
            advantage_weight: 1.0,
            step_penalty: rewards.step,
            wall_bump_penalty: rewards.wall_bump,
            trash_reward: rewards.trash,
            mine_penalty: rewards.hazard,
            evil_penalty: rewards.caught,
            exit_reward: rewards.exit,
            adversary_enabled: adversary.enabled,
            adversary_interval: adversary.move_interval,
            simulation_speed: 30,
            show_reward_graph: true,
            show_heatmap: true,
            show_value_map: true,
            seed: None,
            layout_file: None,
        }
    }
}

impl AlgorithmSettings {
    /// Write the settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::io(format!("create directory {}", parent.display()), e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .map_err(|e| Error::io(format!("write settings to {}", path.display()), e))
    }

    /// Read settings from a JSON file and validate them
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("read settings from {}", path.display()), e))?;
        let settings: Self = serde_json::from_str(&json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Like [`AlgorithmSettings::load`], but a missing file yields the defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "settings file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Reject values no agent can train with
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(Error::settings(format!(
                "epsilon must be in [0, 1], got {}",
                self.epsilon
            )));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(Error::settings(format!(
                "gamma must be in [0, 1], got {}",
                self.gamma
            )));
        }
        if self.episodes == 0 {
            return Err(Error::settings("episodes must be positive"));
        }
        if self.max_steps == 0 {
            return Err(Error::settings("max_steps must be positive"));
        }
        for (name, value) in [
            ("alpha", self.alpha),
            ("actor_lr", self.actor_lr),
            ("critic_lr", self.critic_lr),
            ("beta", self.beta),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(Error::settings(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.adversary_interval == 0 {
            return Err(Error::settings("adversary_interval must be at least 1"));
        }
        if self.simulation_speed == 0 {
            return Err(Error::settings("simulation_speed must be at least 1"));
        }
        Ok(())
    }

    pub fn rewards(&self) -> RewardTable {
        RewardTable {
            step: self.step_penalty,
            wall_bump: self.wall_bump_penalty,
            trash: self.trash_reward,
            hazard: self.mine_penalty,
            exit: self.exit_reward,
            caught: self.evil_penalty,
        }
    }

    /// Build the environment configuration, reading the layout file if one is set
    pub fn maze_config(&self) -> Result<MazeConfig> {
        let layout = match &self.layout_file {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .map_err(|e| Error::io(format!("read layout from {}", path.display()), e))?;
                Layout::parse(&text)?
            }
            None => Layout::classic(),
        };

        Ok(MazeConfig {
            layout,
            rewards: self.rewards(),
            max_steps: self.max_steps,
            adversary: AdversaryConfig {
                enabled: self.adversary_enabled,
                move_interval: self.adversary_interval,
            },
        })
    }

    /// Step size reported for the selected algorithm
    pub fn learning_rate(&self) -> f32 {
        match self.algorithm {
            Algorithm::MonteCarlo => 0.0,
            Algorithm::QLearning => self.alpha,
            Algorithm::ActorCritic => self.actor_lr,
        }
    }

    /// Random source for an agent, seeded when the settings carry a seed
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
