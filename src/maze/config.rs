use serde::{Deserialize, Serialize};

use super::layout::Layout;

/// Reward deltas applied by the environment on each step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardTable {
    /// Applied on every step
    pub step: f32,
    /// Extra penalty when the move was blocked by a wall or the grid edge
    pub wall_bump: f32,
    /// Collecting a piece of trash
    pub trash: f32,
    /// Stepping on a mine (ends the episode)
    pub hazard: f32,
    /// Reaching the exit (ends the episode)
    pub exit: f32,
    /// Sharing a cell with the adversary after it moves (ends the episode)
    pub caught: f32,
}

impl Default for RewardTable {
    fn default() -> Self {
        Self {
            step: -1.0,
            wall_bump: -1.0,
            trash: 10.0,
            hazard: -20.0,
            exit: 50.0,
            caught: -50.0,
        }
    }
}

/// Patrol behaviour of the adversary robot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdversaryConfig {
    /// When false the adversary stays on its start cell
    pub enabled: bool,
    /// The adversary moves once every `move_interval` environment steps
    pub move_interval: u32,
}

impl Default for AdversaryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            move_interval: 1,
        }
    }
}

/// Configuration for the maze environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MazeConfig {
    pub layout: Layout,
    pub rewards: RewardTable,
    /// Episodes are truncated after this many steps
    pub max_steps: u32,
    pub adversary: AdversaryConfig,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            layout: Layout::classic(),
            rewards: RewardTable::default(),
            max_steps: 100,
            adversary: AdversaryConfig::default(),
        }
    }
}

impl MazeConfig {
    /// Create a configuration around a custom layout
    pub fn with_layout(layout: Layout) -> Self {
        Self {
            layout,
            ..Default::default()
        }
    }

    pub fn grid_width(&self) -> usize {
        self.layout.width()
    }

    pub fn grid_height(&self) -> usize {
        self.layout.height()
    }
}
