use crate::maze::{Action, MazeConfig, MazeEngine, MazeState, StepResult};

/// Maze environment for reinforcement learning
///
/// Wraps the engine and owns the state of the running episode. Agents read the
/// state directly: tabular agents key on it and the network builds its
/// observation tensor from it.
pub struct MazeEnvironment {
    engine: MazeEngine,
    state: MazeState,
}

impl MazeEnvironment {
    pub fn new(config: MazeConfig) -> Self {
        let engine = MazeEngine::new(config);
        let state = engine.reset();
        Self { engine, state }
    }

    /// Start a new episode
    pub fn reset(&mut self) -> &MazeState {
        self.state = self.engine.reset();
        &self.state
    }

    /// Advance the episode by one action
    pub fn step(&mut self, action: Action) -> StepResult {
        self.engine.step(&mut self.state, action)
    }

    pub fn state(&self) -> &MazeState {
        &self.state
    }

    pub fn config(&self) -> &MazeConfig {
        self.engine.config()
    }

    /// Grid size as (width, height)
    pub fn grid_size(&self) -> (usize, usize) {
        (self.state.grid_width, self.state.grid_height)
    }
}
