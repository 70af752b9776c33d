use super::{
    action::Action,
    config::MazeConfig,
    layout::Cell,
    state::{EpisodeOutcome, MazeState, Position},
};

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// The move was blocked by a wall or the grid edge
    pub bumped: bool,
    /// The robot picked up trash this step
    pub collected_trash: bool,
    /// Set on the step that ended the episode
    pub outcome: Option<EpisodeOutcome>,
}

/// Result of an environment step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    pub reward: f32,
    /// Episode ended on a hazard, the exit, or a collision
    pub terminated: bool,
    /// Episode cut short by the step limit
    pub truncated: bool,
    pub info: StepInfo,
}

/// Deterministic maze simulation
pub struct MazeEngine {
    config: MazeConfig,
}

impl MazeEngine {
    pub fn new(config: MazeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MazeConfig {
        &self.config
    }

    /// Reset the maze to the layout's starting picture
    pub fn reset(&self) -> MazeState {
        MazeState::from_layout(&self.config.layout)
    }

    /// Execute one step of the simulation
    pub fn step(&self, state: &mut MazeState, action: Action) -> StepResult {
        if state.is_done() {
            return StepResult {
                reward: 0.0,
                terminated: state.terminated,
                truncated: state.truncated,
                info: StepInfo {
                    bumped: false,
                    collected_trash: false,
                    outcome: None,
                },
            };
        }

        let rewards = self.config.rewards;

        let target = state.agent.moved_in_direction(action);
        let bumped = !state.is_open(target);
        if !bumped {
            state.agent = target;
        }

        let mut reward = rewards.step;
        if bumped {
            reward += rewards.wall_bump;
        }

        let mut collected_trash = false;
        let mut outcome = None;

        match state.cell(state.agent) {
            Some(Cell::Trash) => {
                reward += rewards.trash;
                state.set_cell(state.agent, Cell::Empty);
                state.trash_remaining = state.trash_remaining.saturating_sub(1);
                collected_trash = true;
            }
            Some(Cell::Hazard) => {
                reward += rewards.hazard;
                outcome = Some(EpisodeOutcome::HitHazard);
            }
            Some(Cell::Exit) => {
                reward += rewards.exit;
                outcome = Some(EpisodeOutcome::ReachedExit);
            }
            _ => {}
        }

        self.patrol(state);

        if state.agent == state.adversary {
            reward += rewards.caught;
            outcome = Some(EpisodeOutcome::Caught);
        }

        state.steps += 1;
        state.total_reward += reward;
        state.terminated = outcome.is_some();

        if !state.terminated && state.steps >= self.config.max_steps {
            state.truncated = true;
            outcome = Some(EpisodeOutcome::TimedOut);
        }
        state.outcome = outcome;

        StepResult {
            reward,
            terminated: state.terminated,
            truncated: state.truncated,
            info: StepInfo {
                bumped,
                collected_trash,
                outcome,
            },
        }
    }

    /// Advance the adversary along its patrol
    ///
    /// It keeps its heading until blocked, then rotates clockwise; after four
    /// blocked headings it stays where it is.
    fn patrol(&self, state: &mut MazeState) {
        let adversary = self.config.adversary;
        if !adversary.enabled {
            return;
        }

        state.adversary_timer += 1;
        if state.adversary_timer < adversary.move_interval {
            return;
        }
        state.adversary_timer = 0;

        for _ in 0..Action::COUNT {
            let next: Position = state.adversary.moved_in_direction(state.adversary_heading);
            if state.is_open(next) {
                state.adversary = next;
                return;
            }
            state.adversary_heading = state.adversary_heading.clockwise();
        }
    }
}
