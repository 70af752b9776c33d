use serde::{Deserialize, Serialize};

use super::action::Action;
use super::layout::{Cell, Layout};

/// A position on the maze grid (`x` is the column, `y` the row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position one cell in the direction of an action
    pub fn moved_in_direction(&self, action: Action) -> Self {
        let (dx, dy) = action.delta();
        self.moved_by(dx, dy)
    }
}

/// How an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeOutcome {
    /// Robot stepped onto the exit
    ReachedExit,
    /// Robot stepped onto a mine
    HitHazard,
    /// Adversary ended up on the robot's cell
    Caught,
    /// Step limit reached before anything else happened
    TimedOut,
}

impl EpisodeOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            EpisodeOutcome::ReachedExit => "exit",
            EpisodeOutcome::HitHazard => "hazard",
            EpisodeOutcome::Caught => "caught",
            EpisodeOutcome::TimedOut => "timeout",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, EpisodeOutcome::ReachedExit)
    }
}

/// Key used by the tabular agents to index their value tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateKey {
    pub agent: Position,
    pub adversary: Position,
    pub trash_remaining: u8,
}

/// Complete state of one episode
#[derive(Debug, Clone, PartialEq)]
pub struct MazeState {
    pub grid_width: usize,
    pub grid_height: usize,
    /// Row-major cells; collected trash turns into `Cell::Empty`
    pub cells: Vec<Cell>,
    pub agent: Position,
    pub adversary: Position,
    /// Direction the adversary tries first on its next patrol move
    pub adversary_heading: Action,
    /// Steps since the adversary last moved
    pub adversary_timer: u32,
    pub steps: u32,
    pub total_reward: f32,
    pub initial_trash: u32,
    pub trash_remaining: u32,
    pub terminated: bool,
    pub truncated: bool,
    pub outcome: Option<EpisodeOutcome>,
}

impl MazeState {
    /// Fresh episode state from a layout
    pub fn from_layout(layout: &Layout) -> Self {
        let trash = layout.count(Cell::Trash) as u32;
        Self {
            grid_width: layout.width(),
            grid_height: layout.height(),
            cells: layout.cells().to_vec(),
            agent: layout.agent_start(),
            adversary: layout.adversary_start(),
            adversary_heading: Action::Up,
            adversary_timer: 0,
            steps: 0,
            total_reward: 0.0,
            initial_trash: trash,
            trash_remaining: trash,
            terminated: false,
            truncated: false,
            outcome: None,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    /// Cell contents, or `None` off the grid
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.index_of(pos).map(|idx| self.cells[idx])
    }

    /// True if a robot may stand on this position
    pub fn is_open(&self, pos: Position) -> bool {
        matches!(self.cell(pos), Some(cell) if cell != Cell::Wall)
    }

    pub(crate) fn set_cell(&mut self, pos: Position, cell: Cell) {
        if let Some(idx) = self.index_of(pos) {
            self.cells[idx] = cell;
        }
    }

    /// Whether the episode is over for any reason
    pub fn is_done(&self) -> bool {
        self.terminated || self.truncated
    }

    pub fn trash_collected(&self) -> u32 {
        self.initial_trash - self.trash_remaining
    }

    pub fn key(&self) -> StateKey {
        StateKey {
            agent: self.agent,
            adversary: self.adversary,
            trash_remaining: self.trash_remaining.min(u8::MAX as u32) as u8,
        }
    }

    fn index_of(&self, pos: Position) -> Option<usize> {
        self.is_in_bounds(pos)
            .then(|| pos.y as usize * self.grid_width + pos.x as usize)
    }
}
