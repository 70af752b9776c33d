use serde::{Deserialize, Serialize};

/// One of the four moves available to the robot (and the adversary's patrol headings)
///
/// The discriminant order is the action index used by every agent:
/// 0 = Up, 1 = Right, 2 = Down, 3 = Left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Up,
    Right,
    Down,
    Left,
}

impl Action {
    /// All actions in index order
    pub const ALL: [Action; 4] = [Action::Up, Action::Right, Action::Down, Action::Left];

    /// Number of discrete actions
    pub const COUNT: usize = 4;

    /// Index of this action in [`Action::ALL`]
    pub fn index(&self) -> usize {
        match self {
            Action::Up => 0,
            Action::Right => 1,
            Action::Down => 2,
            Action::Left => 3,
        }
    }

    /// Convert a discrete action index back into an action
    pub fn from_index(idx: usize) -> Option<Action> {
        Self::ALL.get(idx).copied()
    }

    /// Returns the delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Action::Up => (0, -1),
            Action::Right => (1, 0),
            Action::Down => (0, 1),
            Action::Left => (-1, 0),
        }
    }

    /// The next heading in patrol order (Up → Right → Down → Left → Up)
    pub fn clockwise(&self) -> Action {
        Self::ALL[(self.index() + 1) % Self::COUNT]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Up => "Up",
            Action::Right => "Right",
            Action::Down => "Down",
            Action::Left => "Left",
        }
    }
}
