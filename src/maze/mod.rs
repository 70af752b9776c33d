//! Core maze logic
//!
//! Grid layout, episode state and the deterministic step function. Nothing in
//! here depends on rendering or learning, so agents, headless training and the
//! dashboard all drive the same engine.

pub mod action;
pub mod config;
pub mod engine;
pub mod layout;
pub mod state;

pub use action::Action;
pub use config::{AdversaryConfig, MazeConfig, RewardTable};
pub use engine::{MazeEngine, StepInfo, StepResult};
pub use layout::{Cell, Layout};
pub use state::{EpisodeOutcome, MazeState, Position, StateKey};
