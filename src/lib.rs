//! Basurahan Maze - a trash-collecting robot in a grid world
//!
//! This library provides:
//! - The maze simulation: layouts, rewards and the patrolling adversary (maze module)
//! - Monte Carlo, Q-learning and actor-critic agents (rl module)
//! - Episode statistics, heatmaps and CSV exports (metrics module)
//! - TUI dashboard (render and input modules)
//! - Headless training and live watch modes (modes module)

pub mod error;
pub mod input;
pub mod maze;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod rl;
pub mod telemetry;

pub use error::{Error, Result};
