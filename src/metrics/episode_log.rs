//! Per-episode history of a training run

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::maze::{EpisodeOutcome, MazeState};
use crate::rl::{Algorithm, AlgorithmSettings};

/// Rewards averaged into [`EpisodeRecord::average_reward`]
pub const AVERAGE_WINDOW: usize = 10;

/// Everything recorded about one finished episode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeRecord {
    pub episode: usize,
    pub algorithm: Algorithm,
    pub reward: f32,
    /// Mean reward of this and the preceding episodes, up to ten
    pub average_reward: f32,
    pub steps: u32,
    pub duration_ms: u64,
    pub initial_trash: u32,
    pub remaining_trash: u32,
    pub trash_collected: u32,
    pub outcome: EpisodeOutcome,
    pub success: bool,
    pub total_successes: usize,
    pub epsilon: f32,
    pub gamma: f32,
    pub learning_rate: f32,
    pub max_steps: u32,
    /// Seconds since the Unix epoch when the episode finished
    pub timestamp: u64,
}

#[derive(Debug, Clone)]
pub struct EpisodeLog {
    algorithm: Algorithm,
    epsilon: f32,
    gamma: f32,
    learning_rate: f32,
    max_steps: u32,
    records: Vec<EpisodeRecord>,
    successes: usize,
}

impl EpisodeLog {
    pub fn new(settings: &AlgorithmSettings) -> Self {
        Self {
            algorithm: settings.algorithm,
            epsilon: settings.epsilon,
            gamma: settings.gamma,
            learning_rate: settings.learning_rate(),
            max_steps: settings.max_steps,
            records: Vec::new(),
            successes: 0,
        }
    }

    /// Append the summary of a finished episode
    pub fn record(&mut self, state: &MazeState, duration: Duration) -> &EpisodeRecord {
        let outcome = state.outcome.unwrap_or(EpisodeOutcome::TimedOut);
        let success = outcome.is_success();
        if success {
            self.successes += 1;
        }

        let reward = state.total_reward;
        let window_start = self.records.len().saturating_sub(AVERAGE_WINDOW - 1);
        let window = &self.records[window_start..];
        let average_reward =
            (window.iter().map(|r| r.reward).sum::<f32>() + reward) / (window.len() + 1) as f32;

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());

        self.records.push(EpisodeRecord {
            episode: self.records.len() + 1,
            algorithm: self.algorithm,
            reward,
            average_reward,
            steps: state.steps,
            duration_ms: duration.as_millis() as u64,
            initial_trash: state.initial_trash,
            remaining_trash: state.trash_remaining,
            trash_collected: state.trash_collected(),
            outcome,
            success,
            total_successes: self.successes,
            epsilon: self.epsilon,
            gamma: self.gamma,
            learning_rate: self.learning_rate,
            max_steps: self.max_steps,
            timestamp,
        });
        &self.records[self.records.len() - 1]
    }

    pub fn records(&self) -> &[EpisodeRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&EpisodeRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Episode rewards in order, for charting
    pub fn rewards(&self) -> impl Iterator<Item = f32> + '_ {
        self.records.iter().map(|r| r.reward)
    }

    /// The `n` highest-reward episodes; earlier episodes win ties
    pub fn top_episodes(&self, n: usize) -> Vec<&EpisodeRecord> {
        let mut sorted: Vec<&EpisodeRecord> = self.records.iter().collect();
        sorted.sort_by(|a, b| b.reward.total_cmp(&a.reward));
        sorted.truncate(n);
        sorted
    }

    pub fn total_successes(&self) -> usize {
        self.successes
    }

    /// Fraction of all logged episodes that reached the exit
    pub fn success_rate(&self) -> f32 {
        if self.records.is_empty() {
            0.0
        } else {
            self.successes as f32 / self.records.len() as f32
        }
    }
}
