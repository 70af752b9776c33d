//! Headless training mode
//!
//! Runs the configured number of episodes without a terminal UI, logging
//! progress through `tracing`, and writes the requested CSV exports at the end.

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::session::TrainingSession;
use crate::metrics::{write_action_values_csv, write_episode_csv};
use crate::rl::Agent;

/// Output options for a headless run
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Log a progress line every N episodes
    pub log_every: usize,

    /// Episode log CSV written after training
    pub metrics_csv: Option<PathBuf>,

    /// Action-value table CSV written after training (tabular agents only)
    pub table_csv: Option<PathBuf>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            log_every: 10,
            metrics_csv: None,
            table_csv: None,
        }
    }
}

pub struct TrainMode<A: Agent> {
    session: TrainingSession<A>,
    config: TrainConfig,
}

impl<A: Agent> TrainMode<A> {
    pub fn new(session: TrainingSession<A>, config: TrainConfig) -> Self {
        Self { session, config }
    }

    /// Train until the session's episode budget is spent
    pub fn run(&mut self) -> Result<()> {
        self.log_header();

        let total = self.session.settings().episodes as usize;
        let log_every = self.config.log_every.max(1);

        while !self.session.is_complete() {
            let record = self.session.run_episode();
            if record.episode % log_every == 0 || record.episode == total {
                tracing::info!(
                    "[Episode {}/{}] {}",
                    record.episode,
                    total,
                    self.session.stats().format_summary()
                );
            }
        }

        self.log_summary();
        write_exports(&self.session, &self.config)
    }

    fn log_header(&self) {
        let settings = self.session.settings();
        let config = self.session.config();
        tracing::info!(
            algorithm = settings.algorithm.display_name(),
            episodes = settings.episodes,
            grid = %format!("{}x{}", config.grid_width(), config.grid_height()),
            max_steps = config.max_steps,
            epsilon = settings.epsilon,
            gamma = settings.gamma,
            learning_rate = settings.learning_rate(),
            adversary = config.adversary.enabled,
            "starting training"
        );
    }

    fn log_summary(&self) {
        let log = self.session.log();
        tracing::info!(
            episodes = log.len(),
            successes = log.total_successes(),
            success_rate = %format!("{:.1}%", log.success_rate() * 100.0),
            "training complete"
        );
        for (rank, record) in log.top_episodes(5).into_iter().enumerate() {
            tracing::info!(
                "  #{} episode {}: reward {:.1}, {} steps, {}",
                rank + 1,
                record.episode,
                record.reward,
                record.steps,
                record.outcome.as_str()
            );
        }
    }

    pub fn session(&self) -> &TrainingSession<A> {
        &self.session
    }

    pub fn into_session(self) -> TrainingSession<A> {
        self.session
    }
}

/// Write the CSV exports requested in `config` for a finished session
pub fn write_exports<A: Agent>(session: &TrainingSession<A>, config: &TrainConfig) -> Result<()> {
    if let Some(path) = &config.metrics_csv {
        let rows = write_episode_csv(session.log(), path)
            .with_context(|| format!("Failed to export episode metrics to {:?}", path))?;
        tracing::info!(path = %path.display(), rows, "wrote episode metrics");
    }

    if let Some(path) = &config.table_csv {
        match session.agent().action_values() {
            Some(values) => {
                let rows = write_action_values_csv(values, path)
                    .with_context(|| format!("Failed to export action values to {:?}", path))?;
                tracing::info!(path = %path.display(), rows, "wrote action-value table");
            }
            None => tracing::warn!(
                algorithm = %session.agent().algorithm(),
                "agent keeps no action-value table, skipping table export"
            ),
        }
    }
    Ok(())
}
