//! Step-by-step training driver shared by the headless and live modes
//!
//! A [`TrainingSession`] owns the environment, the agent and every metric. The
//! training mode drives it an episode at a time; the watch mode drives it one
//! transition per tick so the dashboard can draw in between.

use std::time::{Duration, Instant};

use crate::maze::{Action, MazeConfig, MazeState, StepResult};
use crate::metrics::{EpisodeLog, EpisodeRecord, TrainingStats, ValueHeatmap, VisitHeatmap};
use crate::rl::{Agent, AlgorithmSettings, LossReport, MazeEnvironment, Transition};

/// Rolling window used for the session statistics
const STATS_WINDOW: usize = 100;

/// What happened during one call to [`TrainingSession::step`]
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub action: Action,
    pub result: StepResult,
    pub loss: Option<LossReport>,
    /// Set when this step ended the episode
    pub finished: Option<EpisodeRecord>,
}

pub struct TrainingSession<A: Agent> {
    env: MazeEnvironment,
    agent: A,
    settings: AlgorithmSettings,
    stats: TrainingStats,
    log: EpisodeLog,
    visits: VisitHeatmap,
    values: ValueHeatmap,
    /// The finished episode is still on display; reset before the next step
    needs_reset: bool,
    episode_started: Instant,
}

impl<A: Agent> TrainingSession<A> {
    /// Build a session over the maze described by the settings
    pub fn new(settings: &AlgorithmSettings, agent: A) -> crate::Result<Self> {
        let config = settings.maze_config()?;
        Ok(Self::with_config(config, settings, agent))
    }

    pub fn with_config(config: MazeConfig, settings: &AlgorithmSettings, agent: A) -> Self {
        let env = MazeEnvironment::new(config);
        let (width, height) = env.grid_size();
        Self {
            env,
            agent,
            settings: settings.clone(),
            stats: TrainingStats::new(STATS_WINDOW),
            log: EpisodeLog::new(settings),
            visits: VisitHeatmap::new(width, height),
            values: ValueHeatmap::new(width, height),
            needs_reset: false,
            episode_started: Instant::now(),
        }
    }

    /// Let the agent act once and learn from the result
    pub fn step(&mut self) -> StepOutcome {
        if self.needs_reset {
            self.env.reset();
            self.episode_started = Instant::now();
            self.needs_reset = false;
        }

        let before = self.env.state().clone();
        let action = self.agent.select_action(&before);
        let result = self.env.step(action);
        let after = self.env.state();

        let loss = self.agent.observe(&Transition {
            state: before,
            action,
            reward: result.reward,
            next_state: after.clone(),
            terminated: result.terminated,
            truncated: result.truncated,
        });
        if let Some(report) = &loss {
            self.stats.record_update(report);
        }

        self.visits.record(after.agent);
        if let Some(value) = self.agent.state_value(after) {
            self.values.record(after.agent, value);
        }

        let finished = if after.is_done() {
            Some(self.finish_episode())
        } else {
            None
        };

        StepOutcome {
            action,
            result,
            loss,
            finished,
        }
    }

    /// Run steps until the current episode ends
    pub fn run_episode(&mut self) -> EpisodeRecord {
        loop {
            if let Some(record) = self.step().finished {
                return record;
            }
        }
    }

    fn finish_episode(&mut self) -> EpisodeRecord {
        self.agent.end_episode();
        self.needs_reset = true;

        let state = self.env.state();
        let elapsed: Duration = self.episode_started.elapsed();
        let record = self.log.record(state, elapsed).clone();
        self.stats.record_episode(
            record.reward,
            record.steps,
            record.trash_collected,
            record.success,
        );

        tracing::debug!(
            episode = record.episode,
            reward = record.reward,
            steps = record.steps,
            outcome = record.outcome.as_str(),
            "episode finished"
        );
        record
    }

    /// All configured episodes have been played
    pub fn is_complete(&self) -> bool {
        self.episodes_done() >= self.settings.episodes as usize
    }

    pub fn episodes_done(&self) -> usize {
        self.log.len()
    }

    pub fn state(&self) -> &MazeState {
        self.env.state()
    }

    pub fn config(&self) -> &MazeConfig {
        self.env.config()
    }

    pub fn agent(&self) -> &A {
        &self.agent
    }

    pub fn into_agent(self) -> A {
        self.agent
    }

    pub fn settings(&self) -> &AlgorithmSettings {
        &self.settings
    }

    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    pub fn log(&self) -> &EpisodeLog {
        &self.log
    }

    pub fn visits(&self) -> &VisitHeatmap {
        &self.visits
    }

    pub fn values(&self) -> &ValueHeatmap {
        &self.values
    }
}
