use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use basurahan_maze::modes::{TrainConfig, TrainMode, TrainingSession, WatchMode, write_exports};
use basurahan_maze::rl::{
    ActorCriticAgent, Agent, Algorithm, AlgorithmSettings, MonteCarloAgent, QLearningAgent,
    TrainingBackend, default_device, load_agent, save_model,
};
use basurahan_maze::telemetry;
use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(name = "basurahan_maze")]
#[command(version, about = "Trash-collecting robot maze with reinforcement learning agents")]
struct Cli {
    /// Run headless or with the live dashboard
    #[arg(long, value_enum, default_value = "watch")]
    mode: Mode,

    /// Learning algorithm (overrides the settings file)
    #[arg(long, value_enum)]
    algorithm: Option<Algorithm>,

    /// Number of training episodes
    #[arg(long)]
    episodes: Option<u32>,

    /// Exploration rate
    #[arg(long)]
    epsilon: Option<f32>,

    /// Discount factor
    #[arg(long)]
    gamma: Option<f32>,

    /// Q-learning step size
    #[arg(long)]
    alpha: Option<f32>,

    /// Steps before an episode is truncated
    #[arg(long)]
    max_steps: Option<u32>,

    /// Seed for the agent's random source
    #[arg(long)]
    seed: Option<u64>,

    /// Settings file; defaults are used when it is missing
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,

    /// Write the effective settings back to the settings file
    #[arg(long)]
    save_settings: bool,

    /// Custom maze layout file
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Episode metrics CSV written after training
    #[arg(long)]
    metrics_csv: Option<PathBuf>,

    /// Action-value table CSV written after training
    #[arg(long)]
    table_csv: Option<PathBuf>,

    /// Save the actor-critic network here after training
    #[arg(long)]
    model: Option<PathBuf>,

    /// Continue training an actor-critic network saved earlier
    #[arg(long)]
    load_model: Option<PathBuf>,

    /// Log a progress line every N episodes in train mode
    #[arg(long, default_value = "10")]
    log_every: usize,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Train without a UI, logging progress
    Train,
    /// Train while drawing the live dashboard
    Watch,
}

impl Cli {
    fn apply_overrides(&self, settings: &mut AlgorithmSettings) {
        if let Some(algorithm) = self.algorithm {
            settings.algorithm = algorithm;
        }
        if let Some(episodes) = self.episodes {
            settings.episodes = episodes;
        }
        if let Some(epsilon) = self.epsilon {
            settings.epsilon = epsilon;
        }
        if let Some(gamma) = self.gamma {
            settings.gamma = gamma;
        }
        if let Some(alpha) = self.alpha {
            settings.alpha = alpha;
        }
        if let Some(max_steps) = self.max_steps {
            settings.max_steps = max_steps;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        if self.layout.is_some() {
            settings.layout_file = self.layout.clone();
        }
    }

    /// Model flags given for an algorithm that has no network to save or load
    fn unused_model_flags(&self, algorithm: Algorithm) -> Vec<(&'static str, &Path)> {
        if algorithm == Algorithm::ActorCritic {
            return Vec::new();
        }
        [("--model", &self.model), ("--load-model", &self.load_model)]
            .into_iter()
            .filter_map(|(flag, path)| path.as_deref().map(|p| (flag, p)))
            .collect()
    }

    fn train_config(&self) -> TrainConfig {
        TrainConfig {
            log_every: self.log_every,
            metrics_csv: self.metrics_csv.clone(),
            table_csv: self.table_csv.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The dashboard owns the terminal in watch mode
    if matches!(cli.mode, Mode::Train) {
        telemetry::init(&cli.log_level)?;
    }

    let mut settings = AlgorithmSettings::load_or_default(&cli.settings)
        .with_context(|| format!("Failed to load settings from {:?}", cli.settings))?;
    cli.apply_overrides(&mut settings);
    settings.validate().context("Invalid settings")?;

    if cli.save_settings {
        settings
            .save(&cli.settings)
            .with_context(|| format!("Failed to save settings to {:?}", cli.settings))?;
    }

    for (flag, path) in cli.unused_model_flags(settings.algorithm) {
        tracing::warn!(
            algorithm = %settings.algorithm,
            flag,
            path = %path.display(),
            "model files are only used by actor_critic, ignoring"
        );
    }

    match settings.algorithm {
        Algorithm::MonteCarlo => {
            let agent = MonteCarloAgent::from_settings(&settings);
            run(&cli, &settings, agent).await?;
        }
        Algorithm::QLearning => {
            let agent = QLearningAgent::from_settings(&settings);
            run(&cli, &settings, agent).await?;
        }
        Algorithm::ActorCritic => {
            let agent = actor_critic_agent(&settings, cli.load_model.as_deref())?;
            let agent = run(&cli, &settings, agent).await?;
            if let Some(path) = &cli.model {
                save_model(&agent, path)?;
            }
        }
    }

    Ok(())
}

/// Drive a session in the chosen mode and hand back the trained agent
async fn run<A: Agent>(cli: &Cli, settings: &AlgorithmSettings, agent: A) -> Result<A> {
    let session = TrainingSession::new(settings, agent).context("Failed to build the maze")?;
    let config = cli.train_config();

    let session = match cli.mode {
        Mode::Train => {
            let mut mode = TrainMode::new(session, config);
            mode.run()?;
            mode.into_session()
        }
        Mode::Watch => {
            let mut mode = WatchMode::new(session);
            mode.run().await?;
            let session = mode.into_session();
            write_exports(&session, &config)?;
            session
        }
    };

    Ok(session.into_agent())
}

fn actor_critic_agent(
    settings: &AlgorithmSettings,
    load_from: Option<&Path>,
) -> Result<ActorCriticAgent<TrainingBackend>> {
    let maze = settings.maze_config().context("Failed to build the maze")?;
    let (height, width) = (maze.grid_height(), maze.grid_width());
    let device = default_device();

    match load_from {
        Some(path) => load_agent::<TrainingBackend>(path, settings, height, width, device),
        None => Ok(ActorCriticAgent::new(settings, height, width, device)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_flags_ignored_for_tabular_agents() {
        let cli = Cli::parse_from([
            "basurahan_maze",
            "--model",
            "models/maze.mpk",
            "--load-model",
            "models/old.mpk",
        ]);

        let unused = cli.unused_model_flags(Algorithm::QLearning);
        assert_eq!(unused.len(), 2);
        assert_eq!(unused[0], ("--model", Path::new("models/maze.mpk")));
        assert_eq!(unused[1].0, "--load-model");

        assert!(cli.unused_model_flags(Algorithm::ActorCritic).is_empty());
    }

    #[test]
    fn test_no_model_flags() {
        let cli = Cli::parse_from(["basurahan_maze", "--mode", "train"]);
        assert!(cli.unused_model_flags(Algorithm::MonteCarlo).is_empty());
    }
}
