//! Saving and restoring the actor-critic network
//!
//! A model is two files:
//! - `<path>`: network weights (Burn named MessagePack record)
//! - `<path>.meta.json`: settings and training counters as JSON

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use burn::{
    module::Module,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder},
    tensor::backend::AutodiffBackend,
};
use serde::{Deserialize, Serialize};

use super::{ActorCriticAgent, ActorCriticConfig, ActorCriticNetwork, AlgorithmSettings};

/// Metadata saved with the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Settings the network was trained with
    pub settings: AlgorithmSettings,

    pub grid_height: usize,
    pub grid_width: usize,

    /// Gradient updates performed
    pub updates: usize,

    pub episodes_trained: usize,

    /// Crate version that wrote the model
    pub version: String,
}

impl ModelMetadata {
    pub fn new(
        settings: AlgorithmSettings,
        grid_height: usize,
        grid_width: usize,
        updates: usize,
        episodes_trained: usize,
    ) -> Self {
        Self {
            settings,
            grid_height,
            grid_width,
            updates,
            episodes_trained,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

fn metadata_path(path: &Path) -> PathBuf {
    path.with_extension("meta.json")
}

/// Save a trained agent's network and metadata
pub fn save_model<B: AutodiffBackend>(agent: &ActorCriticAgent<B>, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let record = agent.network().clone().into_record();
    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    recorder
        .record(record, path.to_path_buf())
        .context("Failed to save network weights")?;

    let metadata = ModelMetadata::new(
        agent.settings().clone(),
        agent.grid_height(),
        agent.grid_width(),
        agent.updates(),
        agent.episodes_trained(),
    );

    let meta_path = metadata_path(path);
    let meta_json =
        serde_json::to_string_pretty(&metadata).context("Failed to serialize metadata")?;
    std::fs::write(&meta_path, meta_json)
        .with_context(|| format!("Failed to write metadata to {:?}", meta_path))?;

    tracing::info!(path = %path.display(), updates = agent.updates(), "saved actor-critic model");
    Ok(())
}

/// Load a saved network together with its metadata
pub fn load_network<B: AutodiffBackend>(
    path: &Path,
    device: &B::Device,
) -> Result<(ActorCriticNetwork<B>, ModelMetadata)> {
    let meta_path = metadata_path(path);
    let meta_json = std::fs::read_to_string(&meta_path)
        .with_context(|| format!("Failed to read metadata from {:?}", meta_path))?;
    let metadata: ModelMetadata =
        serde_json::from_str(&meta_json).context("Failed to deserialize metadata")?;

    let network = ActorCriticConfig::new(metadata.grid_height, metadata.grid_width).init::<B>(device);

    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    let record = recorder
        .load(path.to_path_buf(), device)
        .with_context(|| format!("Failed to load network weights from {:?}", path))?;

    Ok((network.load_record(record), metadata))
}

/// Restore an agent from disk, training on with the given settings
///
/// The saved grid size must match the maze the agent will run in.
pub fn load_agent<B: AutodiffBackend>(
    path: &Path,
    settings: &AlgorithmSettings,
    grid_height: usize,
    grid_width: usize,
    device: B::Device,
) -> Result<ActorCriticAgent<B>> {
    let (network, metadata) = load_network::<B>(path, &device)?;
    anyhow::ensure!(
        metadata.grid_height == grid_height && metadata.grid_width == grid_width,
        "model at {:?} was trained on a {}x{} grid, current maze is {}x{}",
        path,
        metadata.grid_width,
        metadata.grid_height,
        grid_width,
        grid_height
    );

    tracing::info!(
        path = %path.display(),
        episodes = metadata.episodes_trained,
        version = %metadata.version,
        "loaded actor-critic model"
    );
    Ok(ActorCriticAgent::with_network(
        network,
        settings,
        grid_height,
        grid_width,
        device,
    ))
}
