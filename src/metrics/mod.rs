//! Training metrics: rolling statistics, heatmaps, the episode log and CSV export

pub mod episode_log;
pub mod export;
pub mod heatmap;
pub mod training_stats;

pub use episode_log::{EpisodeLog, EpisodeRecord};
pub use export::{ActionValueRow, action_value_rows, write_action_values_csv, write_episode_csv};
pub use heatmap::{ValueHeatmap, VisitHeatmap};
pub use training_stats::TrainingStats;
