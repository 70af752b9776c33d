pub mod session;
pub mod train;
pub mod watch;

pub use session::{StepOutcome, TrainingSession};
pub use train::{TrainConfig, TrainMode, write_exports};
pub use watch::{WatchMode, WatchSpeed};
