pub mod overlay;
pub mod renderer;

pub use overlay::{Mood, Overlay};
pub use renderer::{Dashboard, Panels, Renderer};
