//! Fading highlights drawn over maze cells
//!
//! Good events (trash picked up, exit reached) light a cell green, bad ones
//! (bumps, mines, capture) light it red. Each rendered frame the highlight
//! decays by [`FADE_FACTOR`] until it drops below [`FADE_CUTOFF`].

use crate::maze::{EpisodeOutcome, Position, StepInfo};

pub const FADE_FACTOR: f32 = 0.9;
pub const FADE_CUTOFF: f32 = 0.05;

/// Sign of a highlight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Good,
    Bad,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    width: usize,
    height: usize,
    cells: Vec<Option<(Mood, f32)>>,
}

impl Overlay {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    /// Light a cell at the given strength, replacing any earlier highlight
    pub fn mark(&mut self, pos: Position, mood: Mood, strength: f32) {
        if let Some(idx) = self.index(pos) {
            self.cells[idx] = Some((mood, strength.clamp(0.0, 1.0)));
        }
    }

    /// Highlight the robot's cell according to what the step did
    pub fn mark_step(&mut self, pos: Position, info: &StepInfo) {
        match info.outcome {
            Some(EpisodeOutcome::ReachedExit) => self.mark(pos, Mood::Good, 1.0),
            Some(EpisodeOutcome::HitHazard | EpisodeOutcome::Caught) => {
                self.mark(pos, Mood::Bad, 1.0)
            }
            _ if info.collected_trash => self.mark(pos, Mood::Good, 1.0),
            _ if info.bumped => self.mark(pos, Mood::Bad, 0.5),
            _ => {}
        }
    }

    /// Decay every highlight by one frame
    pub fn fade(&mut self) {
        for cell in &mut self.cells {
            if let Some((_, strength)) = cell {
                *strength *= FADE_FACTOR;
                if *strength < FADE_CUTOFF {
                    *cell = None;
                }
            }
        }
    }

    pub fn get(&self, pos: Position) -> Option<(Mood, f32)> {
        self.index(pos).and_then(|idx| self.cells[idx])
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    fn index(&self, pos: Position) -> Option<usize> {
        let in_bounds = pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.width
            && (pos.y as usize) < self.height;
        in_bounds.then(|| pos.y as usize * self.width + pos.x as usize)
    }
}
