//! Per-cell heatmaps over the maze grid
//!
//! [`VisitHeatmap`] counts how often the robot stood on each cell;
//! [`ValueHeatmap`] keeps the latest state-value estimate seen with the robot
//! on each cell. Both report their range so the renderer can scale colours.

use crate::maze::Position;

#[derive(Debug, Clone, PartialEq)]
pub struct VisitHeatmap {
    width: usize,
    height: usize,
    counts: Vec<u32>,
}

impl VisitHeatmap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            counts: vec![0; width * height],
        }
    }

    /// Count one visit; positions off the grid are ignored
    pub fn record(&mut self, pos: Position) {
        if let Some(idx) = index(self.width, self.height, pos) {
            self.counts[idx] = self.counts[idx].saturating_add(1);
        }
    }

    pub fn get(&self, pos: Position) -> u32 {
        index(self.width, self.height, pos).map_or(0, |idx| self.counts[idx])
    }

    pub fn max(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn min(&self) -> u32 {
        self.counts.iter().copied().min().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Visits relative to the busiest cell, in [0, 1]
    pub fn intensity(&self, pos: Position) -> f32 {
        match self.max() {
            0 => 0.0,
            max => self.get(pos) as f32 / max as f32,
        }
    }

    pub fn reset(&mut self) {
        self.counts.fill(0);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueHeatmap {
    width: usize,
    height: usize,
    values: Vec<Option<f32>>,
}

impl ValueHeatmap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            values: vec![None; width * height],
        }
    }

    /// Overwrite the estimate for a cell
    pub fn record(&mut self, pos: Position, value: f32) {
        if let Some(idx) = index(self.width, self.height, pos) {
            if value.is_finite() {
                self.values[idx] = Some(value);
            }
        }
    }

    pub fn get(&self, pos: Position) -> Option<f32> {
        index(self.width, self.height, pos).and_then(|idx| self.values[idx])
    }

    pub fn max(&self) -> Option<f32> {
        self.values.iter().flatten().copied().reduce(f32::max)
    }

    pub fn min(&self) -> Option<f32> {
        self.values.iter().flatten().copied().reduce(f32::min)
    }

    /// Value scaled into [0, 1] across the recorded range
    pub fn intensity(&self, pos: Position) -> Option<f32> {
        let value = self.get(pos)?;
        let (min, max) = (self.min()?, self.max()?);
        if max - min <= f32::EPSILON {
            Some(0.5)
        } else {
            Some((value - min) / (max - min))
        }
    }

    pub fn reset(&mut self) {
        self.values.fill(None);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

fn index(width: usize, height: usize, pos: Position) -> Option<usize> {
    let in_bounds = pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < width && (pos.y as usize) < height;
    in_bounds.then(|| pos.y as usize * width + pos.x as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_counts() {
        let mut heatmap = VisitHeatmap::new(6, 6);
        heatmap.record(Position::new(1, 0));
        heatmap.record(Position::new(1, 0));
        heatmap.record(Position::new(5, 5));
        heatmap.record(Position::new(6, 0));

        assert_eq!(heatmap.get(Position::new(1, 0)), 2);
        assert_eq!(heatmap.get(Position::new(5, 5)), 1);
        assert_eq!(heatmap.max(), 2);
        assert_eq!(heatmap.min(), 0);
        assert_eq!(heatmap.total(), 3);
        assert!((heatmap.intensity(Position::new(5, 5)) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_visit_reset() {
        let mut heatmap = VisitHeatmap::new(3, 3);
        heatmap.record(Position::new(0, 0));
        heatmap.reset();
        assert_eq!(heatmap.max(), 0);
        assert_eq!(heatmap.intensity(Position::new(0, 0)), 0.0);
    }

    #[test]
    fn test_value_keeps_latest_estimate() {
        let mut heatmap = ValueHeatmap::new(6, 6);
        assert_eq!(heatmap.max(), None);

        heatmap.record(Position::new(0, 0), 3.0);
        heatmap.record(Position::new(0, 0), -2.0);
        heatmap.record(Position::new(2, 1), 8.0);

        assert_eq!(heatmap.get(Position::new(0, 0)), Some(-2.0));
        assert_eq!(heatmap.get(Position::new(4, 4)), None);
        assert_eq!(heatmap.min(), Some(-2.0));
        assert_eq!(heatmap.max(), Some(8.0));
        assert_eq!(heatmap.intensity(Position::new(0, 0)), Some(0.0));
        assert_eq!(heatmap.intensity(Position::new(2, 1)), Some(1.0));
    }

    #[test]
    fn test_value_ignores_non_finite() {
        let mut heatmap = ValueHeatmap::new(2, 2);
        heatmap.record(Position::new(0, 0), f32::NAN);
        assert_eq!(heatmap.get(Position::new(0, 0)), None);

        heatmap.record(Position::new(1, 1), 4.0);
        assert_eq!(heatmap.intensity(Position::new(1, 1)), Some(0.5));
        heatmap.reset();
        assert_eq!(heatmap.max(), None);
    }
}
