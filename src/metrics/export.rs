//! CSV export of training results
//!
//! Two files can be written after a run: the episode log (one row per
//! episode) and, for the tabular agents, the learned action values (one row
//! per `(state, action)` pair whose value is not negligible).

use std::path::Path;

use serde::Serialize;

use super::episode_log::EpisodeLog;
use crate::error::{Error, Result};
use crate::maze::{Action, StateKey};
use crate::rl::ActionValues;

/// Values with a magnitude at or below this are left out of the table export
pub const VALUE_EPSILON: f32 = 1e-3;

/// A single row of the action-value export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionValueRow {
    pub agent_x: i32,
    pub agent_y: i32,
    pub adversary_x: i32,
    pub adversary_y: i32,
    pub trash_remaining: u8,
    pub action: &'static str,
    pub value: f32,
    /// This action is the greedy choice in its state
    pub is_optimal: bool,
}

/// Flatten an action-value table into export rows, sorted by state then action
pub fn action_value_rows(values: &ActionValues) -> Vec<ActionValueRow> {
    let mut entries: Vec<(&StateKey, &[f32; Action::COUNT])> = values.iter().collect();
    entries.sort_by_key(|(key, _)| {
        (
            key.agent.y,
            key.agent.x,
            key.adversary.y,
            key.adversary.x,
            std::cmp::Reverse(key.trash_remaining),
        )
    });

    let mut rows = Vec::new();
    for (key, action_values) in entries {
        let best = values.best_action(key);
        for action in Action::ALL {
            let value = action_values[action.index()];
            if value.abs() <= VALUE_EPSILON {
                continue;
            }
            rows.push(ActionValueRow {
                agent_x: key.agent.x,
                agent_y: key.agent.y,
                adversary_x: key.adversary.x,
                adversary_y: key.adversary.y,
                trash_remaining: key.trash_remaining,
                action: action.name(),
                value,
                is_optimal: action == best,
            });
        }
    }
    rows
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::io(format!("create directory {}", parent.display()), e))?;
    }
    Ok(())
}

/// Write the episode log; returns the number of rows written
pub fn write_episode_csv(log: &EpisodeLog, path: &Path) -> Result<usize> {
    create_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    for record in log.records() {
        writer.serialize(record)?;
    }
    writer
        .flush()
        .map_err(|e| Error::io(format!("flush {}", path.display()), e))?;
    Ok(log.len())
}

/// Write a tabular agent's action values; returns the number of rows written
pub fn write_action_values_csv(values: &ActionValues, path: &Path) -> Result<usize> {
    create_parent(path)?;
    let rows = action_value_rows(values);
    let mut writer = csv::Writer::from_path(path)?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer
        .flush()
        .map_err(|e| Error::io(format!("flush {}", path.display()), e))?;
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{EpisodeOutcome, Layout, MazeState, Position};
    use crate::rl::AlgorithmSettings;
    use std::time::Duration;
    use tempfile::TempDir;

    fn key(x: i32) -> StateKey {
        StateKey {
            agent: Position::new(x, 0),
            adversary: Position::new(3, 3),
            trash_remaining: 3,
        }
    }

    #[test]
    fn test_rows_skip_negligible_values() {
        let mut values = ActionValues::new();
        values.set(key(0), Action::Right, 2.5);
        values.set(key(0), Action::Down, 0.0005);
        values.set(key(0), Action::Left, -1.0);

        let rows = action_value_rows(&values);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].action, "Right");
        assert!(rows[0].is_optimal);
        assert_eq!(rows[1].action, "Left");
        assert!(!rows[1].is_optimal);
    }

    #[test]
    fn test_rows_sorted_by_state() {
        let mut values = ActionValues::new();
        values.set(key(2), Action::Up, 1.0);
        values.set(key(1), Action::Up, 1.0);

        let rows = action_value_rows(&values);
        assert_eq!(rows[0].agent_x, 1);
        assert_eq!(rows[1].agent_x, 2);
    }

    #[test]
    fn test_write_action_values_csv() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("table.csv");

        let mut values = ActionValues::new();
        values.set(key(0), Action::Up, -4.0);
        values.set(key(0), Action::Right, 3.0);

        let written = write_action_values_csv(&values, &path).unwrap();
        assert_eq!(written, 2);

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next(),
            Some("agent_x,agent_y,adversary_x,adversary_y,trash_remaining,action,value,is_optimal")
        );
        assert_eq!(lines.next(), Some("0,0,3,3,3,Up,-4.0,false"));
        assert_eq!(lines.next(), Some("0,0,3,3,3,Right,3.0,true"));
    }

    #[test]
    fn test_write_episode_csv() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("episodes.csv");

        let mut log = EpisodeLog::new(&AlgorithmSettings::default());
        let mut state = MazeState::from_layout(&Layout::classic());
        state.total_reward = 48.0;
        state.steps = 9;
        state.terminated = true;
        state.outcome = Some(EpisodeOutcome::ReachedExit);
        log.record(&state, Duration::from_millis(3));
        log.record(&state, Duration::from_millis(5));

        assert_eq!(write_episode_csv(&log, &path).unwrap(), 2);

        let contents = std::fs::read_to_string(&path).unwrap();
        let header = contents.lines().next().unwrap();
        assert!(header.starts_with("episode,algorithm,reward,average_reward,steps"));
        assert_eq!(contents.lines().count(), 3);
        assert!(contents.contains("monte_carlo"));
        assert!(contents.contains("reached_exit"));
    }
}
