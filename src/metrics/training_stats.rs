//! Rolling training statistics
//!
//! Episode-level metrics (reward, length, trash collected, success) and, for
//! the actor-critic agent, per-update losses. Means are taken over a fixed
//! window of the most recent values; totals cover the whole run.
//!
//! The tabular agents never report losses, so their summaries stop after the
//! success rate.
//!
//! # Example
//!
//! ```rust
//! use basurahan_maze::metrics::TrainingStats;
//! use basurahan_maze::rl::LossReport;
//!
//! let mut stats = TrainingStats::new(100);
//!
//! // A run that reached the exit after 14 steps with two pieces of trash
//! stats.record_episode(56.0, 14, 2, true);
//! stats.record_episode(-30.0, 20, 0, false);
//! assert_eq!(stats.success_rate(), 0.5);
//!
//! // An actor-critic update adds the loss columns
//! stats.record_update(&LossReport {
//!     policy_loss: 0.2,
//!     value_loss: 1.5,
//!     entropy: 1.3,
//! });
//! assert!(stats.format_summary().contains("V_Loss"));
//! ```

use std::collections::VecDeque;

use crate::rl::LossReport;

#[derive(Debug, Clone)]
pub struct TrainingStats {
    episode_rewards: VecDeque<f32>,
    episode_lengths: VecDeque<u32>,
    trash_collected: VecDeque<u32>,
    successes: VecDeque<bool>,

    policy_losses: VecDeque<f32>,
    value_losses: VecDeque<f32>,
    entropies: VecDeque<f32>,

    total_episodes: usize,
    total_steps: usize,
    total_successes: usize,
    total_updates: usize,
    best_reward: Option<f32>,

    window_size: usize,
}

impl TrainingStats {
    /// Create a tracker keeping the last `window_size` values of each metric
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            episode_rewards: VecDeque::with_capacity(window_size),
            episode_lengths: VecDeque::with_capacity(window_size),
            trash_collected: VecDeque::with_capacity(window_size),
            successes: VecDeque::with_capacity(window_size),
            policy_losses: VecDeque::with_capacity(window_size),
            value_losses: VecDeque::with_capacity(window_size),
            entropies: VecDeque::with_capacity(window_size),
            total_episodes: 0,
            total_steps: 0,
            total_successes: 0,
            total_updates: 0,
            best_reward: None,
            window_size,
        }
    }

    pub fn record_episode(&mut self, reward: f32, length: u32, trash: u32, success: bool) {
        push_window(&mut self.episode_rewards, reward, self.window_size);
        push_window(&mut self.episode_lengths, length, self.window_size);
        push_window(&mut self.trash_collected, trash, self.window_size);
        push_window(&mut self.successes, success, self.window_size);

        self.total_episodes += 1;
        self.total_steps += length as usize;
        if success {
            self.total_successes += 1;
        }
        self.best_reward = Some(self.best_reward.map_or(reward, |best| best.max(reward)));
    }

    pub fn record_update(&mut self, report: &LossReport) {
        push_window(&mut self.policy_losses, report.policy_loss, self.window_size);
        push_window(&mut self.value_losses, report.value_loss, self.window_size);
        push_window(&mut self.entropies, report.entropy, self.window_size);
        self.total_updates += 1;
    }

    pub fn mean_episode_reward(&self) -> f32 {
        mean_f32(&self.episode_rewards)
    }

    pub fn mean_episode_length(&self) -> f32 {
        mean_u32(&self.episode_lengths)
    }

    pub fn mean_trash_collected(&self) -> f32 {
        mean_u32(&self.trash_collected)
    }

    /// Fraction of windowed episodes that reached the exit
    pub fn success_rate(&self) -> f32 {
        if self.successes.is_empty() {
            return 0.0;
        }
        self.successes.iter().filter(|&&s| s).count() as f32 / self.successes.len() as f32
    }

    pub fn mean_policy_loss(&self) -> f32 {
        mean_f32(&self.policy_losses)
    }

    pub fn mean_value_loss(&self) -> f32 {
        mean_f32(&self.value_losses)
    }

    pub fn mean_entropy(&self) -> f32 {
        mean_f32(&self.entropies)
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn total_successes(&self) -> usize {
        self.total_successes
    }

    pub fn total_updates(&self) -> usize {
        self.total_updates
    }

    pub fn best_reward(&self) -> Option<f32> {
        self.best_reward
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// One-line summary; loss columns appear only once an update was recorded
    pub fn format_summary(&self) -> String {
        let mut summary = format!(
            "Episodes: {} | Steps: {} | Reward: {:.2} | Best: {:.2} | Trash: {:.2} | Len: {:.1} | Success: {:.0}%",
            self.total_episodes,
            self.total_steps,
            self.mean_episode_reward(),
            self.best_reward.unwrap_or(0.0),
            self.mean_trash_collected(),
            self.mean_episode_length(),
            self.success_rate() * 100.0,
        );
        if self.total_updates > 0 {
            summary.push_str(&format!(
                " | P_Loss: {:.4} | V_Loss: {:.4} | Entropy: {:.4}",
                self.mean_policy_loss(),
                self.mean_value_loss(),
                self.mean_entropy(),
            ));
        }
        summary
    }
}

fn mean_f32(deque: &VecDeque<f32>) -> f32 {
    if deque.is_empty() {
        0.0
    } else {
        deque.iter().sum::<f32>() / deque.len() as f32
    }
}

fn mean_u32(deque: &VecDeque<u32>) -> f32 {
    if deque.is_empty() {
        0.0
    } else {
        deque.iter().map(|&v| v as f32).sum::<f32>() / deque.len() as f32
    }
}

fn push_window<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
    if deque.len() >= window_size {
        deque.pop_front();
    }
    deque.push_back(value);
}
