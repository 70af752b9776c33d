//! Live dashboard mode
//!
//! Trains an agent one transition per tick while drawing the maze, the reward
//! curve and the heatmaps. Training stops once the episode budget is spent but
//! the dashboard stays up until the user quits.
//!
//! # Controls
//!
//! - Space: Pause/unpause
//! - 1-4: Speed control (1=slow, 2=normal, 3=fast, 4=very fast)
//! - G/H/V: Toggle reward graph, visit heatmap, value map
//! - Q/Esc: Quit

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Interval, interval};

use super::session::TrainingSession;
use crate::input::{InputHandler, KeyAction};
use crate::render::{Dashboard, Overlay, Panels, Renderer};
use crate::rl::Agent;

/// Playback speed of the live dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchSpeed {
    /// 2 Hz (500ms per step)
    Slow,
    /// `simulation_speed` steps per second from the settings
    Normal,
    /// Four times normal
    Fast,
    /// As fast as the timer allows, several steps per tick
    VeryFast,
}

impl WatchSpeed {
    /// Get the tick interval for this speed
    pub fn tick_interval(&self, simulation_speed: u32) -> Duration {
        let normal = 1000 / u64::from(simulation_speed.max(1));
        match self {
            Self::Slow => Duration::from_millis(500),
            Self::Normal => Duration::from_millis(normal.max(1)),
            Self::Fast => Duration::from_millis((normal / 4).max(1)),
            Self::VeryFast => Duration::from_millis(1),
        }
    }

    /// Environment steps taken on each tick
    pub fn steps_per_tick(&self) -> usize {
        match self {
            Self::VeryFast => 25,
            _ => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slow => "Slow",
            Self::Normal => "Normal",
            Self::Fast => "Fast",
            Self::VeryFast => "Very Fast",
        }
    }
}

pub struct WatchMode<A: Agent> {
    session: TrainingSession<A>,
    renderer: Renderer,
    input_handler: InputHandler,
    overlay: Overlay,
    panels: Panels,
    should_quit: bool,
    paused: bool,
    speed: WatchSpeed,
    /// The last step ended an episode; the overlay clears with the next one
    episode_over: bool,
}

impl<A: Agent> WatchMode<A> {
    pub fn new(session: TrainingSession<A>) -> Self {
        let settings = session.settings();
        let panels = Panels {
            reward_graph: settings.show_reward_graph,
            heatmap: settings.show_heatmap,
            value_map: settings.show_value_map,
        };
        let state = session.state();
        let overlay = Overlay::new(state.grid_width, state.grid_height);

        Self {
            session,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            overlay,
            panels,
            should_quit: false,
            paused: false,
            speed: WatchSpeed::Normal,
            episode_over: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_watch_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_watch_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.tick_interval());

        // Render at 30 FPS
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &mut tick_timer);
                    }
                }

                _ = tick_timer.tick() => {
                    self.tick();
                }

                _ = render_timer.tick() => {
                    self.overlay.fade();
                    terminal.draw(|frame| {
                        self.render_frame(frame);
                    }).context("Failed to draw frame")?;
                }

                // Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Advance training by one tick's worth of steps
    fn tick(&mut self) {
        if self.paused {
            return;
        }

        for _ in 0..self.speed.steps_per_tick() {
            if self.session.is_complete() {
                break;
            }
            if self.episode_over {
                self.overlay.clear();
            }
            let outcome = self.session.step();
            self.episode_over = outcome.finished.is_some();
            let agent = self.session.state().agent;
            self.overlay.mark_step(agent, &outcome.result.info);
        }
    }

    fn handle_event(&mut self, event: Event, tick_timer: &mut Interval) {
        if let Event::Key(key) = event {
            // Only process key press events
            if key.kind != KeyEventKind::Press {
                return;
            }

            let action = self.input_handler.handle_key_event(key);
            if self.apply(action) {
                tick_timer.reset_after(self.tick_interval());
            }
        }
    }

    /// Apply a key action, returning true when the tick rate changed
    fn apply(&mut self, action: KeyAction) -> bool {
        match action {
            KeyAction::TogglePause => self.paused = !self.paused,
            KeyAction::SetSpeed(speed) => {
                let changed = speed != self.speed;
                self.speed = speed;
                return changed;
            }
            KeyAction::ToggleRewardGraph => {
                self.panels.reward_graph = !self.panels.reward_graph;
            }
            KeyAction::ToggleHeatmap => self.panels.heatmap = !self.panels.heatmap,
            KeyAction::ToggleValueMap => self.panels.value_map = !self.panels.value_map,
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
        false
    }

    fn tick_interval(&self) -> Duration {
        self.speed
            .tick_interval(self.session.settings().simulation_speed)
    }

    fn render_frame(&self, frame: &mut ratatui::Frame) {
        let speed = if self.session.is_complete() {
            "Finished"
        } else {
            self.speed.as_str()
        };

        let view = Dashboard {
            algorithm: self.session.agent().algorithm(),
            state: self.session.state(),
            stats: self.session.stats(),
            log: self.session.log(),
            visits: self.session.visits(),
            values: self.session.values(),
            overlay: &self.overlay,
            total_episodes: self.session.settings().episodes as usize,
            paused: self.paused,
            speed,
            panels: self.panels,
        };
        self.renderer.render(frame, &view);
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }

    pub fn session(&self) -> &TrainingSession<A> {
        &self.session
    }

    pub fn into_session(self) -> TrainingSession<A> {
        self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Position;
    use crate::render::Mood;
    use crate::rl::{Algorithm, AlgorithmSettings, QLearningAgent};

    fn watch_mode(episodes: u32) -> WatchMode<QLearningAgent> {
        let settings = AlgorithmSettings {
            algorithm: Algorithm::QLearning,
            episodes,
            max_steps: 20,
            seed: Some(11),
            show_heatmap: false,
            ..Default::default()
        };
        let session =
            TrainingSession::new(&settings, QLearningAgent::from_settings(&settings)).unwrap();
        WatchMode::new(session)
    }

    #[test]
    fn test_watch_speed() {
        assert_eq!(WatchSpeed::Slow.tick_interval(30), Duration::from_millis(500));
        assert_eq!(WatchSpeed::Normal.tick_interval(30), Duration::from_millis(33));
        assert_eq!(WatchSpeed::Fast.tick_interval(30), Duration::from_millis(8));
        assert_eq!(WatchSpeed::VeryFast.tick_interval(30), Duration::from_millis(1));
        assert_eq!(WatchSpeed::Normal.tick_interval(2000), Duration::from_millis(1));
        assert_eq!(WatchSpeed::VeryFast.steps_per_tick(), 25);
        assert_eq!(WatchSpeed::Normal.steps_per_tick(), 1);
    }

    #[test]
    fn test_watch_mode_creation() {
        let mode = watch_mode(3);
        assert!(!mode.paused);
        assert_eq!(mode.speed, WatchSpeed::Normal);
        assert!(mode.panels.reward_graph);
        assert!(!mode.panels.heatmap);
        assert_eq!(mode.session().episodes_done(), 0);
    }

    #[test]
    fn test_key_actions() {
        let mut mode = watch_mode(3);

        assert!(!mode.apply(KeyAction::TogglePause));
        assert!(mode.paused);

        assert!(mode.apply(KeyAction::SetSpeed(WatchSpeed::Fast)));
        assert!(!mode.apply(KeyAction::SetSpeed(WatchSpeed::Fast)));
        assert_eq!(mode.speed, WatchSpeed::Fast);

        mode.apply(KeyAction::ToggleHeatmap);
        assert!(mode.panels.heatmap);
        mode.apply(KeyAction::ToggleValueMap);
        assert!(!mode.panels.value_map);

        mode.apply(KeyAction::Quit);
        assert!(mode.should_quit);
    }

    #[test]
    fn test_paused_tick_does_nothing() {
        let mut mode = watch_mode(3);
        mode.paused = true;
        mode.tick();
        assert_eq!(mode.session().state().steps, 0);
    }

    #[test]
    fn test_overlay_clears_on_new_episode() {
        let mut mode = watch_mode(3);
        while mode.session().episodes_done() == 0 {
            mode.tick();
        }

        mode.overlay.mark(Position::new(5, 5), Mood::Good, 1.0);
        mode.overlay.mark(Position::new(4, 0), Mood::Bad, 1.0);
        mode.tick();

        assert_eq!(mode.overlay.get(Position::new(5, 5)), None);
        assert_eq!(mode.overlay.get(Position::new(4, 0)), None);
        assert_eq!(mode.session().state().steps, 1);
    }

    #[test]
    fn test_ticks_stop_when_complete() {
        let mut mode = watch_mode(2);
        mode.speed = WatchSpeed::VeryFast;

        for _ in 0..10 {
            mode.tick();
        }

        assert!(mode.session().is_complete());
        assert_eq!(mode.session().episodes_done(), 2);
        let steps = mode.session().stats().total_steps();
        mode.tick();
        assert_eq!(mode.session().stats().total_steps(), steps);
    }
}
