use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, Paragraph},
};

use super::overlay::{Mood, Overlay};
use crate::maze::{Cell, MazeState, Position};
use crate::metrics::{EpisodeLog, TrainingStats, ValueHeatmap, VisitHeatmap};
use crate::rl::Algorithm;

/// Which optional panels are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panels {
    pub reward_graph: bool,
    pub heatmap: bool,
    pub value_map: bool,
}

impl Default for Panels {
    fn default() -> Self {
        Self {
            reward_graph: true,
            heatmap: true,
            value_map: true,
        }
    }
}

/// Everything one dashboard frame shows
pub struct Dashboard<'a> {
    pub algorithm: Algorithm,
    pub state: &'a MazeState,
    pub stats: &'a TrainingStats,
    pub log: &'a EpisodeLog,
    pub visits: &'a VisitHeatmap,
    pub values: &'a ValueHeatmap,
    pub overlay: &'a Overlay,
    pub total_episodes: usize,
    pub paused: bool,
    pub speed: &'static str,
    pub panels: Panels,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, view: &Dashboard) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(10),   // Maze and chart
                Constraint::Length(view.state.grid_height as u16 + 2), // Heatmaps
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_header(view), chunks[0]);

        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[1]);

        frame.render_widget(self.render_maze(view.state, view.overlay), top[0]);
        if view.panels.reward_graph {
            self.render_reward_chart(frame, top[1], view.log);
        } else {
            frame.render_widget(self.render_top_episodes(view.log), top[1]);
        }

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[2]);

        if view.panels.heatmap {
            frame.render_widget(self.render_visits(view.visits), bottom[0]);
        }
        if view.panels.value_map {
            frame.render_widget(self.render_values(view.values), bottom[1]);
        }

        frame.render_widget(self.render_footer(view.stats), chunks[3]);
    }

    fn render_header(&self, view: &Dashboard) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        let mut spans = vec![
            Span::styled(
                view.algorithm.display_name(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Episode: ", label),
            Span::styled(
                format!(
                    "{}/{}",
                    (view.log.len() + 1).min(view.total_episodes),
                    view.total_episodes
                ),
                value,
            ),
            Span::raw("    "),
            Span::styled("Step: ", label),
            Span::styled(view.state.steps.to_string(), value),
            Span::raw("    "),
            Span::styled("Reward: ", label),
            Span::styled(format!("{:.1}", view.state.total_reward), value),
            Span::raw("    "),
            Span::styled("Trash: ", label),
            Span::styled(
                format!("{}/{}", view.state.trash_collected(), view.state.initial_trash),
                value,
            ),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(view.speed, value),
        ];
        if view.paused {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                "PAUSED",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::BOTTOM))
    }

    fn render_maze(&self, state: &MazeState, overlay: &Overlay) -> Paragraph<'_> {
        let mut lines = Vec::with_capacity(state.grid_height);

        for y in 0..state.grid_height {
            let mut spans = Vec::with_capacity(state.grid_width);
            for x in 0..state.grid_width {
                let pos = Position::new(x as i32, y as i32);
                let (glyph, mut style) = cell_glyph(state, pos);
                if let Some((mood, strength)) = overlay.get(pos) {
                    style = style.bg(mood_color(mood, strength));
                }
                spans.push(Span::styled(glyph, style));
            }
            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Basurahan Maze "),
            )
            .alignment(Alignment::Center)
    }

    fn render_reward_chart(&self, frame: &mut Frame, area: Rect, log: &EpisodeLog) {
        let rewards: Vec<(f64, f64)> = log
            .records()
            .iter()
            .map(|r| (r.episode as f64, r.reward as f64))
            .collect();
        let averages: Vec<(f64, f64)> = log
            .records()
            .iter()
            .map(|r| (r.episode as f64, r.average_reward as f64))
            .collect();

        let (y_min, y_max) = rewards
            .iter()
            .fold(None, |acc: Option<(f64, f64)>, &(_, y)| match acc {
                Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
                None => Some((y, y)),
            })
            .map_or((-1.0, 1.0), |(lo, hi)| (lo - 1.0, hi + 1.0));
        let x_max = (rewards.len() as f64).max(2.0);

        let datasets = vec![
            Dataset::default()
                .name("reward")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Cyan))
                .data(&rewards),
            Dataset::default()
                .name("mean of 10")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Yellow))
                .data(&averages),
        ];

        let chart = Chart::new(datasets)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Episode Rewards "),
            )
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(Color::Gray))
                    .bounds([1.0, x_max])
                    .labels(vec!["1".to_string(), format!("{}", x_max as usize)]),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(Color::Gray))
                    .bounds([y_min, y_max])
                    .labels(vec![format!("{:.0}", y_min), format!("{:.0}", y_max)]),
            );

        frame.render_widget(chart, area);
    }

    fn render_top_episodes(&self, log: &EpisodeLog) -> Paragraph<'_> {
        let lines: Vec<Line> = log
            .top_episodes(5)
            .into_iter()
            .map(|r| {
                Line::from(format!(
                    "#{:<4} {:>8.1}  {:>3} steps  {}",
                    r.episode,
                    r.reward,
                    r.steps,
                    r.outcome.as_str()
                ))
            })
            .collect();

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Top Episodes "),
        )
    }

    fn render_visits(&self, visits: &VisitHeatmap) -> Paragraph<'_> {
        let mut lines = Vec::with_capacity(visits.height());
        for y in 0..visits.height() {
            let spans: Vec<Span> = (0..visits.width())
                .map(|x| {
                    let t = visits.intensity(Position::new(x as i32, y as i32));
                    Span::styled("  ", Style::default().bg(visit_color(t)))
                })
                .collect();
            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Visits (max {}) ", visits.max())),
            )
    }

    fn render_values(&self, values: &ValueHeatmap) -> Paragraph<'_> {
        let mut lines = Vec::with_capacity(values.height());
        for y in 0..values.height() {
            let spans: Vec<Span> = (0..values.width())
                .map(|x| match values.intensity(Position::new(x as i32, y as i32)) {
                    Some(t) => Span::styled("  ", Style::default().bg(value_color(t))),
                    None => Span::styled("··", Style::default().fg(Color::DarkGray)),
                })
                .collect();
            lines.push(Line::from(spans));
        }

        let title = match (values.min(), values.max()) {
            (Some(lo), Some(hi)) => format!(" State Values ({:.1} .. {:.1}) ", lo, hi),
            _ => " State Values ".to_string(),
        };

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(title))
    }

    fn render_footer(&self, stats: &TrainingStats) -> Paragraph<'_> {
        let text = vec![
            Line::from(Span::styled(
                stats.format_summary(),
                Style::default().fg(Color::Gray),
            )),
            Line::from(vec![
                Span::styled("Space", Style::default().fg(Color::Cyan)),
                Span::raw(" pause | "),
                Span::styled("1-4", Style::default().fg(Color::Cyan)),
                Span::raw(" speed | "),
                Span::styled("G/H/V", Style::default().fg(Color::Cyan)),
                Span::raw(" panels | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn cell_glyph(state: &MazeState, pos: Position) -> (&'static str, Style) {
    if pos == state.agent {
        return (
            "A ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    }
    if pos == state.adversary {
        return (
            "X ",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        );
    }
    match state.cell(pos) {
        Some(Cell::Wall) => ("██", Style::default().fg(Color::Gray)),
        Some(Cell::Trash) => ("T ", Style::default().fg(Color::Green)),
        Some(Cell::Hazard) => (
            "M ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Some(Cell::Exit) => (
            "E ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Some(Cell::Empty) | None => (". ", Style::default().fg(Color::DarkGray)),
    }
}

fn scale(t: f32) -> u8 {
    (t.clamp(0.0, 1.0) * 255.0) as u8
}

fn mood_color(mood: Mood, strength: f32) -> Color {
    let level = scale(strength * 0.8);
    match mood {
        Mood::Good => Color::Rgb(0, level, 0),
        Mood::Bad => Color::Rgb(level, 0, 0),
    }
}

/// Dark blue for rarely visited cells through to yellow for the busiest
fn visit_color(t: f32) -> Color {
    Color::Rgb(scale(t), scale(t), scale(0.4 * (1.0 - t)))
}

/// Red for the lowest value through to green for the highest
fn value_color(t: f32) -> Color {
    Color::Rgb(scale(1.0 - t), scale(t), 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Layout as MazeLayout;
    use crate::rl::AlgorithmSettings;
    use ratatui::{Terminal, backend::TestBackend};
    use std::time::Duration;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_cell_glyphs() {
        let state = MazeState::from_layout(&MazeLayout::classic());
        assert_eq!(cell_glyph(&state, Position::new(0, 0)).0, "A ");
        assert_eq!(cell_glyph(&state, Position::new(3, 3)).0, "X ");
        assert_eq!(cell_glyph(&state, Position::new(1, 1)).0, "██");
        assert_eq!(cell_glyph(&state, Position::new(2, 0)).0, "T ");
        assert_eq!(cell_glyph(&state, Position::new(2, 2)).0, "M ");
        assert_eq!(cell_glyph(&state, Position::new(5, 5)).0, "E ");
    }

    #[test]
    fn test_colour_scales() {
        assert_eq!(value_color(0.0), Color::Rgb(255, 0, 0));
        assert_eq!(value_color(1.0), Color::Rgb(0, 255, 0));
        assert_eq!(mood_color(Mood::Good, 0.0), Color::Rgb(0, 0, 0));
    }

    #[test]
    fn test_render_dashboard() {
        let settings = AlgorithmSettings::default();
        let mut state = MazeState::from_layout(&MazeLayout::classic());
        let stats = TrainingStats::new(10);
        let mut log = EpisodeLog::new(&settings);
        state.total_reward = 12.0;
        state.terminated = true;
        log.record(&state, Duration::ZERO);

        let mut visits = VisitHeatmap::new(6, 6);
        visits.record(Position::new(0, 0));
        let mut values = ValueHeatmap::new(6, 6);
        values.record(Position::new(0, 0), 1.5);
        let overlay = Overlay::new(6, 6);

        let view = Dashboard {
            algorithm: Algorithm::QLearning,
            state: &state,
            stats: &stats,
            log: &log,
            visits: &visits,
            values: &values,
            overlay: &overlay,
            total_episodes: 200,
            paused: true,
            speed: "Normal",
            panels: Panels::default(),
        };

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal
            .draw(|frame| Renderer::new().render(frame, &view))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Q-Learning"));
        assert!(text.contains("2/200"));
        assert!(text.contains("PAUSED"));
        assert!(text.contains("Basurahan Maze"));
        assert!(text.contains("Episode Rewards"));
    }
}
