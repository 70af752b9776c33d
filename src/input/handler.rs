use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::modes::WatchSpeed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    TogglePause,
    SetSpeed(WatchSpeed),
    ToggleRewardGraph,
    ToggleHeatmap,
    ToggleValueMap,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Playback
            KeyCode::Char(' ') => KeyAction::TogglePause,
            KeyCode::Char('1') => KeyAction::SetSpeed(WatchSpeed::Slow),
            KeyCode::Char('2') => KeyAction::SetSpeed(WatchSpeed::Normal),
            KeyCode::Char('3') => KeyAction::SetSpeed(WatchSpeed::Fast),
            KeyCode::Char('4') => KeyAction::SetSpeed(WatchSpeed::VeryFast),

            // Panels
            KeyCode::Char('g') | KeyCode::Char('G') => KeyAction::ToggleRewardGraph,
            KeyCode::Char('h') | KeyCode::Char('H') => KeyAction::ToggleHeatmap,
            KeyCode::Char('v') | KeyCode::Char('V') => KeyAction::ToggleValueMap,

            // Controls
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pause_key() {
        let handler = InputHandler::new();

        let space = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        assert_eq!(handler.handle_key_event(space), KeyAction::TogglePause);
    }

    #[test]
    fn test_speed_keys() {
        let handler = InputHandler::new();

        let expected = [
            ('1', WatchSpeed::Slow),
            ('2', WatchSpeed::Normal),
            ('3', WatchSpeed::Fast),
            ('4', WatchSpeed::VeryFast),
        ];
        for (c, speed) in expected {
            let key = KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
            assert_eq!(handler.handle_key_event(key), KeyAction::SetSpeed(speed));
        }
    }

    #[test]
    fn test_panel_toggles() {
        let handler = InputHandler::new();

        let g = KeyEvent::new(KeyCode::Char('g'), KeyModifiers::NONE);
        assert_eq!(handler.handle_key_event(g), KeyAction::ToggleRewardGraph);

        let h_upper = KeyEvent::new(KeyCode::Char('H'), KeyModifiers::SHIFT);
        assert_eq!(handler.handle_key_event(h_upper), KeyAction::ToggleHeatmap);

        let v = KeyEvent::new(KeyCode::Char('v'), KeyModifiers::NONE);
        assert_eq!(handler.handle_key_event(v), KeyAction::ToggleValueMap);
    }

    #[test]
    fn test_quit_keys() {
        let handler = InputHandler::new();

        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(handler.handle_key_event(q), KeyAction::Quit);

        let q_upper = KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::SHIFT);
        assert_eq!(handler.handle_key_event(q_upper), KeyAction::Quit);

        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(handler.handle_key_event(esc), KeyAction::Quit);
    }

    #[test]
    fn test_unknown_key() {
        let handler = InputHandler::new();

        let x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(handler.handle_key_event(x), KeyAction::None);

        let up = KeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(handler.handle_key_event(up), KeyAction::None);
    }

    #[test]
    fn test_ctrl_c() {
        let handler = InputHandler::new();

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key_event(ctrl_c), KeyAction::Quit);
    }
}
