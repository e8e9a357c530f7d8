//! Splash Screen
//!
//! Loading screen shown while the console starts up.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Splash screen state
pub struct SplashState {
    message: String,
    completed_steps: usize,
    total_steps: usize,
}

impl SplashState {
    pub fn new(total_steps: usize) -> Self {
        Self {
            message: "Starting...".to_string(),
            completed_steps: 0,
            total_steps: total_steps.max(1),
        }
    }

    pub fn set_message(&mut self, message: &str) {
        self.message = message.to_string();
    }

    pub fn complete_step(&mut self) {
        self.completed_steps = (self.completed_steps + 1).min(self.total_steps);
    }

    fn percent(&self) -> u16 {
        (self.completed_steps * 100 / self.total_steps) as u16
    }
}

pub fn render(f: &mut Frame, state: &SplashState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Length(9),
            Constraint::Percentage(35),
        ])
        .split(f.area());

    let center = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(50),
            Constraint::Percentage(25),
        ])
        .split(rows[1])[1];

    let gold = Style::default().fg(Color::Rgb(212, 175, 55));
    let logo = vec![
        Line::from(""),
        Line::from(Span::styled(
            "◉  ASHA LENSCRAFT  ◉",
            gold.add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Studio admin console",
            Style::default().fg(Color::White),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(center);
    f.render_widget(block, center);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(inner);

    f.render_widget(
        Paragraph::new(logo).alignment(Alignment::Center),
        chunks[0],
    );

    let progress = Gauge::default()
        .gauge_style(gold)
        .percent(state.percent())
        .label(Span::styled(
            state.message.as_str(),
            Style::default().fg(Color::White),
        ));
    f.render_widget(progress, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_never_exceeds_total() {
        let mut state = SplashState::new(2);
        assert_eq!(state.percent(), 0);
        state.complete_step();
        assert_eq!(state.percent(), 50);
        state.complete_step();
        state.complete_step();
        assert_eq!(state.percent(), 100);
    }
}
