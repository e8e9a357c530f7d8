//! Dashboard
//!
//! One stat card per section that defines a summary.

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const CARD_COLORS: [Color; 4] = [Color::Cyan, Color::Green, Color::Red, Color::Yellow];

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Dashboard ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let cards: Vec<(String, String, bool)> = app
        .sections
        .iter()
        .filter_map(|s| s.summary().map(|(label, value)| (label, value, s.is_loading())))
        .collect();

    if cards.is_empty() {
        f.render_widget(
            Paragraph::new("No summaries available").alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(5), Constraint::Min(0)])
        .split(inner);

    let card_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, cards.len() as u32); cards.len()])
        .split(rows[1]);

    for (i, ((label, value, loading), card_area)) in cards.iter().zip(card_areas.iter()).enumerate() {
        let color = CARD_COLORS[i % CARD_COLORS.len()];
        let shown = if *loading { "…".to_string() } else { value.clone() };

        let card = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                shown,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(format!(" {} ", label)),
        );
        f.render_widget(card, *card_area);
    }
}
