//! Header Component
//!
//! Product name, current page, record count and the signed-in operator.

use crate::app::App;
use crate::VERSION;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" Asha LensCraft v{} ", VERSION),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(32)])
        .split(rows[0]);

    // Row 1: page info on the left, operator on the right
    let mut page_info = vec![
        Span::styled(" Page: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.page.label(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(section) = app.current_section() {
        page_info.push(Span::raw("  "));
        page_info.push(Span::styled("Records: ", Style::default().fg(Color::DarkGray)));
        page_info.push(Span::styled(
            section.len().to_string(),
            Style::default().fg(Color::White),
        ));
    }
    if app.is_loading() {
        page_info.push(Span::styled(
            "  Loading...",
            Style::default().fg(Color::Yellow),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(page_info)), columns[0]);

    let welcome = Line::from(vec![
        Span::styled("Welcome, ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.current_user(),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ]);
    f.render_widget(
        Paragraph::new(welcome).alignment(Alignment::Right),
        columns[1],
    );

    // Row 2: key hints
    let hints = if app.current_section().is_some() {
        " a:add  e:edit  d:delete  R:refresh  Tab:focus  n:notifications  ?:help  q:quit"
    } else {
        " 1-8:pages  Tab:focus  n:notifications  L:logout  ?:help  q:quit"
    };
    f.render_widget(
        Paragraph::new(Span::styled(hints, Style::default().fg(Color::DarkGray))),
        rows[1],
    );
}
