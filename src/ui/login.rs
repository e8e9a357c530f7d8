//! Login Screen

use super::dialog::centered_rect;
use crate::app::{App, LoginField};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, app: &App) {
    let area = centered_rect(40, 50, f.area());
    let gold = Color::Rgb(212, 175, 55);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(gold))
        .title(Span::styled(
            " Asha LensCraft Admin ",
            Style::default().fg(gold).add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(1),
        ])
        .split(inner);

    let subtitle = if app.auth.has_credentials() {
        Line::from("Sign in to manage the studio")
    } else {
        Line::from(Span::styled(
            "No operator account configured",
            Style::default().fg(Color::Yellow),
        ))
    };
    f.render_widget(
        Paragraph::new(subtitle).alignment(Alignment::Center),
        rows[0],
    );

    let masked = "•".repeat(app.login.password.chars().count());
    render_input(
        f,
        rows[1],
        "Username",
        &app.login.username,
        app.login.field == LoginField::Username,
    );
    render_input(
        f,
        rows[2],
        "Password",
        &masked,
        app.login.field == LoginField::Password,
    );

    if let Some(err) = &app.login.error {
        f.render_widget(
            Paragraph::new(Span::styled(err.as_str(), Style::default().fg(Color::Red)))
                .alignment(Alignment::Center),
            rows[3],
        );
    }

    f.render_widget(
        Paragraph::new(Span::styled(
            "Tab: switch field  Enter: sign in  Ctrl+R: request a booking  Esc: quit",
            Style::default().fg(Color::DarkGray),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true }),
        rows[4],
    );
}

fn render_input(f: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let cursor = if focused { "_" } else { "" };

    let input = Paragraph::new(Line::from(vec![
        Span::raw(value.to_string()),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(format!(" {} ", label)),
    );
    f.render_widget(input, area);
}
