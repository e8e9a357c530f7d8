//! Booking Request Screen
//!
//! Public inquiry form reachable from the login screen.

use super::dialog::centered_rect;
use super::form::render_form;
use crate::app::App;
use crate::notification::NotificationStatus;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, app: &App) {
    let Some(request) = &app.booking_request else {
        return;
    };
    let gold = Color::Rgb(212, 175, 55);

    let outer = centered_rect(70, 90, f.area());
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .split(outer);

    let title = format!(" {} ", request.def.title);
    match &request.confirmation {
        None => render_form(
            f,
            rows[0],
            &request.form,
            &title,
            " Tab/↑↓: field  ←/→: choice  Enter: send request  Esc: back",
        ),
        Some(message) => {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(gold))
                .title(Span::styled(
                    " Request Received ",
                    Style::default().fg(gold).add_modifier(Modifier::BOLD),
                ))
                .title_alignment(Alignment::Center);
            let text = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "✓",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(message.as_str()),
                Line::from(""),
                Line::from(Span::styled(
                    "Enter: send another request  Esc: back to sign in",
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            f.render_widget(
                Paragraph::new(text)
                    .block(block)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true }),
                rows[0],
            );
        },
    }

    let note = request.def.note.as_str();
    if !note.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(note, Style::default().fg(gold)))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            rows[1],
        );
    }

    let manager = &app.notification_manager;
    if let Some(toast) = manager.current_toast() {
        let color = match toast.status {
            NotificationStatus::Success => Color::Green,
            NotificationStatus::Error(_) => Color::Red,
            NotificationStatus::Pending => Color::Yellow,
        };
        f.render_widget(
            Paragraph::new(Span::styled(
                toast.toast_message(manager.detail_level),
                Style::default().fg(color),
            ))
            .alignment(Alignment::Center),
            rows[2],
        );
    }
}
