//! Notifications Panel UI
//!
//! History of backend calls with their outcome.

use super::dialog::centered_rect;
use super::truncate_string;
use crate::app::App;
use crate::notification::NotificationStatus;
use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame,
};

/// Render the notifications history panel as an overlay
pub fn render(f: &mut Frame, app: &App) {
    let popup_area = centered_rect(80, 70, f.area());
    f.render_widget(Clear, popup_area);

    let manager = &app.notification_manager;
    let title = match (manager.in_progress_count(), manager.error_count()) {
        (0, 0) => " Notifications ".to_string(),
        (pending, 0) => format!(" Notifications [{} pending] ", pending),
        (pending, errors) => format!(" Notifications [{} pending, {} failed] ", pending, errors),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner_area = block.inner(popup_area);
    f.render_widget(block, popup_area);

    if !manager.has_notifications() {
        let msg = Paragraph::new("Nothing has happened yet")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(msg, inner_area);
        return;
    }

    let header = Row::new(
        [" ", " ACTION", " SECTION", " RECORD", " RESULT", " WHEN"].map(|h| {
            Cell::from(h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        }),
    );

    let rows = manager.notifications.iter().map(|notif| {
        let color = match &notif.status {
            NotificationStatus::Pending => Color::Yellow,
            NotificationStatus::Success => Color::Green,
            NotificationStatus::Error(_) => Color::Red,
        };
        let result = match &notif.status {
            NotificationStatus::Error(err) => err.clone(),
            NotificationStatus::Pending => "waiting".to_string(),
            NotificationStatus::Success => notif.duration_display(),
        };

        Row::new(vec![
            Cell::from(format!(" {}", notif.status.icon())).style(Style::default().fg(color)),
            Cell::from(format!(" {}", notif.operation_type.display_name())),
            Cell::from(format!(" {}", notif.section)),
            Cell::from(format!(" {}", truncate_string(&notif.subject, 28))),
            Cell::from(format!(" {}", truncate_string(&result, 40))).style(Style::default().fg(color)),
            Cell::from(format!(" {}", format_time_ago(notif.created_at.elapsed()))),
        ])
    });

    let widths = [
        Constraint::Length(3),
        Constraint::Length(9),
        Constraint::Length(14),
        Constraint::Min(16),
        Constraint::Min(16),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths).header(header).row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = TableState::default();
    state.select(Some(app.notifications_selected));
    f.render_stateful_widget(table, inner_area, &mut state);

    let help_area = Rect::new(
        popup_area.x + 1,
        popup_area.y + popup_area.height.saturating_sub(1),
        popup_area.width.saturating_sub(2),
        1,
    );
    let help = Line::from(vec![
        Span::styled("j/k", Style::default().fg(Color::Yellow)),
        Span::raw(": navigate  "),
        Span::styled("c", Style::default().fg(Color::Yellow)),
        Span::raw(": clear  "),
        Span::styled("q/n/Esc", Style::default().fg(Color::Yellow)),
        Span::raw(": close"),
    ]);
    f.render_widget(Paragraph::new(help).alignment(Alignment::Center), help_area);
}

/// Format elapsed time as human-readable string
fn format_time_ago(elapsed: std::time::Duration) -> String {
    let secs = elapsed.as_secs();
    if secs < 60 {
        format!("{}s ago", secs)
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else {
        format!("{}h ago", secs / 3600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_time_ago() {
        assert_eq!(format_time_ago(Duration::from_secs(5)), "5s ago");
        assert_eq!(format_time_ago(Duration::from_secs(125)), "2m ago");
        assert_eq!(format_time_ago(Duration::from_secs(7200)), "2h ago");
    }
}
