//! Settings
//!
//! Read-only view of the effective configuration.

use crate::app::App;
use crate::config::Config;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn setting<'a>(name: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!(" {:<22}", name), Style::default().fg(Color::DarkGray)),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

fn path_or_none(path: Option<&std::path::Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not available)".to_string())
}

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let config_path = app.config_path.clone().or_else(Config::config_path);
    let token = if app.config.effective_token().is_some() {
        "configured"
    } else {
        "none"
    };

    let lines = vec![
        Line::from(""),
        setting("Signed in as", app.current_user()),
        setting("API base URL", app.api_url.clone()),
        setting("API token", token.to_string()),
        setting("Config file", path_or_none(config_path.as_deref())),
        setting("Log file", path_or_none(app.log_path.as_deref())),
        setting(
            "Notification detail",
            app.notification_manager.detail_level.as_str().to_string(),
        ),
        setting(
            "Toast duration",
            format!("{}s", app.notification_manager.toast_duration.as_secs()),
        ),
        Line::from(""),
        Line::from(Span::styled(
            " Edit the config file and restart to change these values.",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Settings ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    f.render_widget(Paragraph::new(lines).block(block), area);
}
