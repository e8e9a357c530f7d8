//! Help Overlay
//!
//! Keyboard reference for every screen.

use super::dialog::centered_rect;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("Tab", "Switch between sidebar and table"),
            ("1-8", "Jump to a page"),
            ("j/k, ↑/↓", "Move up/down"),
            ("g/G", "Top/bottom"),
            ("Ctrl+d/u", "Page down/up"),
            ("Enter", "Open page / edit record"),
        ],
    ),
    (
        "Records",
        &[
            ("a", "Add a record"),
            ("e", "Edit selected record"),
            ("d, Del", "Delete selected record"),
            ("R", "Reload section from the server"),
        ],
    ),
    (
        "Forms",
        &[
            ("Tab/Shift+Tab", "Next/previous field"),
            ("←/→", "Change a choice field"),
            ("Ctrl+u", "Clear field"),
            ("Enter", "Save"),
            ("Esc", "Cancel"),
        ],
    ),
    (
        "General",
        &[
            ("n", "Notification history"),
            ("L", "Log out"),
            ("?", "Toggle help"),
            ("q, Ctrl+c", "Quit"),
        ],
    ),
];

pub fn render(f: &mut Frame) {
    let popup_area = centered_rect(60, 80, f.area());
    f.render_widget(Clear, popup_area);

    let key_style = Style::default().fg(Color::Yellow);
    let mut lines = Vec::new();
    for (title, keys) in SECTIONS {
        lines.push(Line::from(Span::styled(
            *title,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for (key, action) in keys.iter() {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<16}", key), key_style),
                Span::raw(*action),
            ]));
        }
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "Press ?, q or Esc to close",
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Keyboard Shortcuts ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    f.render_widget(Paragraph::new(lines).block(block), popup_area);
}
