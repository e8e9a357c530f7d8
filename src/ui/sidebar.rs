//! Sidebar
//!
//! Page menu in the studio's order, ending with the logout entry.

use crate::app::{App, Focus, Page};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Sidebar;

    let mut items: Vec<ListItem> = Page::ALL
        .iter()
        .enumerate()
        .map(|(i, page)| {
            let active = *page == app.page;
            let marker = if active { "▸" } else { " " };
            let style = if active {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} {} ", marker, i + 1), Style::default().fg(Color::DarkGray)),
                Span::styled(page.label(), style),
            ]))
        })
        .collect();

    items.push(ListItem::new(Line::from(vec![
        Span::raw("    "),
        Span::styled("Logout", Style::default().fg(Color::Red)),
    ])));

    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(Span::styled(
                    " Asha LensCraft ",
                    Style::default()
                        .fg(Color::Rgb(212, 175, 55))
                        .add_modifier(Modifier::BOLD),
                )),
        )
        .highlight_style(if focused {
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        });

    let mut state = ListState::default();
    state.select(Some(app.sidebar_selected));
    f.render_stateful_widget(list, area, &mut state);
}
