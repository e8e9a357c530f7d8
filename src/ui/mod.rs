//! Terminal User Interface rendering module
//!
//! All drawing for lenscraft using the ratatui framework: a login gate,
//! then a sidebar + page layout with modal overlays.
//!
//! # Architecture
//!
//! - [`splash`] - Startup splash screen
//! - `login` - Credential prompt
//! - `booking_request` - Public booking inquiry form
//! - `header` - Product, page and operator info
//! - `sidebar` - Page menu
//! - `dashboard` / `settings` - Non-resource pages
//! - `form` - Create/edit modal built from field definitions
//! - `dialog` - Delete confirmation and notices
//! - `help` - Keyboard reference
//! - `notifications` - Backend call history
//!
//! # Virtual Scrolling
//!
//! Section tables only build the rows inside the viewport, with a
//! scrollbar indicating position.

mod booking_request;
mod dashboard;
mod dialog;
mod form;
mod header;
mod help;
mod login;
mod notifications;
mod settings;
mod sidebar;
pub mod splash;

use crate::app::{App, Focus, Mode, Page};
use crate::notification::NotificationStatus;
use crate::resource::{extract_json_value, format_cell, get_color_for_value, ColumnDef};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Paragraph, Row, Scrollbar, ScrollbarOrientation, ScrollbarState,
        Table, TableState,
    },
    Frame,
};

const SIDEBAR_WIDTH: u16 = 24;

pub fn render(f: &mut Frame, app: &mut App) {
    match app.mode {
        Mode::Login => return login::render(f, app),
        Mode::BookingRequest => return booking_request::render(f, app),
        _ => {},
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Min(1),    // Sidebar + page
            Constraint::Length(1), // Footer/crumb
        ])
        .split(f.area());

    header::render(f, app, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)])
        .split(chunks[1]);

    sidebar::render(f, app, body[0]);
    match app.page {
        Page::Dashboard => dashboard::render(f, app, body[1]),
        Page::Settings => settings::render(f, app, body[1]),
        _ => render_section_table(f, app, body[1]),
    }

    render_crumb(f, app, chunks[2]);

    // Overlays
    match app.mode {
        Mode::Form => form::render(f, app),
        Mode::Confirm | Mode::Warning => dialog::render(f, app),
        Mode::Help => help::render(f),
        Mode::Notifications => notifications::render(f, app),
        Mode::Login | Mode::BookingRequest | Mode::Normal => {},
    }
}

/// Table of the current section's records, virtual-scrolled
fn render_section_table(f: &mut Frame, app: &mut App, area: Rect) {
    let Some(section) = app.current_section() else {
        return;
    };
    let resource = section.def();
    let rows_json = section.rows();
    let loading = section.is_loading();

    let title = format!(" {} [{}] ", resource.title, rows_json.len());
    let border_color = if app.focus == Focus::Content {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    if section.is_empty() {
        let msg = if loading {
            "Loading...".to_string()
        } else {
            format!(
                "No {} yet. Press 'a' to add one.",
                resource.display_name.to_lowercase()
            )
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner_area,
        );
        return;
    }

    // Header row takes one line
    let visible_height = (inner_area.height as usize).saturating_sub(1);
    app.update_viewport(visible_height);
    app.ensure_visible();

    let total_items = rows_json.len();
    let needs_scrollbar = total_items > visible_height;
    let table_area = if needs_scrollbar {
        Rect {
            width: inner_area.width.saturating_sub(1),
            ..inner_area
        }
    } else {
        inner_area
    };

    let range = app.visible_range();

    let header = Row::new(resource.columns.iter().map(|col| {
        Cell::from(format!(" {}", col.header)).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    }))
    .height(1);

    let rows: Vec<Row> = rows_json[range.clone()]
        .iter()
        .map(|item| {
            Row::new(resource.columns.iter().map(|col| {
                let value = extract_json_value(item, &col.json_path);
                let style = get_cell_style(&value, col);
                let shown = format_cell(&value, col.format.as_deref());
                Cell::from(format!(" {}", truncate_string(&shown, 40))).style(style)
            }))
        })
        .collect();

    let widths: Vec<Constraint> = resource
        .columns
        .iter()
        .map(|col| Constraint::Percentage(col.width))
        .collect();

    let table = Table::new(rows, widths).header(header).row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = TableState::default();
    if app.focus == Focus::Content && app.selected >= range.start && app.selected < range.end {
        state.select(Some(app.selected - range.start));
    }
    f.render_stateful_widget(table, table_area, &mut state);

    if needs_scrollbar {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .symbols(symbols::scrollbar::VERTICAL)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));
        let mut scrollbar_state = ScrollbarState::new(total_items.saturating_sub(visible_height))
            .position(app.scroll_offset);
        f.render_stateful_widget(scrollbar, inner_area, &mut scrollbar_state);
    }
}

/// Color a cell through its column's color map
fn get_cell_style(value: &str, col: &ColumnDef) -> Style {
    if let Some(ref color_map_name) = col.color_map {
        if let Some([r, g, b]) = get_color_for_value(color_map_name, value) {
            return Style::default().fg(Color::Rgb(r, g, b));
        }
    }
    Style::default()
}

/// Truncate string to `max_width` terminal columns, cutting only between
/// grapheme clusters so vowel signs and accents stay on their base letter.
pub(crate) fn truncate_string(s: &str, max_width: usize) -> String {
    let span = Span::raw(s);
    if span.width() <= max_width {
        return s.to_string();
    }

    let budget = max_width.saturating_sub(3);
    let mut used = 0;
    let mut truncated = String::new();
    for grapheme in span.styled_graphemes(Style::default()) {
        let width = Span::raw(grapheme.symbol).width();
        if used + width > budget {
            break;
        }
        used += width;
        truncated.push_str(grapheme.symbol);
    }
    format!("{}...", truncated)
}

fn render_crumb(f: &mut Frame, app: &App, area: Rect) {
    let crumb_display = app.get_breadcrumb().join(" > ");
    let manager = &app.notification_manager;
    let toast = manager.current_toast();

    let (status_text, style) = match toast {
        Some(notif) => {
            let color = match notif.status {
                NotificationStatus::Success => Color::Green,
                NotificationStatus::Error(_) => Color::Red,
                NotificationStatus::Pending => Color::Yellow,
            };
            (
                notif.toast_message(manager.detail_level),
                Style::default().fg(color),
            )
        },
        None if app.is_loading() => ("Loading...".to_string(), Style::default().fg(Color::Yellow)),
        None => (String::new(), Style::default().fg(Color::DarkGray)),
    };

    let in_progress = manager.in_progress_count();
    let (indicator, indicator_style) = if in_progress > 0 {
        (
            format!(" [↻{}]", in_progress),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    } else if manager.has_notifications() {
        (" [n]".to_string(), Style::default().fg(Color::DarkGray))
    } else {
        (String::new(), Style::default())
    };

    let crumb = Line::from(vec![
        Span::styled(
            format!("<{}>", crumb_display),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::raw(" "),
        Span::styled(status_text, style),
        Span::styled(indicator, indicator_style),
    ]);

    f.render_widget(Paragraph::new(crumb), area);
}
