//! Record Form Modal
//!
//! Create/edit overlay drawn from the section's field definitions.

use super::dialog::centered_rect;
use crate::app::App;
use crate::resource::{FieldKind, FormState};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, app: &App) {
    let (Some(form), Some(section)) = (&app.form, app.current_section()) else {
        return;
    };
    // The section owns the modal; nothing to draw once it has closed
    if !section.is_modal_open() {
        return;
    }
    let def = section.def();

    let area = centered_rect(60, 80, f.area());
    f.render_widget(Clear, area);

    let title = if form.editing {
        format!(" Edit {} ", def.item_name)
    } else {
        format!(" Add New {} ", def.item_name)
    };
    let hint = if section.is_loading() {
        " Saving... | Enter: save  Esc: cancel"
    } else {
        " Tab/↑↓: field  ←/→: choice  Enter: save  Esc: cancel"
    };
    render_form(f, area, form, &title, hint);
}

/// Field list, error line and key hint inside a bordered block
pub(super) fn render_form(f: &mut Frame, area: Rect, form: &FormState, title: &str, hint: &str) {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            title.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
    if let Some(created) = &form.created_at {
        block = block.title_bottom(
            Line::from(Span::styled(
                format!(" Created {} ", created),
                Style::default().fg(Color::DarkGray),
            ))
            .right_aligned(),
        );
    }
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let label_width = form
        .fields
        .iter()
        .map(|field| field.label.chars().count())
        .max()
        .unwrap_or(0)
        + 2;

    let lines: Vec<Line> = form
        .fields
        .iter()
        .zip(&form.values)
        .enumerate()
        .map(|(i, (field, value))| {
            let focused = i == form.focus;
            let marker = if field.required { "*" } else { " " };
            let label_style = if focused {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };

            let shown = match field.kind {
                FieldKind::Select => format!("◂ {} ▸", value),
                _ if focused => format!("{}_", value),
                _ => value.clone(),
            };
            let value_style = if focused {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };

            Line::from(vec![
                Span::styled(
                    format!(" {:<width$}{} ", field.label, marker, width = label_width),
                    label_style,
                ),
                Span::styled(shown, value_style),
            ])
        })
        .collect();

    // Keep the focused field on screen for long forms
    let visible = chunks[0].height as usize;
    let scroll = form.focus.saturating_sub(visible.saturating_sub(1));
    f.render_widget(
        Paragraph::new(lines).scroll((scroll as u16, 0)),
        chunks[0],
    );

    if let Some(err) = &form.error {
        f.render_widget(
            Paragraph::new(Span::styled(
                format!(" {}", err),
                Style::default().fg(Color::Red),
            ))
            .wrap(Wrap { trim: true }),
            chunks[1],
        );
    }

    f.render_widget(
        Paragraph::new(Span::styled(
            hint.to_string(),
            Style::default().fg(Color::DarkGray),
        )),
        chunks[2],
    );
}
