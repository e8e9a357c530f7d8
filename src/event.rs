//! Event Handling
//!
//! Keyboard and event handling for lenscraft.

use crate::app::{App, Focus, LoginField, Mode, Page};
use crate::resource::{Confirmation, FormState};
use anyhow::Result;
use crossterm::event::{poll, read, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Handle events, returns true if app should quit
pub fn handle_events(app: &mut App) -> Result<bool> {
    if poll(Duration::from_millis(100))? {
        if let Event::Key(key) = read()? {
            if key.kind != KeyEventKind::Press {
                return Ok(false);
            }
            return Ok(handle_key_event(app, key.code, key.modifiers));
        }
    }
    Ok(false)
}

pub fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
    // Global quit shortcut
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match app.mode {
        Mode::Login => handle_login_mode(app, code, modifiers),
        Mode::BookingRequest => handle_booking_request_mode(app, code, modifiers),
        Mode::Normal => handle_normal_mode(app, code, modifiers),
        Mode::Form => handle_form_mode(app, code, modifiers),
        Mode::Confirm => handle_confirm_mode(app, code),
        Mode::Warning => handle_warning_mode(app, code),
        Mode::Help => handle_help_mode(app, code),
        Mode::Notifications => handle_notifications_mode(app, code),
    }
}

fn handle_login_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
    if code == KeyCode::Char('r') && modifiers.contains(KeyModifiers::CONTROL) {
        app.open_booking_request();
        return false;
    }

    let login = &mut app.login;
    match code {
        KeyCode::Esc => return true,
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
            login.field = match login.field {
                LoginField::Username => LoginField::Password,
                LoginField::Password => LoginField::Username,
            };
        },
        KeyCode::Enter => {
            if login.field == LoginField::Username && login.password.is_empty() {
                login.field = LoginField::Password;
            } else {
                app.submit_login();
            }
        },
        KeyCode::Backspace => {
            match login.field {
                LoginField::Username => login.username.pop(),
                LoginField::Password => login.password.pop(),
            };
        },
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
            login.error = None;
            match login.field {
                LoginField::Username => login.username.push(c),
                LoginField::Password => login.password.push(c),
            }
        },
        _ => {},
    }
    false
}

fn handle_normal_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        // Quit
        KeyCode::Char('q') => return true,

        // Navigation - vim style + accessible alternatives
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.previous(),
        KeyCode::Home | KeyCode::Char('g') => app.go_to_top(),
        KeyCode::End | KeyCode::Char('G') => app.go_to_bottom(),
        KeyCode::PageDown => app.page_down(10),
        KeyCode::PageUp => app.page_up(10),
        KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => app.page_down(10),
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => app.page_up(10),

        KeyCode::Tab | KeyCode::BackTab => app.toggle_focus(),
        KeyCode::Left | KeyCode::Char('h') => app.focus = Focus::Sidebar,
        KeyCode::Right | KeyCode::Char('l') => app.toggle_focus_to_content(),

        // Jump straight to a page
        KeyCode::Char(c @ '1'..='8') => {
            let idx = (c as u8 - b'1') as usize;
            if let Some(page) = Page::ALL.get(idx) {
                app.select_page(*page);
            }
        },

        KeyCode::Enter => match app.focus {
            Focus::Sidebar => app.activate_sidebar(),
            Focus::Content => app.open_edit_form(),
        },

        // Record operations
        KeyCode::Char('a') => app.open_create_form(),
        KeyCode::Char('e') => app.open_edit_form(),
        KeyCode::Char('d') | KeyCode::Delete => {
            if app.focus == Focus::Content {
                app.request_delete();
            }
        },

        // Refresh
        KeyCode::Char('R') => app.refresh_current(),

        KeyCode::Char('n') => app.enter_notifications_mode(),
        KeyCode::Char('?') => app.enter_help_mode(),
        KeyCode::Char('L') => app.logout(),

        _ => {},
    }
    false
}

fn handle_form_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
    let Some(form) = app.form.as_mut() else {
        app.exit_mode();
        return false;
    };

    match code {
        KeyCode::Esc => app.cancel_form(),
        KeyCode::Enter => app.submit_form(),
        _ => edit_form(form, code, modifiers),
    }
    false
}

fn handle_booking_request_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
    let Some(request) = app.booking_request.as_mut() else {
        app.close_booking_request();
        return false;
    };

    // Read-only once sent
    let sent = request.confirmation.is_some();

    match code {
        KeyCode::Esc => app.close_booking_request(),
        KeyCode::Enter => app.submit_booking_request(),
        _ if sent => {},
        _ => edit_form(&mut request.form, code, modifiers),
    }
    false
}

/// Keys shared by every field-based form
fn edit_form(form: &mut FormState, code: KeyCode, modifiers: KeyModifiers) {
    match code {
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.previous_field(),
        KeyCode::Left => form.cycle_option(false),
        KeyCode::Right => form.cycle_option(true),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => form.clear_field(),
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => form.input_char(c),
        _ => {},
    }
}

fn handle_confirm_mode(app: &mut App, code: KeyCode) -> bool {
    match code {
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
            app.resolve_confirm(Confirmation::Declined);
        },
        KeyCode::Left | KeyCode::Char('h') => {
            if let Some(ref mut pending) = app.pending_action {
                pending.selected_yes = true;
            }
        },
        KeyCode::Right | KeyCode::Char('l') => {
            if let Some(ref mut pending) = app.pending_action {
                pending.selected_yes = false;
            }
        },
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.resolve_confirm(Confirmation::Confirmed);
        },
        KeyCode::Enter => {
            let confirmed = app
                .pending_action
                .as_ref()
                .is_some_and(|pending| pending.selected_yes);
            app.resolve_confirm(if confirmed {
                Confirmation::Confirmed
            } else {
                Confirmation::Declined
            });
        },
        _ => {},
    }
    false
}

fn handle_warning_mode(app: &mut App, code: KeyCode) -> bool {
    if matches!(code, KeyCode::Esc | KeyCode::Enter) {
        app.exit_mode();
    }
    false
}

fn handle_help_mode(app: &mut App, code: KeyCode) -> bool {
    if matches!(
        code,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Enter
    ) {
        app.exit_mode();
    }
    false
}

fn handle_notifications_mode(app: &mut App, code: KeyCode) -> bool {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('n') => app.exit_mode(),
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.previous(),
        KeyCode::Char('c') => {
            app.notification_manager.clear();
            app.notifications_selected = 0;
        },
        _ => {},
    }
    false
}
