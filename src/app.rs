//! Application State
//!
//! Central application state management for lenscraft.

use crate::auth::AuthService;
use crate::config::Config;
use crate::notification::{DetailLevel, NotificationManager};
use crate::resource::record::{FormData, RecordId};
use crate::resource::{get_form, Confirmation, FormState, PublicFormDef, ResourceDef, SectionView};
use std::ops::Range;
use std::path::PathBuf;
use std::time::Duration;

/// Default viewport height (will be updated during render based on terminal size)
const DEFAULT_VIEWPORT_HEIGHT: usize = 20;

/// Registry key of the public booking request form
const BOOKING_REQUEST_FORM: &str = "booking_request";

/// Application modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Login,          // Credential prompt
    BookingRequest, // Public booking request (before login)
    Normal,         // Sidebar + page
    Form,           // Create/edit modal
    Confirm,        // Delete confirmation
    Warning,        // Info dialog (OK only)
    Help,           // ? help popup
    Notifications,  // Notifications history panel
}

/// Pages reachable from the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Bookings,
    Contacts,
    Photos,
    Collections,
    Expenditures,
    Others,
    Settings,
}

impl Page {
    /// Sidebar order
    pub const ALL: [Page; 8] = [
        Page::Dashboard,
        Page::Bookings,
        Page::Contacts,
        Page::Photos,
        Page::Collections,
        Page::Expenditures,
        Page::Others,
        Page::Settings,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Bookings => "Booking",
            Page::Contacts => "Contact",
            Page::Photos => "Photo List",
            Page::Collections => "Collection",
            Page::Expenditures => "Expenditure",
            Page::Others => "Other",
            Page::Settings => "Settings",
        }
    }

    /// Registry key of the section shown on this page
    pub fn resource_key(&self) -> Option<&'static str> {
        match self {
            Page::Bookings => Some("bookings"),
            Page::Contacts => Some("contacts"),
            Page::Photos => Some("photos"),
            Page::Collections => Some("collections"),
            Page::Expenditures => Some("expenditures"),
            Page::Others => Some("others"),
            Page::Dashboard | Page::Settings => None,
        }
    }

    /// Stable name stored in the config file
    pub fn key(&self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::Settings => "settings",
            other => other.resource_key().unwrap_or("dashboard"),
        }
    }

    pub fn from_key(key: &str) -> Option<Page> {
        Page::ALL.into_iter().find(|p| p.key() == key)
    }
}

/// Sidebar rows: every page plus the logout entry
pub const SIDEBAR_LEN: usize = Page::ALL.len() + 1;

/// Which pane receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

/// Login screen input
#[derive(Debug, Clone)]
pub struct LoginState {
    pub username: String,
    pub password: String,
    pub field: LoginField,
    pub error: Option<String>,
}

impl Default for LoginState {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            field: LoginField::Username,
            error: None,
        }
    }
}

/// Booking request filled in from the login screen
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub def: &'static PublicFormDef,
    pub form: FormState,
    /// Set once the request has been sent
    pub confirmation: Option<String>,
}

impl BookingRequest {
    fn new(def: &'static PublicFormDef) -> Self {
        Self {
            def,
            form: FormState::for_create(&def.fields),
            confirmation: None,
        }
    }
}

/// Pending action that requires confirmation
#[derive(Debug, Clone)]
pub struct PendingAction {
    pub record_id: RecordId,
    pub message: String,
    pub destructive: bool,
    pub selected_yes: bool,
}

/// Main application state
pub struct App {
    // Login gate
    pub auth: Box<dyn AuthService + Send>,
    pub login: LoginState,
    pub booking_request: Option<BookingRequest>,

    // One section per resource page, in sidebar order
    pub sections: Vec<Box<dyn SectionView>>,

    // Navigation state
    pub page: Page,
    pub focus: Focus,
    pub sidebar_selected: usize,
    pub selected: usize,
    pub mode: Mode,

    // Modal state
    pub form: Option<FormState>,
    pub pending_action: Option<PendingAction>,
    pub warning_message: Option<String>,

    // Backend
    pub api_url: String,

    // Persistent configuration
    pub config: Config,
    /// Where config changes are written; None keeps them in memory
    pub config_path: Option<PathBuf>,
    pub log_path: Option<PathBuf>,

    // Notifications
    pub notification_manager: NotificationManager,
    pub notifications_selected: usize,

    // Virtual scrolling
    pub viewport_height: usize,
    pub scroll_offset: usize,
}

impl App {
    pub fn new(
        config: Config,
        api_url: String,
        auth: Box<dyn AuthService + Send>,
        sections: Vec<Box<dyn SectionView>>,
    ) -> Self {
        let mut notification_manager = NotificationManager::new();
        notification_manager.detail_level =
            DetailLevel::from_str(&config.notifications.detail_level);
        notification_manager.toast_duration =
            Duration::from_secs(config.notifications.toast_duration_secs);
        notification_manager.max_history = config.notifications.max_history;

        let mut app = Self {
            auth,
            login: LoginState::default(),
            booking_request: None,
            sections,
            page: Page::Dashboard,
            focus: Focus::Sidebar,
            sidebar_selected: 0,
            selected: 0,
            mode: Mode::Login,
            form: None,
            pending_action: None,
            warning_message: None,
            api_url,
            config,
            config_path: None,
            log_path: None,
            notification_manager,
            notifications_selected: 0,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            scroll_offset: 0,
        };

        if app.auth.is_authenticated() {
            app.enter_dashboard_session();
        }
        app
    }

    /// Persist config changes to this file
    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    pub fn with_log_path(mut self, path: Option<PathBuf>) -> Self {
        self.log_path = path;
        self
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub fn submit_login(&mut self) {
        let username = self.login.username.clone();
        let password = self.login.password.clone();

        match self.auth.login(&username, &password) {
            Ok(true) => {
                self.login = LoginState::default();
                self.enter_dashboard_session();
            },
            Ok(false) if !self.auth.has_credentials() => {
                self.login.error = Some(
                    "No operator account configured. Set username and password in config.json."
                        .to_string(),
                );
            },
            Ok(false) => {
                self.login.password.clear();
                self.login.field = LoginField::Password;
                self.login.error = Some("Invalid username or password".to_string());
            },
            Err(e) => {
                tracing::error!("Login failed: {:#}", e);
                self.login.error = Some(format!("Login failed: {}", e));
            },
        }
    }

    /// Load every section and open the last page
    fn enter_dashboard_session(&mut self) {
        self.mode = Mode::Normal;
        for section in self.sections.iter_mut() {
            section.mount(&mut self.notification_manager);
        }

        let page = self
            .config
            .last_page
            .as_deref()
            .and_then(Page::from_key)
            .unwrap_or(Page::Dashboard);
        self.show_page(page, false);
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.auth.logout() {
            tracing::error!("Failed to clear session: {:#}", e);
        }
        for section in self.sections.iter_mut() {
            section.close_modal();
        }
        self.form = None;
        self.pending_action = None;
        self.login = LoginState::default();
        self.mode = Mode::Login;
    }

    // =========================================================================
    // Booking Request
    // =========================================================================

    pub fn open_booking_request(&mut self) {
        match get_form(BOOKING_REQUEST_FORM) {
            Some(def) => {
                self.booking_request = Some(BookingRequest::new(def));
                self.mode = Mode::BookingRequest;
            },
            None => {
                tracing::warn!("No {} form defined", BOOKING_REQUEST_FORM);
                self.login.error = Some("Booking requests are unavailable".to_string());
            },
        }
    }

    pub fn close_booking_request(&mut self) {
        self.booking_request = None;
        self.mode = Mode::Login;
    }

    /// Send the request, or start a fresh one after a confirmation
    pub fn submit_booking_request(&mut self) {
        let Some(request) = self.booking_request.as_mut() else {
            return;
        };

        if request.confirmation.is_some() {
            *request = BookingRequest::new(request.def);
            return;
        }

        let mut data = match request.form.to_form_data() {
            Ok(data) => data,
            Err(e) => {
                request.form.error = Some(e.to_string());
                return;
            },
        };
        for (key, value) in &request.def.fixed {
            data.insert(key.clone(), value.clone());
        }

        let Some(section) = self
            .sections
            .iter_mut()
            .find(|s| s.key() == request.def.resource)
        else {
            tracing::error!("No section for {}", request.def.resource);
            request.form.error = Some("Booking requests are unavailable".to_string());
            return;
        };

        section.open_create();
        match section.submit(&data, &mut self.notification_manager) {
            Ok(()) => {
                tracing::info!("Booking request sent");
                request.confirmation = Some(booking_confirmation(&data));
            },
            Err(e) => {
                section.close_modal();
                tracing::warn!("Booking request rejected: {:#}", e);
                request.form.error = Some(format!("{:#}", e));
            },
        }
    }

    pub fn current_user(&self) -> String {
        self.auth.current_user().unwrap_or_else(|| "Guest".to_string())
    }

    // =========================================================================
    // Section Access
    // =========================================================================

    fn section_index(&self, page: Page) -> Option<usize> {
        let key = page.resource_key()?;
        self.sections.iter().position(|s| s.key() == key)
    }

    pub fn current_section(&self) -> Option<&dyn SectionView> {
        let idx = self.section_index(self.page)?;
        self.sections.get(idx).map(|s| s.as_ref())
    }

    fn current_section_mut(&mut self) -> Option<&mut Box<dyn SectionView>> {
        let idx = self.section_index(self.page)?;
        self.sections.get_mut(idx)
    }

    pub fn current_resource(&self) -> Option<&'static ResourceDef> {
        self.current_section().map(|s| s.def())
    }

    fn row_count(&self) -> usize {
        self.current_section().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_loading(&self) -> bool {
        match self.current_section() {
            Some(section) => section.is_loading(),
            None => self.sections.iter().any(|s| s.is_loading()),
        }
    }

    /// Drain finished backend calls (called every loop tick)
    pub fn tick(&mut self) {
        let notifications = &mut self.notification_manager;
        for section in self.sections.iter_mut() {
            section.poll(notifications);
        }
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.row_count();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
        self.ensure_visible();
    }

    // =========================================================================
    // Page Navigation
    // =========================================================================

    /// Switch page; resource pages are remounted with a fresh fetch
    pub fn select_page(&mut self, page: Page) {
        self.show_page(page, true);
        self.remember_page(page);
    }

    fn show_page(&mut self, page: Page, remount: bool) {
        self.page = page;
        self.selected = 0;
        self.scroll_offset = 0;
        self.sidebar_selected = Page::ALL.iter().position(|p| *p == page).unwrap_or(0);

        if remount {
            let notifications = &mut self.notification_manager;
            if let Some(idx) = page.resource_key().and_then(|key| {
                self.sections.iter().position(|s| s.key() == key)
            }) {
                self.sections[idx].mount(notifications);
            }
        }

        self.focus = if page.resource_key().is_some() {
            Focus::Content
        } else {
            Focus::Sidebar
        };
    }

    fn remember_page(&mut self, page: Page) {
        self.config.last_page = Some(page.key().to_string());
        if let Some(path) = &self.config_path {
            if let Err(e) = self.config.save_to(path) {
                tracing::warn!("Failed to save config: {:#}", e);
            }
        }
    }

    /// Re-fetch the current section, discarding local state
    pub fn refresh_current(&mut self) {
        if let Some(idx) = self.section_index(self.page) {
            self.sections[idx].mount(&mut self.notification_manager);
            self.selected = 0;
            self.scroll_offset = 0;
        }
    }

    /// Activate the highlighted sidebar row
    pub fn activate_sidebar(&mut self) {
        match Page::ALL.get(self.sidebar_selected) {
            Some(page) => self.select_page(*page),
            None => self.logout(),
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Sidebar if self.current_section().is_some() => Focus::Content,
            _ => Focus::Sidebar,
        };
    }

    pub fn toggle_focus_to_content(&mut self) {
        if self.current_section().is_some() {
            self.focus = Focus::Content;
        }
    }

    pub fn next(&mut self) {
        match (self.mode, self.focus) {
            (Mode::Notifications, _) => {
                let len = self.notification_manager.notifications.len();
                if len > 0 {
                    self.notifications_selected = (self.notifications_selected + 1).min(len - 1);
                }
            },
            (_, Focus::Sidebar) => {
                self.sidebar_selected = (self.sidebar_selected + 1).min(SIDEBAR_LEN - 1);
            },
            (_, Focus::Content) => {
                let len = self.row_count();
                if len > 0 {
                    self.selected = (self.selected + 1).min(len - 1);
                }
                self.ensure_visible();
            },
        }
    }

    pub fn previous(&mut self) {
        match (self.mode, self.focus) {
            (Mode::Notifications, _) => {
                self.notifications_selected = self.notifications_selected.saturating_sub(1);
            },
            (_, Focus::Sidebar) => {
                self.sidebar_selected = self.sidebar_selected.saturating_sub(1);
            },
            (_, Focus::Content) => {
                self.selected = self.selected.saturating_sub(1);
                self.ensure_visible();
            },
        }
    }

    pub fn go_to_top(&mut self) {
        match self.focus {
            Focus::Sidebar => self.sidebar_selected = 0,
            Focus::Content => self.selected = 0,
        }
        self.ensure_visible();
    }

    pub fn go_to_bottom(&mut self) {
        match self.focus {
            Focus::Sidebar => self.sidebar_selected = SIDEBAR_LEN - 1,
            Focus::Content => self.selected = self.row_count().saturating_sub(1),
        }
        self.ensure_visible();
    }

    pub fn page_down(&mut self, page_size: usize) {
        let len = self.row_count();
        if len > 0 {
            self.selected = (self.selected + page_size).min(len - 1);
        }
        self.ensure_visible();
    }

    pub fn page_up(&mut self, page_size: usize) {
        self.selected = self.selected.saturating_sub(page_size);
        self.ensure_visible();
    }

    // =========================================================================
    // Record Operations
    // =========================================================================

    pub fn open_create_form(&mut self) {
        match self.current_section_mut() {
            Some(section) => {
                let form = section.open_create();
                self.form = Some(form);
                self.mode = Mode::Form;
            },
            None => self.show_warning("Open a section to add records"),
        }
    }

    pub fn open_edit_form(&mut self) {
        let selected = self.selected;
        let form = self
            .current_section_mut()
            .and_then(|section| section.open_edit(selected));
        match form {
            Some(form) => {
                self.form = Some(form);
                self.mode = Mode::Form;
            },
            None => self.show_warning("No record selected"),
        }
    }

    pub fn cancel_form(&mut self) {
        if let Some(section) = self.current_section_mut() {
            section.close_modal();
        }
        self.form = None;
        self.mode = Mode::Normal;
    }

    /// Validate and submit the open form; stays open on validation errors
    pub fn submit_form(&mut self) {
        let Some(form) = self.form.as_ref() else {
            return;
        };

        let data = match form.to_form_data() {
            Ok(data) => data,
            Err(e) => {
                if let Some(form) = self.form.as_mut() {
                    form.error = Some(e.to_string());
                }
                return;
            },
        };

        let Some(idx) = self.section_index(self.page) else {
            return;
        };
        let result = self.sections[idx].submit(&data, &mut self.notification_manager);
        match result {
            Ok(()) => {
                self.form = None;
                self.mode = Mode::Normal;
                self.clamp_selection();
            },
            Err(e) => {
                tracing::warn!("Form rejected: {:#}", e);
                if let Some(form) = self.form.as_mut() {
                    form.error = Some(format!("{:#}", e));
                }
            },
        }
    }

    /// Ask before deleting the selected record
    pub fn request_delete(&mut self) {
        let Some(section) = self.current_section() else {
            return;
        };
        let Some(record_id) = section.id_at(self.selected) else {
            return;
        };
        let label = section
            .label_at(self.selected)
            .unwrap_or_else(|| record_id.to_string());
        let item = section.def().item_name.to_lowercase();

        self.enter_confirm_mode(PendingAction {
            record_id,
            message: format!("Are you sure you want to delete {} '{}'?", item, label),
            destructive: true,
            selected_yes: false,
        });
    }

    /// Resolve the confirm dialog
    pub fn resolve_confirm(&mut self, confirmation: Confirmation) {
        let Some(pending) = self.pending_action.take() else {
            self.exit_mode();
            return;
        };

        if let Some(idx) = self.section_index(self.page) {
            self.sections[idx].request_delete(
                &pending.record_id,
                confirmation,
                &mut self.notification_manager,
            );
        }
        self.exit_mode();
        self.clamp_selection();
    }

    // =========================================================================
    // Mode Transitions
    // =========================================================================

    pub fn enter_help_mode(&mut self) {
        self.mode = Mode::Help;
    }

    pub fn enter_confirm_mode(&mut self, pending: PendingAction) {
        self.pending_action = Some(pending);
        self.mode = Mode::Confirm;
    }

    pub fn show_warning(&mut self, message: &str) {
        self.warning_message = Some(message.to_string());
        self.mode = Mode::Warning;
    }

    pub fn enter_notifications_mode(&mut self) {
        self.notifications_selected = 0;
        self.mode = Mode::Notifications;
    }

    pub fn exit_mode(&mut self) {
        self.mode = Mode::Normal;
        self.pending_action = None;
        self.warning_message = None;
    }

    /// Status bar path, e.g. `LensCraft > Booking`
    pub fn get_breadcrumb(&self) -> Vec<String> {
        let mut crumbs = vec!["LensCraft".to_string(), self.page.label().to_string()];
        if let Some(form) = &self.form {
            crumbs.push(if form.editing { "Edit" } else { "New" }.to_string());
        }
        crumbs
    }

    // =========================================================================
    // Virtual Scrolling
    // =========================================================================

    /// Update the viewport height (called from UI during render)
    pub fn update_viewport(&mut self, height: usize) {
        self.viewport_height = height.max(1);
    }

    /// Ensure the selected item is visible in the viewport
    pub fn ensure_visible(&mut self) {
        let len = self.row_count();
        if len == 0 {
            self.scroll_offset = 0;
            return;
        }

        let visible_height = self.viewport_height;
        let margin = 2;

        if self.selected < self.scroll_offset + margin {
            self.scroll_offset = self.selected.saturating_sub(margin);
        } else if self.selected >= self.scroll_offset + visible_height.saturating_sub(margin) {
            self.scroll_offset = self
                .selected
                .saturating_sub(visible_height.saturating_sub(margin + 1));
        }

        let max_offset = len.saturating_sub(self.viewport_height);
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }

    /// Get the range of visible rows based on scroll offset and viewport
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.scroll_offset;
        let end = (self.scroll_offset + self.viewport_height).min(self.row_count());
        start.min(end)..end
    }
}

fn booking_confirmation(data: &FormData) -> String {
    let text = |key: &str| data.get(key).and_then(|v| v.as_str()).unwrap_or_default();
    let first_name = text("fullName").split_whitespace().next().unwrap_or_default();
    let subject = match text("subject") {
        "" => "your event",
        subject => subject,
    };
    format!(
        "Thank you, {}! We have received your booking inquiry for the {}. \
         Our team will review the dates and get back to you shortly.",
        first_name, subject
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::auth::{MemorySessionStore, StaticCredentialAuth};
    use crate::resource::datasource::memory::MemoryDataSource;
    use crate::resource::record::{Booking, Collection, Contact, Expenditure, Other, Photo};
    use crate::resource::section::Section;
    use serde_json::json;

    fn rows<R: crate::resource::record::Record>(values: serde_json::Value) -> Vec<R> {
        serde_json::from_value(values).unwrap()
    }

    /// App with in-memory sections and operator `anindo` / `lens123`
    pub(crate) fn test_app() -> App {
        let sections: Vec<Box<dyn SectionView>> = vec![
            Box::new(
                Section::new(MemoryDataSource::<Booking>::new(rows(json!([
                    {"id": "b1", "fullName": "Jane Doe", "status": "Confirmed"}
                ]))))
                .unwrap(),
            ),
            Box::new(Section::new(MemoryDataSource::<Contact>::new(Vec::new())).unwrap()),
            Box::new(Section::new(MemoryDataSource::<Photo>::new(Vec::new())).unwrap()),
            Box::new(
                Section::new(MemoryDataSource::<Collection>::new(rows(json!([
                    {"id": "c1", "name": "Deposit", "amount": 500}
                ]))))
                .unwrap(),
            ),
            Box::new(Section::new(MemoryDataSource::<Expenditure>::new(Vec::new())).unwrap()),
            Box::new(
                Section::new(MemoryDataSource::<Other>::new(rows(json!([
                    {"id": "1", "name": "A", "details": "x"},
                    {"id": "2", "name": "B", "details": "y"}
                ]))))
                .unwrap(),
            ),
        ];

        let auth = StaticCredentialAuth::new(
            Some(("anindo".to_string(), "lens123".to_string())),
            MemorySessionStore::default(),
        );

        App::new(
            Config::default(),
            "http://localhost/api".to_string(),
            Box::new(auth),
            sections,
        )
    }

    pub(crate) async fn settle(app: &mut App) {
        for _ in 0..100 {
            app.tick();
            if app.notification_manager.in_progress_count() == 0
                && !app.sections.iter().any(|s| s.is_loading())
            {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("app never settled");
    }

    pub(crate) async fn logged_in_app() -> App {
        let mut app = test_app();
        app.login.username = "anindo".to_string();
        app.login.password = "lens123".to_string();
        app.submit_login();
        settle(&mut app).await;
        app
    }

    #[tokio::test]
    async fn test_starts_on_login_screen() {
        let app = test_app();
        assert_eq!(app.mode, Mode::Login);
    }

    #[tokio::test]
    async fn test_bad_login_shows_error() {
        let mut app = test_app();
        app.login.username = "anindo".to_string();
        app.login.password = "wrong".to_string();
        app.submit_login();

        assert_eq!(app.mode, Mode::Login);
        assert!(app.login.error.is_some());
        assert!(app.login.password.is_empty());
    }

    #[tokio::test]
    async fn test_login_loads_every_section() {
        let app = logged_in_app().await;

        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.page, Page::Dashboard);
        assert_eq!(app.sections[0].len(), 1);
        assert_eq!(app.sections[5].len(), 2);
        assert_eq!(app.current_user(), "anindo");
    }

    #[tokio::test]
    async fn test_sidebar_navigation_mounts_section() {
        let mut app = logged_in_app().await;
        app.sidebar_selected = 6;
        app.activate_sidebar();

        assert_eq!(app.page, Page::Others);
        assert_eq!(app.focus, Focus::Content);
        assert_eq!(app.config.last_page.as_deref(), Some("others"));
        settle(&mut app).await;
        assert_eq!(app.current_section().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_logout_entry_returns_to_login() {
        let mut app = logged_in_app().await;
        app.sidebar_selected = SIDEBAR_LEN - 1;
        app.activate_sidebar();

        assert_eq!(app.mode, Mode::Login);
        assert!(!app.auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_create_flow_prepends_record() {
        let mut app = logged_in_app().await;
        app.select_page(Page::Others);
        settle(&mut app).await;

        app.open_create_form();
        assert_eq!(app.mode, Mode::Form);
        let form = app.form.as_mut().unwrap();
        form.values = vec!["C".to_string(), "details".to_string(), String::new()];
        app.submit_form();

        assert_eq!(app.mode, Mode::Normal);
        let rows = app.current_section().unwrap().rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["name"], "C");
        settle(&mut app).await;
    }

    #[tokio::test]
    async fn test_invalid_form_stays_open() {
        let mut app = logged_in_app().await;
        app.select_page(Page::Others);
        settle(&mut app).await;

        app.open_create_form();
        app.submit_form();

        assert_eq!(app.mode, Mode::Form);
        assert!(app.form.as_ref().unwrap().error.is_some());
        assert_eq!(app.current_section().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let mut app = logged_in_app().await;
        app.select_page(Page::Others);
        settle(&mut app).await;

        app.request_delete();
        assert_eq!(app.mode, Mode::Confirm);
        app.resolve_confirm(Confirmation::Declined);
        assert_eq!(app.current_section().unwrap().len(), 2);

        app.request_delete();
        app.resolve_confirm(Confirmation::Confirmed);
        assert_eq!(app.current_section().unwrap().len(), 1);
        assert_eq!(app.current_section().unwrap().rows()[0]["name"], "B");
        settle(&mut app).await;
    }

    #[tokio::test]
    async fn test_selection_is_clamped_after_delete() {
        let mut app = logged_in_app().await;
        app.select_page(Page::Others);
        settle(&mut app).await;

        app.go_to_bottom();
        assert_eq!(app.selected, 1);
        app.request_delete();
        app.resolve_confirm(Confirmation::Confirmed);
        assert_eq!(app.selected, 0);
        settle(&mut app).await;
    }

    #[tokio::test]
    async fn test_add_outside_section_shows_warning() {
        let mut app = logged_in_app().await;
        app.select_page(Page::Dashboard);

        app.open_create_form();
        assert_eq!(app.mode, Mode::Warning);
        assert!(app.form.is_none());
        app.exit_mode();
        assert!(app.warning_message.is_none());
    }

    #[test]
    fn test_page_keys_round_trip() {
        for page in Page::ALL {
            assert_eq!(Page::from_key(page.key()), Some(page));
        }
        assert_eq!(Page::from_key("nowhere"), None);
    }

    #[tokio::test]
    async fn test_login_without_configured_account_explains_why() {
        let mut app = test_app();
        app.auth = Box::new(StaticCredentialAuth::new(None, MemorySessionStore::default()));
        app.login.username = "anindo".to_string();
        app.login.password = "lens123".to_string();
        app.submit_login();

        assert_eq!(app.mode, Mode::Login);
        let error = app.login.error.as_deref().unwrap();
        assert!(error.contains("No operator account configured"));
    }

    fn fill(request: &mut BookingRequest, key: &str, value: &str) {
        let index = request
            .form
            .fields
            .iter()
            .position(|f| f.key == key)
            .unwrap();
        request.form.values[index] = value.to_string();
    }

    #[tokio::test]
    async fn test_booking_request_is_saved_as_pending() {
        let mut app = test_app();
        app.open_booking_request();
        assert_eq!(app.mode, Mode::BookingRequest);

        let request = app.booking_request.as_mut().unwrap();
        fill(request, "fullName", "Nusrat Jahan");
        fill(request, "email", "nusrat@example.com");
        fill(request, "subject", "Wedding");
        app.submit_booking_request();
        settle(&mut app).await;

        // Sections are not mounted before login, so only the new row is local
        let rows = app.sections[0].rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["fullName"], "Nusrat Jahan");
        assert_eq!(rows[0]["status"], "Pending");
        assert!(!app.sections[0].is_modal_open());

        let confirmation = app
            .booking_request
            .as_ref()
            .and_then(|r| r.confirmation.clone())
            .unwrap();
        assert!(confirmation.starts_with("Thank you, Nusrat!"));
        assert!(confirmation.contains("for the Wedding"));

        // Enter again starts a blank request
        app.submit_booking_request();
        let request = app.booking_request.as_ref().unwrap();
        assert!(request.confirmation.is_none());
        assert!(request.form.values[0].is_empty());
        assert!(request.form.error.is_none());

        app.close_booking_request();
        assert_eq!(app.mode, Mode::Login);
        assert!(app.booking_request.is_none());
        assert!(!app.auth.is_authenticated());

        // The backend kept it next to the existing booking
        app.login.username = "anindo".to_string();
        app.login.password = "lens123".to_string();
        app.submit_login();
        settle(&mut app).await;
        let rows = app.sections[0].rows();
        assert_eq!(rows.len(), 2);
        assert!(rows
            .iter()
            .any(|r| r["fullName"] == "Nusrat Jahan" && r["status"] == "Pending"));
    }

    #[tokio::test]
    async fn test_booking_request_with_bad_email_stays_open() {
        let mut app = test_app();
        app.open_booking_request();

        let request = app.booking_request.as_mut().unwrap();
        fill(request, "fullName", "Nusrat Jahan");
        fill(request, "email", "not-an-email");
        app.submit_booking_request();

        let request = app.booking_request.as_ref().unwrap();
        assert!(request.form.error.is_some());
        assert!(request.confirmation.is_none());
        assert!(app.sections[0].is_empty());
        assert!(!app.sections[0].is_modal_open());
        assert_eq!(app.mode, Mode::BookingRequest);
    }
}
