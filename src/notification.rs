//! Notification System
//!
//! Tracks every backend call a section makes (fetches and persisted
//! mutations) as a notification with toast display and a history list.

use std::collections::VecDeque;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Level of detail for notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailLevel {
    /// Minimal: action + record + status icon
    Minimal,
    /// Detailed: action + record + duration
    #[default]
    Detailed,
    /// Verbose: section name and error details too
    Verbose,
}

impl DetailLevel {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "minimal" => Self::Minimal,
            "verbose" => Self::Verbose,
            _ => Self::Detailed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Detailed => "detailed",
            Self::Verbose => "verbose",
        }
    }
}

/// Kind of backend call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    Load,
    Create,
    Update,
    Delete,
}

impl OperationType {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Load => "Load",
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            Self::Load => "Loaded",
            Self::Create => "Created",
            Self::Update => "Updated",
            Self::Delete => "Deleted",
        }
    }

    pub fn present_participle(&self) -> &'static str {
        match self {
            Self::Load => "Loading",
            Self::Create => "Creating",
            Self::Update => "Updating",
            Self::Delete => "Deleting",
        }
    }
}

/// Status of a notification/operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationStatus {
    /// Call has been spawned, no answer yet
    Pending,
    /// Backend accepted the call
    Success,
    /// Call failed with a short user-facing message
    Error(String),
}

impl NotificationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Error(_))
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Pending => "↻",
            Self::Success => "✓",
            Self::Error(_) => "✗",
        }
    }
}

/// A single notification
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub operation_type: OperationType,
    /// Section display name ("Bookings")
    pub section: String,
    /// Record label ("Jane Doe") or the section name for loads
    pub subject: String,
    pub status: NotificationStatus,
    pub created_at: Instant,
    pub completed_at: Option<Instant>,
}

impl Notification {
    pub fn new(operation_type: OperationType, section: String, subject: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            operation_type,
            section,
            subject,
            status: NotificationStatus::Pending,
            created_at: Instant::now(),
            completed_at: None,
        }
    }

    pub fn set_success(&mut self) {
        self.status = NotificationStatus::Success;
        self.completed_at = Some(Instant::now());
    }

    pub fn set_error(&mut self, error: String) {
        self.status = NotificationStatus::Error(error);
        self.completed_at = Some(Instant::now());
    }

    /// Duration of the call (or elapsed time if still running)
    pub fn duration(&self) -> Duration {
        self.completed_at
            .unwrap_or_else(Instant::now)
            .duration_since(self.created_at)
    }

    pub fn duration_display(&self) -> String {
        let d = self.duration();
        if d.as_secs() < 1 {
            format!("{}ms", d.as_millis())
        } else if d.as_secs() < 60 {
            format!("{}s", d.as_secs())
        } else {
            format!("{}m{}s", d.as_secs() / 60, d.as_secs() % 60)
        }
    }

    /// Short form for the status bar
    pub fn toast_message(&self, detail_level: DetailLevel) -> String {
        let icon = self.status.icon();
        let verb = match (&self.status, self.operation_type) {
            (NotificationStatus::Pending, op) => op.present_participle(),
            (NotificationStatus::Success, op) => op.past_tense(),
            (NotificationStatus::Error(_), OperationType::Load) => "Failed to load",
            (NotificationStatus::Error(_), _) => "Failed to save",
        };

        match detail_level {
            DetailLevel::Minimal => format!("{} {} {}", icon, verb, self.subject),
            DetailLevel::Detailed => {
                if let NotificationStatus::Error(ref err) = self.status {
                    format!("{} {} {}: {}", icon, verb, self.subject, err)
                } else if self.status.is_terminal() {
                    format!(
                        "{} {} {} ({})",
                        icon,
                        verb,
                        self.subject,
                        self.duration_display()
                    )
                } else {
                    format!("{} {} {}...", icon, verb, self.subject)
                }
            },
            DetailLevel::Verbose => {
                let base = format!("{} {} {} [{}]", icon, verb, self.subject, self.section);
                if let NotificationStatus::Error(ref err) = self.status {
                    format!("{} - {}", base, err)
                } else if self.status.is_terminal() {
                    format!("{} ({})", base, self.duration_display())
                } else {
                    format!("{}...", base)
                }
            },
        }
    }
}

/// Notification manager
pub struct NotificationManager {
    /// All notifications (recent first)
    pub notifications: VecDeque<Notification>,
    pub max_history: usize,
    pub toast_duration: Duration,
    pub detail_level: DetailLevel,
    last_toast_time: Option<Instant>,
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationManager {
    pub fn new() -> Self {
        Self {
            notifications: VecDeque::new(),
            max_history: 50,
            toast_duration: Duration::from_secs(5),
            detail_level: DetailLevel::Detailed,
            last_toast_time: None,
        }
    }

    /// Record a call that has just been spawned
    pub fn create_notification(
        &mut self,
        operation_type: OperationType,
        section: String,
        subject: String,
    ) -> Uuid {
        let notification = Notification::new(operation_type, section, subject);
        let id = notification.id;
        self.notifications.push_front(notification);
        self.last_toast_time = Some(Instant::now());
        self.trim_history();
        id
    }

    pub fn mark_success(&mut self, id: Uuid) {
        if let Some(notif) = self.notifications.iter_mut().find(|n| n.id == id) {
            notif.set_success();
            self.last_toast_time = Some(Instant::now());
        }
    }

    pub fn mark_error(&mut self, id: Uuid, error: String) {
        if let Some(notif) = self.notifications.iter_mut().find(|n| n.id == id) {
            notif.set_error(error);
            self.last_toast_time = Some(Instant::now());
        }
    }

    #[allow(dead_code)]
    pub fn get(&self, id: Uuid) -> Option<&Notification> {
        self.notifications.iter().find(|n| n.id == id)
    }

    /// Most recent notification while the toast is still visible
    pub fn current_toast(&self) -> Option<&Notification> {
        match self.last_toast_time {
            Some(last_time) if last_time.elapsed() <= self.toast_duration => {
                self.notifications.front()
            },
            _ => None,
        }
    }

    pub fn in_progress_count(&self) -> usize {
        self.notifications
            .iter()
            .filter(|n| n.status == NotificationStatus::Pending)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.notifications
            .iter()
            .filter(|n| matches!(n.status, NotificationStatus::Error(_)))
            .count()
    }

    pub fn clear(&mut self) {
        self.notifications.clear();
        self.last_toast_time = None;
    }

    fn trim_history(&mut self) {
        while self.notifications.len() > self.max_history {
            // Oldest finished entry goes first
            if let Some(pos) = self.notifications.iter().rposition(|n| n.status.is_terminal()) {
                self.notifications.remove(pos);
            } else {
                self.notifications.pop_back();
            }
        }
    }

    pub fn has_notifications(&self) -> bool {
        !self.notifications.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_lifecycle() {
        let mut manager = NotificationManager::new();

        let id = manager.create_notification(
            OperationType::Create,
            "Bookings".to_string(),
            "Jane Doe".to_string(),
        );

        assert_eq!(manager.notifications.len(), 1);
        assert_eq!(manager.get(id).unwrap().status, NotificationStatus::Pending);
        assert_eq!(manager.in_progress_count(), 1);

        manager.mark_success(id);
        assert_eq!(manager.get(id).unwrap().status, NotificationStatus::Success);
        assert_eq!(manager.in_progress_count(), 0);
    }

    #[test]
    fn test_errors_are_counted() {
        let mut manager = NotificationManager::new();
        let id = manager.create_notification(
            OperationType::Delete,
            "Photos".to_string(),
            "Sunset".to_string(),
        );
        manager.mark_error(id, "Server error".to_string());

        assert_eq!(manager.error_count(), 1);
        assert!(manager.get(id).unwrap().status.is_terminal());
    }

    #[test]
    fn test_toast_message_formats() {
        let mut notif = Notification::new(
            OperationType::Update,
            "Contacts".to_string(),
            "Rahim".to_string(),
        );

        let msg = notif.toast_message(DetailLevel::Minimal);
        assert!(msg.contains("Updating"));
        assert!(msg.contains("Rahim"));

        notif.set_error("Not found".to_string());
        let msg = notif.toast_message(DetailLevel::Detailed);
        assert!(msg.contains("Failed to save"));
        assert!(msg.contains("Not found"));
        assert!(msg.contains("✗"));
    }

    #[test]
    fn test_failed_load_toast() {
        let mut notif = Notification::new(
            OperationType::Load,
            "Bookings".to_string(),
            "Bookings".to_string(),
        );
        notif.set_error("Network error".to_string());
        assert!(notif
            .toast_message(DetailLevel::Minimal)
            .contains("Failed to load"));
    }

    #[test]
    fn test_history_is_trimmed_oldest_finished_first() {
        let mut manager = NotificationManager::new();
        manager.max_history = 2;

        let first = manager.create_notification(
            OperationType::Create,
            "Others".to_string(),
            "a".to_string(),
        );
        manager.mark_success(first);
        let second = manager.create_notification(
            OperationType::Create,
            "Others".to_string(),
            "b".to_string(),
        );
        manager.create_notification(OperationType::Create, "Others".to_string(), "c".to_string());

        assert_eq!(manager.notifications.len(), 2);
        assert!(manager.get(first).is_none());
        assert!(manager.get(second).is_some());
    }

    #[test]
    fn test_detail_level_parsing() {
        assert_eq!(DetailLevel::from_str("VERBOSE"), DetailLevel::Verbose);
        assert_eq!(DetailLevel::from_str("nonsense"), DetailLevel::Detailed);
        assert_eq!(DetailLevel::Minimal.as_str(), "minimal");
    }
}
