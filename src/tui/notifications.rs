//! Notification management for TUI
//!
//! Transient toasts shown in the top-right corner.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::focus_timing::Notice;

/// Types of notifications that can be displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationType {
    /// A countdown reached zero
    TimerFinished { message: String },
    Success { message: String },
    Info { message: String },
    Warning { message: String },
    Error { message: String },
}

impl NotificationType {
    pub fn title(&self) -> &str {
        match self {
            NotificationType::TimerFinished { .. } => "Time's up",
            NotificationType::Success { .. } => "Done",
            NotificationType::Info { .. } => "Info",
            NotificationType::Warning { .. } => "Warning",
            NotificationType::Error { .. } => "Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            NotificationType::TimerFinished { message }
            | NotificationType::Success { message }
            | NotificationType::Info { message }
            | NotificationType::Warning { message }
            | NotificationType::Error { message } => message,
        }
    }

    /// How long the toast stays up
    pub fn default_ttl(&self) -> Duration {
        match self {
            NotificationType::TimerFinished { .. } => Duration::from_secs(30),
            NotificationType::Error { .. } => Duration::from_secs(10),
            _ => Duration::from_secs(4),
        }
    }
}

impl From<Notice> for NotificationType {
    fn from(notice: Notice) -> Self {
        match notice {
            Notice::Info(message) => NotificationType::Info { message },
            Notice::Success(message) => NotificationType::Success { message },
            Notice::Warning(message) => NotificationType::Warning { message },
            Notice::Error(message) => NotificationType::Error { message },
            Notice::TimerFinished(message) => NotificationType::TimerFinished { message },
        }
    }
}

/// A notification to be displayed
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub notification_type: NotificationType,
    pub created_at: Instant,
    /// How long before auto-dismiss (None = manual dismiss only)
    pub auto_dismiss: Option<Duration>,
}

impl Notification {
    pub fn new(notification_type: NotificationType, auto_dismiss: Option<Duration>) -> Self {
        Self {
            id: Uuid::new_v4(),
            notification_type,
            created_at: Instant::now(),
            auto_dismiss,
        }
    }

    pub fn should_dismiss(&self) -> bool {
        self.auto_dismiss
            .is_some_and(|duration| self.created_at.elapsed() >= duration)
    }
}

/// Manages a queue of notifications
#[derive(Debug)]
pub struct NotificationManager {
    notifications: VecDeque<Notification>,
    max_visible: usize,
}

impl NotificationManager {
    pub fn new(max_visible: usize) -> Self {
        Self {
            notifications: VecDeque::new(),
            max_visible,
        }
    }

    pub fn push(&mut self, notification_type: NotificationType, auto_dismiss: Option<Duration>) {
        self.notifications
            .push_back(Notification::new(notification_type, auto_dismiss));

        // Trim excess notifications (oldest first)
        while self.notifications.len() > self.max_visible * 2 {
            self.notifications.pop_front();
        }
    }

    /// Push with the type's default lifetime
    pub fn notify(&mut self, notification_type: NotificationType) {
        let ttl = notification_type.default_ttl();
        self.push(notification_type, Some(ttl));
    }

    /// Remove expired notifications; returns true if any were removed
    pub fn tick(&mut self) -> bool {
        let before = self.notifications.len();
        self.notifications.retain(|n| !n.should_dismiss());
        self.notifications.len() != before
    }

    /// Most recent notifications, newest first
    pub fn visible(&self) -> Vec<&Notification> {
        self.notifications
            .iter()
            .rev()
            .take(self.max_visible)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn dismiss_latest(&mut self) {
        self.notifications.pop_back();
    }
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new(3)
    }
}
