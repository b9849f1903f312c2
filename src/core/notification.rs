//! Single-slot transient notifications (toasts)
//!
//! Only one notification is live at a time. A new one replaces the current
//! message and restarts the auto-dismiss window.

use std::time::{Duration, Instant};

use crate::core::timer::Deadline;

/// How long a notification stays visible without further activity
pub const NOTIFICATION_LIFETIME: Duration = Duration::from_millis(3000);

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Error,
}

impl Severity {
    /// Glyph shown in front of the message
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Info => "ℹ",
            Severity::Success => "✓",
            Severity::Error => "✗",
        }
    }
}

/// Contents of the notification slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub visible: bool,
}

/// Owner of the single notification slot and its auto-dismiss timer
#[derive(Debug, Default)]
pub struct NotificationCenter {
    slot: Option<Notification>,
    expiry: Deadline,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `message`, replacing whatever is in the slot and restarting the timer
    pub fn notify(&mut self, message: impl Into<String>, severity: Severity, now: Instant) {
        let message = message.into();
        tracing::debug!(?severity, %message, "notification");
        self.slot = Some(Notification {
            message,
            severity,
            visible: true,
        });
        self.expiry.arm(now, NOTIFICATION_LIFETIME);
    }

    /// Hide the notification immediately and cancel the pending timer
    pub fn dismiss(&mut self) {
        self.expiry.disarm();
        if let Some(notification) = &mut self.slot {
            notification.visible = false;
        }
    }

    /// Run the auto-dismiss if its window has elapsed
    pub fn tick(&mut self, now: Instant) {
        if self.expiry.fire(now) {
            if let Some(notification) = &mut self.slot {
                notification.visible = false;
            }
        }
    }

    /// Raw slot state, including a hidden notification
    pub fn state(&self) -> Option<&Notification> {
        self.slot.as_ref()
    }

    /// The notification to draw, if one is visible
    pub fn visible(&self) -> Option<&Notification> {
        self.slot.as_ref().filter(|n| n.visible)
    }
}
