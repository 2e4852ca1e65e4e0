use std::time::{Duration, Instant};

use serde::Serialize;

pub const DEFAULT_DWELL_MS: u64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationCategory {
    Success,
    Error,
}

impl NotificationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationCategory::Success => "success",
            NotificationCategory::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub category: NotificationCategory,
    pub message: String,
    pub inserted_at: Instant,
}

impl Notification {
    pub fn expires_at(&self, dwell: Duration) -> Instant {
        self.inserted_at + dwell
    }
}

/// The flash region at the top of the main content.
///
/// Every insert creates a new block on top of the stack. Blocks are never
/// reused or deduplicated; each one leaves once its dwell time has passed.
#[derive(Debug, Clone)]
pub struct NotificationArea {
    dwell: Duration,
    next_id: u64,
    items: Vec<Notification>,
}

impl Default for NotificationArea {
    fn default() -> Self {
        Self::with_dwell(Duration::from_millis(DEFAULT_DWELL_MS))
    }
}

impl NotificationArea {
    pub fn with_dwell(dwell: Duration) -> Self {
        Self {
            dwell,
            next_id: 1,
            items: vec![],
        }
    }

    pub fn dwell(&self) -> Duration {
        self.dwell
    }

    pub fn insert(&mut self, category: NotificationCategory, message: &str, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        self.items.insert(
            0,
            Notification {
                id,
                category,
                message: message.to_string(),
                inserted_at: now,
            },
        );
        id
    }

    /// Drop every notification whose dwell time has elapsed at `now`.
    /// Returns how many were removed.
    pub fn expire(&mut self, now: Instant) -> usize {
        let dwell = self.dwell;
        let before = self.items.len();
        self.items.retain(|n| now < n.expires_at(dwell));
        before - self.items.len()
    }

    /// Notifications currently on the page, newest first.
    pub fn visible(&self) -> &[Notification] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
