use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use chrono::{DateTime, Local};
use tracing::{error, info};

/// Most toasts drawn at once; older ones wait until newer ones expire.
const MAX_VISIBLE_TOASTS: usize = 5;
/// Most toasts retained; the oldest is evicted beyond this.
const MAX_RETAINED_TOASTS: usize = 20;

/// Fire-and-forget user notifications.
pub trait NotificationService {
    fn error(&mut self, message: &str);
    fn success(&mut self, message: &str);
    fn info(&mut self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

impl ToastLevel {
    pub fn title(self) -> &'static str {
        match self {
            ToastLevel::Info => "Info",
            ToastLevel::Success => "Success",
            ToastLevel::Error => "Error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    pub shown_at: DateTime<Local>,
    created: Instant,
}

impl Toast {
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created) >= ttl
    }
}

/// Time-limited notification queue, newest last.
#[derive(Debug)]
pub struct ToastState {
    toasts: VecDeque<Toast>,
    ttl: Duration,
}

impl ToastState {
    pub fn new(ttl: Duration) -> Self {
        Self {
            toasts: VecDeque::new(),
            ttl,
        }
    }

    pub fn push(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.push_at(level, message.into(), Instant::now());
    }

    fn push_at(&mut self, level: ToastLevel, message: String, created: Instant) {
        match level {
            ToastLevel::Error => error!(%message, "notification"),
            _ => info!(%message, "notification"),
        }
        if self.toasts.len() == MAX_RETAINED_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast {
            level,
            message,
            shown_at: Local::now(),
            created,
        });
    }

    /// Drops expired toasts; returns `true` if any were removed.
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.toasts.len();
        let ttl = self.ttl;
        self.toasts.retain(|toast| !toast.is_expired(now, ttl));
        before != self.toasts.len()
    }

    /// Newest toasts first, capped at [`MAX_VISIBLE_TOASTS`].
    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter().rev().take(MAX_VISIBLE_TOASTS)
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

impl NotificationService for ToastState {
    fn error(&mut self, message: &str) {
        self.push(ToastLevel::Error, message);
    }

    fn success(&mut self, message: &str) {
        self.push(ToastLevel::Success, message);
    }

    fn info(&mut self, message: &str) {
        self.push(ToastLevel::Info, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_expire_after_ttl() {
        let mut toasts = ToastState::new(Duration::from_secs(5));
        let start = Instant::now();
        toasts.push_at(ToastLevel::Info, "saved".into(), start);

        assert!(!toasts.expire(start + Duration::from_secs(4)));
        assert_eq!(toasts.toasts.len(), 1);
        assert!(toasts.expire(start + Duration::from_secs(5)));
        assert!(toasts.is_empty());
    }

    #[test]
    fn visible_shows_newest_first_and_caps_count() {
        let mut toasts = ToastState::new(Duration::from_secs(5));
        for index in 0..7 {
            toasts.error(&format!("failure {index}"));
        }

        let visible: Vec<_> = toasts.visible().map(|toast| toast.message.as_str()).collect();
        assert_eq!(visible.len(), MAX_VISIBLE_TOASTS);
        assert_eq!(visible[0], "failure 6");
        assert_eq!(toasts.toasts.len(), 7);
    }

    #[test]
    fn retention_evicts_the_oldest() {
        let mut toasts = ToastState::new(Duration::from_secs(5));
        for index in 0..=MAX_RETAINED_TOASTS {
            toasts.info(&index.to_string());
        }
        assert_eq!(toasts.toasts.len(), MAX_RETAINED_TOASTS);
        assert_eq!(toasts.visible().last().map(|toast| toast.message.as_str()), Some("16"));
    }

    #[test]
    fn notification_levels_are_recorded() {
        let mut toasts = ToastState::new(Duration::from_secs(5));
        toasts.success("ok");
        toasts.error("bad");
        let levels: Vec<_> = toasts.visible().map(|toast| toast.level).collect();
        assert_eq!(levels, vec![ToastLevel::Error, ToastLevel::Success]);
    }
}
