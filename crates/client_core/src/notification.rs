//! Single-slot error banner that clears itself after a fixed delay.

use std::time::{Duration, Instant};

use shared::error::TodoError;

pub const ERROR_BANNER_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ShownError {
    error: TodoError,
    shown_at: Instant,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorBanner {
    current: Option<ShownError>,
}

impl ErrorBanner {
    /// Replaces whatever is showing and restarts the dismissal timer.
    pub fn show(&mut self, error: TodoError) {
        self.show_at(error, Instant::now());
    }

    pub fn show_at(&mut self, error: TodoError, now: Instant) {
        self.current = Some(ShownError {
            error,
            shown_at: now,
        });
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// The error last shown, ignoring expiry.
    pub fn current(&self) -> Option<TodoError> {
        self.current.map(|shown| shown.error)
    }

    pub fn visible_at(&self, now: Instant) -> Option<TodoError> {
        self.current
            .filter(|shown| now.saturating_duration_since(shown.shown_at) < ERROR_BANNER_TTL)
            .map(|shown| shown.error)
    }

    /// Drops the banner once its lifetime has elapsed. Returns true if it was cleared.
    pub fn expire(&mut self, now: Instant) -> bool {
        if self.current.is_some() && self.visible_at(now).is_none() {
            self.current = None;
            return true;
        }
        false
    }

    pub fn remaining_at(&self, now: Instant) -> Option<Duration> {
        self.current.and_then(|shown| {
            ERROR_BANNER_TTL.checked_sub(now.saturating_duration_since(shown.shown_at))
        })
    }
}
