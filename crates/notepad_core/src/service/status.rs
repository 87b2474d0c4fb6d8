//! Transient status line shown under the editor.
//!
//! # Invariants
//! - A message is visible for the configured duration, then the idle text
//!   is shown again.
//! - Error messages replace, never queue behind, earlier messages.

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::fmt::Display;

pub const IDLE_STATUS: &str = "Ready";
pub const DEFAULT_STATUS_SECS: i64 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    pub shown_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct StatusLine {
    message: Option<StatusMessage>,
    duration: Duration,
    last_saved: Option<DateTime<Utc>>,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_STATUS_SECS))
    }
}

impl StatusLine {
    pub fn new(duration: Duration) -> Self {
        Self {
            message: None,
            duration,
            last_saved: None,
        }
    }

    pub fn info(&mut self, text: impl Into<String>, now: DateTime<Utc>) {
        self.show(text.into(), false, now);
    }

    pub fn error(&mut self, text: impl Into<String>, now: DateTime<Utc>) {
        self.show(text.into(), true, now);
    }

    /// Message still visible at `now`, if any.
    pub fn current(&self, now: DateTime<Utc>) -> Option<&StatusMessage> {
        self.message
            .as_ref()
            .filter(|message| now - message.shown_at < self.duration)
    }

    /// Text to display at `now`.
    pub fn text(&self, now: DateTime<Utc>) -> &str {
        self.current(now)
            .map_or(IDLE_STATUS, |message| message.text.as_str())
    }

    pub fn record_saved(&mut self, at: DateTime<Utc>) {
        self.last_saved = Some(at);
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }

    fn show(&mut self, text: String, is_error: bool, now: DateTime<Utc>) {
        self.message = Some(StatusMessage {
            text,
            is_error,
            shown_at: now,
        });
    }
}

/// Renders the last-saved label, e.g. `Saved at 07/03 09:05`.
pub fn format_last_saved<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    at.format("Saved at %d/%m %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::{format_last_saved, StatusLine, IDLE_STATUS};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn message_expires_back_to_idle_text() {
        let now = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 0).unwrap();
        let mut status = StatusLine::default();
        status.error("Failed to save notes", now);

        assert_eq!(status.text(now + Duration::seconds(2)), "Failed to save notes");
        assert!(status.current(now).unwrap().is_error);
        assert_eq!(status.text(now + Duration::seconds(3)), IDLE_STATUS);
    }

    #[test]
    fn last_saved_label_pads_fields() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 0).unwrap();
        assert_eq!(format_last_saved(&at), "Saved at 07/03 09:05");
    }
}
