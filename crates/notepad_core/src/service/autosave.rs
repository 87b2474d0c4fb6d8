//! Autosave deadline tracking.
//!
//! The host owns the timer; this type only answers "is a save due now".
//! Missed intervals are not replayed: one overdue poll fires once and
//! re-arms from that moment.

use chrono::{DateTime, Duration, Utc};

pub const DEFAULT_AUTOSAVE_SECS: i64 = 30;

#[derive(Debug, Clone)]
pub struct Autosave {
    interval: Duration,
    next_due: Option<DateTime<Utc>>,
}

impl Default for Autosave {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_AUTOSAVE_SECS))
    }
}

impl Autosave {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Starts a fresh interval at `now`.
    pub fn arm(&mut self, now: DateTime<Utc>) {
        self.next_due = Some(now + self.interval);
    }

    /// Returns `true` when an interval elapsed, re-arming from `now`.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.arm(now);
                true
            }
            Some(_) => false,
            None => {
                self.arm(now);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Autosave;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn fires_once_per_interval_and_skips_missed_ticks() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut autosave = Autosave::new(Duration::seconds(30));
        assert!(!autosave.poll(start));
        assert!(!autosave.poll(start + Duration::seconds(29)));
        assert!(autosave.poll(start + Duration::seconds(30)));
        assert!(!autosave.poll(start + Duration::seconds(31)));

        assert!(autosave.poll(start + Duration::seconds(300)));
        assert!(!autosave.poll(start + Duration::seconds(301)));
    }
}
