//! Transient error banner.
//!
//! Holds at most one message. Showing a new message replaces the current one
//! and restarts its timer.

use instant::{Duration, Instant};

#[derive(Clone, Debug, PartialEq)]
pub struct Banner {
    pub message: String,
    pub shown_at: Instant,
}

#[derive(Debug)]
pub struct BannerSlot {
    duration: Duration,
    current: Option<Banner>,
}

impl BannerSlot {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            current: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn show(&mut self, message: impl Into<String>, now: Instant) {
        self.current = Some(Banner {
            message: message.into(),
            shown_at: now,
        });
    }

    /// Remove the banner once it has been visible for the full duration.
    ///
    /// Returns `true` when a banner was removed.
    pub fn expire(&mut self, now: Instant) -> bool {
        let expired = self
            .current
            .as_ref()
            .is_some_and(|banner| now.saturating_duration_since(banner.shown_at) >= self.duration);
        if expired {
            self.current = None;
        }
        expired
    }

    pub fn current(&self) -> Option<&Banner> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_disappears_after_duration() {
        let mut slot = BannerSlot::new(Duration::from_secs(5));
        let t0 = Instant::now();
        slot.show("Error loading model: boom", t0);
        assert!(!slot.expire(t0 + Duration::from_millis(4900)));
        assert!(slot.current().is_some());
        assert!(slot.expire(t0 + Duration::from_secs(6)));
        assert!(slot.current().is_none());
    }

    #[test]
    fn new_message_replaces_and_restarts() {
        let mut slot = BannerSlot::new(Duration::from_secs(5));
        let t0 = Instant::now();
        slot.show("first", t0);
        slot.show("second", t0 + Duration::from_secs(3));
        assert!(!slot.expire(t0 + Duration::from_secs(6)));
        assert_eq!(slot.current().map(|b| b.message.as_str()), Some("second"));
    }
}
