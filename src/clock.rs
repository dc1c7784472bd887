//! Injected time source.
//!
//! The original application grew a dedicated server-time endpoint because
//! client clocks drifted from the server's; every visibility decision here
//! therefore goes through one shared [`Clock`] held in application state
//! instead of reaching for the wall clock directly. Tests pin time with
//! [`FixedClock`].

use chrono::{DateTime, Utc};

/// Source of "current time" for visibility decisions and the time endpoint.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a fixed instant, for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixed_clock_returns_pinned_instant() {
        let pinned = Utc.with_ymd_and_hms(2025, 9, 5, 12, 0, 0).unwrap();
        let clock = FixedClock(pinned);
        assert_eq!(clock.now(), pinned);
        assert_eq!(clock.now(), clock.now());
    }
}
