//! Fixed clock for tests.

use bastionlands_core::determinism::Clock;
use chrono::{DateTime, TimeZone, Utc};

/// A clock that always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Noon on the first day of 2026.
    #[must_use]
    pub fn new_year() -> Self {
        Self(
            Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0)
                .single()
                .unwrap_or_default(),
        )
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
