//! Wall-clock abstraction for testability
//!
//! Services never call `Utc::now()` directly; they hold an `Arc<dyn Clock>` so
//! tests can pin and advance time deterministically.
//!
//! # Examples
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use docpulse_common::time::{Clock, MockClock};
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let clock = MockClock::at(start);
//! clock.advance(Duration::hours(2));
//! assert_eq!(clock.now(), start + Duration::hours(2));
//! ```

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

/// Source of the current UTC time.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;
}

/// Real system clock. Use this in production code.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for deterministic tests.
///
/// Clones share the same underlying instant, so a test can hand one clone to
/// the service under test and advance the other.
#[derive(Debug, Clone)]
pub struct MockClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
    /// Create a clock pinned at `start`.
    pub fn at(start: DateTime<Utc>) -> Self {
        Self { now: Arc::new(Mutex::new(start)) }
    }

    /// Move the clock forward (or backward, for negative durations).
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }

    /// Jump to an absolute instant.
    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock() = to;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::at(Utc::now())
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}
