//! Calendar date source for the daily check-in cycle.
//!
//! The check-in day rolls over at midnight UTC. Every component that needs
//! "today" takes it from a `Clock` so tests can simulate day boundaries and
//! streak breaks without touching the wall clock.

use std::sync::Mutex;

use chrono::{Days, NaiveDate, Utc};

pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Production clock: the current calendar date in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Clock pinned to a settable date, for tests.
#[derive(Debug)]
pub struct FixedClock {
    today: Mutex<NaiveDate>,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            today: Mutex::new(date),
        }
    }

    pub fn set(&self, date: NaiveDate) {
        *self.today.lock().expect("clock lock poisoned") = date;
    }

    /// Moves the pinned date forward, e.g. to simulate a skipped day.
    pub fn advance_days(&self, days: u64) {
        let mut today = self.today.lock().expect("clock lock poisoned");
        *today = today
            .checked_add_days(Days::new(days))
            .expect("date out of range");
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.today.lock().expect("clock lock poisoned")
    }
}
