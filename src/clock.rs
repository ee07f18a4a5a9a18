//! Calendar clock used for day roll-over of usage counters.

use std::sync::Mutex;

use chrono::{Days, NaiveDate, Utc};

/// Source of "today".
///
/// Usage records are compared against this date on every read; a record
/// from any other day counts as zero.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock, calendar day in UTC.
///
/// UTC matches the `YYYY-MM-DD` dates already written by existing installs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Manually driven clock for tests and simulations.
#[derive(Debug)]
pub struct FixedClock {
    today: Mutex<NaiveDate>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    pub fn set(&self, today: NaiveDate) {
        if let Ok(mut guard) = self.today.lock() {
            *guard = today;
        }
    }

    /// Move forward by `days` calendar days.
    pub fn advance_days(&self, days: u64) {
        if let Ok(mut guard) = self.today.lock() {
            if let Some(next) = guard.checked_add_days(Days::new(days)) {
                *guard = next;
            }
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        match self.today.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
