//! Persisted usage records and the breakdown exposed to UI layers

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Remote calls made today against the free daily allowance.
///
/// Stored as `{"count": n, "date": "YYYY-MM-DD"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCounter {
    pub count: u32,
    pub date: NaiveDate,
}

impl DailyCounter {
    pub fn zero(today: NaiveDate) -> Self {
        Self {
            count: 0,
            date: today,
        }
    }

    /// The counter as it applies to `today`: a record from another day reads as zero.
    pub fn normalized(self, today: NaiveDate) -> Self {
        if self.date == today {
            self
        } else {
            Self::zero(today)
        }
    }
}

/// Extra calls earned through rewarded ads. Does not roll over.
///
/// Stored as `{"date": "YYYY-MM-DD", "bonus": n}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusLedger {
    pub date: NaiveDate,
    #[serde(default)]
    pub bonus: u32,
}

impl BonusLedger {
    pub fn zero(today: NaiveDate) -> Self {
        Self {
            date: today,
            bonus: 0,
        }
    }

    /// The ledger as it applies to `today`: a record from another day reads as zero.
    pub fn normalized(self, today: NaiveDate) -> Self {
        if self.date == today {
            self
        } else {
            Self::zero(today)
        }
    }
}

/// Remaining allowance, split for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageBreakdown {
    /// Free calls left today: `max(0, limit - count)`.
    pub daily: u32,
    /// Bonus calls left today.
    pub bonus: u32,
    /// `daily + bonus`.
    pub total: u32,
}

impl UsageBreakdown {
    pub fn compute(daily_limit: u32, counter: DailyCounter, ledger: BonusLedger) -> Self {
        let daily = daily_limit.saturating_sub(counter.count);
        Self {
            daily,
            bonus: ledger.bonus,
            total: daily.saturating_add(ledger.bonus),
        }
    }
}
