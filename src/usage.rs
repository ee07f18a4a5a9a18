//! Daily quota and bonus-use accounting.
//!
//! Two records live in the host store: the [`DailyCounter`] of calls made
//! today and the [`BonusLedger`] of ad-earned extra calls. Both are read
//! through the injected [`Clock`]; a record dated any other day reads as
//! zero, and the reset is written out on the next mutation.
//!
//! Mutations (`reserve`, `release`, `add_bonus`) are read-modify-write
//! sequences and are serialised on an async mutex. A remote call holds a
//! [`Reservation`] taken before it starts; the quota check and the charge
//! are therefore one atomic step, and concurrent calls can never exceed
//! the allowance.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::storage::{BONUS_LEDGER_KEY, DAILY_COUNTER_KEY, KeyValueStore};
use crate::telemetry;
use crate::types::{BonusLedger, DailyCounter, UsageBreakdown};
use crate::{Result, ScholarGateError};

/// Free calls per calendar day.
pub const DEFAULT_DAILY_LIMIT: u32 = 15;

/// Which allowance a successful call was charged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseSource {
    Bonus,
    Daily,
}

impl UseSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            UseSource::Bonus => "bonus",
            UseSource::Daily => "daily",
        }
    }
}

/// One use taken from the allowance ahead of a remote call.
///
/// Kept on success, handed back with [`UsageLedger::release`] on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reservation {
    source: UseSource,
    date: NaiveDate,
    recorded: bool,
}

impl Reservation {
    pub fn source(&self) -> UseSource {
        self.source
    }

    /// Day the use was taken from.
    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

pub struct UsageLedger {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    daily_limit: u32,
    write_lock: Mutex<()>,
}

impl UsageLedger {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, daily_limit: u32) -> Self {
        Self {
            store,
            clock,
            daily_limit,
            write_lock: Mutex::new(()),
        }
    }

    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    /// Today's daily counter. Missing or corrupt records read as zero.
    pub async fn daily_counter(&self) -> Result<DailyCounter> {
        let today = self.clock.today();
        let stored: Option<DailyCounter> = self.read(DAILY_COUNTER_KEY).await?;
        Ok(stored
            .map(|c| c.normalized(today))
            .unwrap_or_else(|| DailyCounter::zero(today)))
    }

    /// Today's bonus ledger. Missing or corrupt records read as zero.
    pub async fn bonus_ledger(&self) -> Result<BonusLedger> {
        let today = self.clock.today();
        let stored: Option<BonusLedger> = self.read(BONUS_LEDGER_KEY).await?;
        Ok(stored
            .map(|l| l.normalized(today))
            .unwrap_or_else(|| BonusLedger::zero(today)))
    }

    pub async fn breakdown(&self) -> Result<UsageBreakdown> {
        let counter = self.daily_counter().await?;
        let ledger = self.bonus_ledger().await?;
        Ok(UsageBreakdown::compute(self.daily_limit, counter, ledger))
    }

    /// `max(0, limit - count) + bonus`.
    pub async fn remaining(&self) -> Result<u32> {
        Ok(self.breakdown().await?.total)
    }

    /// Grant `amount` bonus uses for today.
    pub async fn add_bonus(&self, amount: u32) -> Result<BonusLedger> {
        if amount == 0 {
            return Err(ScholarGateError::InvalidInput(
                "bonus amount must be positive".to_string(),
            ));
        }
        let _guard = self.write_lock.lock().await;
        let mut ledger = self.bonus_ledger().await?;
        ledger.bonus = ledger.bonus.saturating_add(amount);
        self.write(BONUS_LEDGER_KEY, &ledger).await?;
        metrics::counter!(telemetry::BONUS_GRANTED_TOTAL).increment(u64::from(amount));
        info!(amount, bonus = ledger.bonus, "bonus uses added");
        Ok(ledger)
    }

    /// Take one use for a remote call: bonus first, then the daily allowance.
    ///
    /// Returns `None` when nothing is left. Read failures propagate; a failed
    /// write is logged and the call is admitted unrecorded.
    pub async fn reserve(&self) -> Result<Option<Reservation>> {
        let _guard = self.write_lock.lock().await;
        let today = self.clock.today();
        let mut ledger = self.bonus_ledger().await?;
        let (source, written) = if ledger.bonus > 0 {
            ledger.bonus -= 1;
            (UseSource::Bonus, self.write(BONUS_LEDGER_KEY, &ledger).await)
        } else {
            let mut counter = self.daily_counter().await?;
            if counter.count >= self.daily_limit {
                return Ok(None);
            }
            counter.count += 1;
            (UseSource::Daily, self.write(DAILY_COUNTER_KEY, &counter).await)
        };

        let recorded = match written {
            Ok(()) => {
                info!(source = source.as_str(), "use reserved");
                true
            }
            Err(e) => {
                warn!(source = source.as_str(), error = %e, "failed to record usage");
                false
            }
        };
        Ok(Some(Reservation {
            source,
            date: today,
            recorded,
        }))
    }

    /// Hand a reserved use back after a failed call.
    ///
    /// No-op when the reservation was never recorded or the day has rolled
    /// over since it was taken.
    pub async fn release(&self, reservation: Reservation) -> Result<()> {
        if !reservation.recorded {
            return Ok(());
        }
        let _guard = self.write_lock.lock().await;
        if self.clock.today() != reservation.date {
            debug!(source = reservation.source.as_str(), "reservation from a past day dropped");
            return Ok(());
        }
        match reservation.source {
            UseSource::Bonus => {
                let mut ledger = self.bonus_ledger().await?;
                ledger.bonus = ledger.bonus.saturating_add(1);
                self.write(BONUS_LEDGER_KEY, &ledger).await?;
            }
            UseSource::Daily => {
                let mut counter = self.daily_counter().await?;
                counter.count = counter.count.saturating_sub(1);
                self.write(DAILY_COUNTER_KEY, &counter).await?;
            }
        }
        metrics::counter!(telemetry::USES_RELEASED_TOTAL, "source" => reservation.source.as_str())
            .increment(1);
        debug!(source = reservation.source.as_str(), "use released");
        Ok(())
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "corrupt usage record, treating as zero");
                Ok(None)
            }
        }
    }

    async fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)
            .map_err(|e| ScholarGateError::Storage(format!("failed to serialize {key}: {e}")))?;
        self.store.set(key, &json).await
    }
}
