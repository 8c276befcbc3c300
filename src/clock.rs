use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use std::sync::Mutex;

/// Offset of the reference timezone (America/Sao_Paulo, no daylight saving since 2019)
const REFERENCE_OFFSET_WEST_SECONDS: i32 = 3 * 3600;

/// The timezone in which calendar days are evaluated for the daily withdrawal limit
pub fn reference_zone() -> FixedOffset {
    FixedOffset::west_opt(REFERENCE_OFFSET_WEST_SECONDS).expect("offset within one day")
}

/// Source of the current instant for ledger timestamps
pub trait Clock: std::fmt::Debug + Send + Sync {
    /// The current instant, expressed in the reference timezone
    fn now(&self) -> DateTime<FixedOffset>;

    /// The current calendar day in the reference timezone
    fn today(&self) -> NaiveDate {
        self.now().with_timezone(&reference_zone()).date_naive()
    }
}

/// Reads the system's wall clock
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&reference_zone())
    }
}

/// A clock that only moves when told to
#[derive(Debug)]
pub struct FixedClock {
    instant: Mutex<DateTime<FixedOffset>>,
}

impl FixedClock {
    pub fn new(instant: DateTime<FixedOffset>) -> Self {
        Self {
            instant: Mutex::new(instant),
        }
    }

    pub fn set(&self, instant: DateTime<FixedOffset>) {
        *self.instant.lock().unwrap_or_else(|e| e.into_inner()) = instant;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.instant.lock().unwrap_or_else(|e| e.into_inner())
    }
}
