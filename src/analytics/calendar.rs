use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, Utc};
use serde::Serialize;

/// Source of the current instant
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearMonth {
    pub year: i32,
    /// 1-based
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Months since year 0; consecutive months differ by one.
    fn ordinal(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    fn from_ordinal(ordinal: i64) -> Self {
        Self {
            year: ordinal.div_euclid(12) as i32,
            month: ordinal.rem_euclid(12) as u32 + 1,
        }
    }

    /// The month `n` months earlier, wrapping across years.
    pub fn months_before(self, n: u32) -> Self {
        Self::from_ordinal(self.ordinal() - i64::from(n))
    }

    /// How many months `self` lies before `later`; negative when it is after.
    pub fn months_until(self, later: YearMonth) -> i64 {
        later.ordinal() - self.ordinal()
    }

    pub fn short_label(self) -> &'static str {
        MONTH_LABELS[(self.month as usize - 1) % 12]
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Reporting calendar: a clock plus the zone that decides which day and month
/// a timestamp belongs to.
#[derive(Debug, Clone)]
pub struct Calendar {
    clock: Arc<dyn Clock>,
    offset: FixedOffset,
}

impl Calendar {
    pub fn new(clock: Arc<dyn Clock>, offset: FixedOffset) -> Self {
        Self { clock, offset }
    }

    pub fn system(offset: FixedOffset) -> Self {
        Self::new(Arc::new(SystemClock), offset)
    }

    /// Fixed instant, UTC reporting zone.
    pub fn fixed_utc(now: DateTime<Utc>) -> Self {
        Self::new(Arc::new(FixedClock(now)), utc_offset())
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    pub fn today(&self) -> NaiveDate {
        self.local_date(self.now())
    }

    pub fn month_of(&self, at: DateTime<Utc>) -> YearMonth {
        YearMonth::of(self.local_date(at))
    }

    pub fn current_month(&self) -> YearMonth {
        self.month_of(self.now())
    }
}

pub fn utc_offset() -> FixedOffset {
    Utc.fix()
}
