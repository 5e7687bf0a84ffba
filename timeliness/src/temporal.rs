//! Temporal value types shared by the parser and the restriction evaluator.
//!
//! A [`Kind`] selects which formats apply to a raw value, how its extracted
//! components are normalized, and at which granularity it is compared. Parsed
//! values are represented as [`Temporal`], a thin tagged wrapper over chrono's
//! naive (local wall-clock) types.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The date on which time-of-day values are placed for comparison.
pub static DUMMY_DATE: Lazy<NaiveDate> = Lazy::new(|| {
    // This date is compile-time constant and known to be valid
    #[allow(clippy::expect_used)]
    NaiveDate::from_ymd_opt(2000, 1, 1).expect("2000-01-01 should be a valid date")
});

/// The kind of temporal value an attribute holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// A calendar date without time of day
    Date,
    /// A time of day without a meaningful date
    Time,
    /// A full local date and time
    DateTime,
}

impl Kind {
    /// All kinds, in declaration order.
    pub const ALL: [Kind; 3] = [Kind::Date, Kind::Time, Kind::DateTime];

    /// Returns the name used in messages and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Date => "date",
            Kind::Time => "time",
            Kind::DateTime => "datetime",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Kind {
    type Err = crate::error::TimelinessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(Kind::Date),
            "time" => Ok(Kind::Time),
            "datetime" => Ok(Kind::DateTime),
            other => Err(crate::error::TimelinessError::Configuration(format!(
                "unknown kind '{other}', expected date, time or datetime"
            ))),
        }
    }
}

/// The 7-slot intermediate representation produced by format extractors.
///
/// Slots are `[year, month, day, hour, minute, second, fraction]`, where the
/// fraction is expressed in microseconds. Every slot is always populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ComponentTuple(pub [i64; 7]);

impl ComponentTuple {
    pub const YEAR: usize = 0;
    pub const MONTH: usize = 1;
    pub const DAY: usize = 2;
    pub const HOUR: usize = 3;
    pub const MINUTE: usize = 4;
    pub const SECOND: usize = 5;
    pub const FRACTION: usize = 6;

    /// Creates a tuple from its seven components.
    pub fn new(
        year: i64,
        month: i64,
        day: i64,
        hour: i64,
        minute: i64,
        second: i64,
        fraction: i64,
    ) -> Self {
        Self([year, month, day, hour, minute, second, fraction])
    }

    pub fn year(&self) -> i64 {
        self.0[Self::YEAR]
    }

    pub fn month(&self) -> i64 {
        self.0[Self::MONTH]
    }

    pub fn day(&self) -> i64 {
        self.0[Self::DAY]
    }

    pub fn hour(&self) -> i64 {
        self.0[Self::HOUR]
    }

    pub fn minute(&self) -> i64 {
        self.0[Self::MINUTE]
    }

    pub fn second(&self) -> i64 {
        self.0[Self::SECOND]
    }

    pub fn fraction(&self) -> i64 {
        self.0[Self::FRACTION]
    }

    /// Overwrites the date slots with the dummy date.
    pub fn with_dummy_date(mut self) -> Self {
        self.0[Self::YEAR] = i64::from(DUMMY_DATE.year());
        self.0[Self::MONTH] = i64::from(DUMMY_DATE.month());
        self.0[Self::DAY] = i64::from(DUMMY_DATE.day());
        self
    }

    /// Zeroes the time-of-day slots.
    pub fn without_time(mut self) -> Self {
        for slot in &mut self.0[Self::HOUR..] {
            *slot = 0;
        }
        self
    }

    /// Returns the tuple normalized for `kind`.
    pub fn normalized(self, kind: Kind) -> Self {
        match kind {
            Kind::Time => self.with_dummy_date(),
            Kind::Date => self.without_time(),
            Kind::DateTime => self,
        }
    }

    /// Builds the calendar date described by the date slots.
    pub fn to_date(&self) -> Option<NaiveDate> {
        let year = i32::try_from(self.year()).ok()?;
        let month = u32::try_from(self.month()).ok()?;
        let day = u32::try_from(self.day()).ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }

    /// Builds the time of day described by the time slots.
    pub fn to_time(&self) -> Option<NaiveTime> {
        let hour = u32::try_from(self.hour()).ok()?;
        let minute = u32::try_from(self.minute()).ok()?;
        let second = u32::try_from(self.second()).ok()?;
        let micro = u32::try_from(self.fraction()).ok()?;
        // from_hms_micro_opt accepts 60 seconds only as a leap second via the
        // fraction overflow, which a parsed tuple never asks for.
        if second > 59 || micro > 999_999 {
            return None;
        }
        NaiveTime::from_hms_micro_opt(hour, minute, second, micro)
    }
}

impl From<[i64; 7]> for ComponentTuple {
    fn from(slots: [i64; 7]) -> Self {
        Self(slots)
    }
}

/// A constructed temporal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Temporal {
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

impl Temporal {
    /// Returns the kind this value was constructed as.
    pub fn kind(&self) -> Kind {
        match self {
            Temporal::Date(_) => Kind::Date,
            Temporal::Time(_) => Kind::Time,
            Temporal::DateTime(_) => Kind::DateTime,
        }
    }

    /// The calendar date; a bare time lands on the dummy date.
    pub fn to_date(&self) -> NaiveDate {
        match self {
            Temporal::Date(date) => *date,
            Temporal::Time(_) => *DUMMY_DATE,
            Temporal::DateTime(datetime) => datetime.date(),
        }
    }

    /// The time of day placed on the dummy date; a bare date is midnight.
    pub fn to_dummy_time(&self) -> NaiveDateTime {
        let time = match self {
            Temporal::Date(_) => NaiveTime::MIN,
            Temporal::Time(time) => *time,
            Temporal::DateTime(datetime) => datetime.time(),
        };
        DUMMY_DATE.and_time(time)
    }

    /// The full timestamp.
    pub fn to_datetime(&self) -> NaiveDateTime {
        match self {
            Temporal::Date(date) => date.and_time(NaiveTime::MIN),
            Temporal::Time(time) => DUMMY_DATE.and_time(*time),
            Temporal::DateTime(datetime) => *datetime,
        }
    }

    /// Converts to the comparison granularity of `kind`.
    pub fn at_granularity(&self, kind: Kind) -> NaiveDateTime {
        match kind {
            Kind::Date => self.to_date().and_time(NaiveTime::MIN),
            Kind::Time => self.to_dummy_time(),
            Kind::DateTime => self.to_datetime(),
        }
    }

    /// Formats the value as it is shown in messages for `kind`.
    pub fn display_as(&self, kind: Kind) -> String {
        match kind {
            Kind::Date => self.to_date().format("%Y-%m-%d").to_string(),
            Kind::Time => self.to_dummy_time().format("%H:%M:%S").to_string(),
            Kind::DateTime => self.to_datetime().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Returns the value's components as a 7-slot tuple.
    pub fn components(&self) -> ComponentTuple {
        let datetime = self.to_datetime();
        ComponentTuple::new(
            i64::from(datetime.year()),
            i64::from(datetime.month()),
            i64::from(datetime.day()),
            i64::from(datetime.hour()),
            i64::from(datetime.minute()),
            i64::from(datetime.second()),
            i64::from(datetime.nanosecond() / 1_000),
        )
    }
}

impl fmt::Display for Temporal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_as(self.kind()))
    }
}

impl From<NaiveDate> for Temporal {
    fn from(date: NaiveDate) -> Self {
        Temporal::Date(date)
    }
}

impl From<NaiveTime> for Temporal {
    fn from(time: NaiveTime) -> Self {
        Temporal::Time(time)
    }
}

impl From<NaiveDateTime> for Temporal {
    fn from(datetime: NaiveDateTime) -> Self {
        Temporal::DateTime(datetime)
    }
}

/// A value as assigned by the host, before any type casting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// User-supplied text, parsed against the format registry
    Text(String),
    /// An already-typed value, accepted without parsing
    Native(Temporal),
}

impl RawValue {
    /// Returns true for whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            RawValue::Text(text) => text.trim().is_empty(),
            RawValue::Native(_) => false,
        }
    }
}

impl From<&str> for RawValue {
    fn from(text: &str) -> Self {
        RawValue::Text(text.to_string())
    }
}

impl From<String> for RawValue {
    fn from(text: String) -> Self {
        RawValue::Text(text)
    }
}

impl From<Temporal> for RawValue {
    fn from(value: Temporal) -> Self {
        RawValue::Native(value)
    }
}

impl From<NaiveDate> for RawValue {
    fn from(date: NaiveDate) -> Self {
        RawValue::Native(date.into())
    }
}

impl From<NaiveTime> for RawValue {
    fn from(time: NaiveTime) -> Self {
        RawValue::Native(time.into())
    }
}

impl From<NaiveDateTime> for RawValue {
    fn from(datetime: NaiveDateTime) -> Self {
        RawValue::Native(datetime.into())
    }
}
