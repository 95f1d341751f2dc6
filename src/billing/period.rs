use chrono::{
    DateTime, Datelike, Duration, FixedOffset, LocalResult, Months, NaiveDate, NaiveDateTime,
    TimeZone, Utc,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BillingError;

/// Reporting window used by the dish analytics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Week,
    #[default]
    Month,
    All,
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Week => write!(f, "week"),
            Self::Month => write!(f, "month"),
            Self::All => write!(f, "all"),
        }
    }
}

impl FromStr for Timeframe {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "all" => Ok(Self::All),
            _ => Err(BillingError::InvalidTimeframe(s.to_string())),
        }
    }
}

/// An inclusive `[start, end]` pair of instants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl DateRange {
    pub fn contains(&self, instant: &DateTime<FixedOffset>) -> bool {
        *instant >= self.start && *instant <= self.end
    }
}

/// Far-past instant standing in for "no lower bound"
pub fn unbounded_start() -> DateTime<FixedOffset> {
    DateTime::<Utc>::MIN_UTC.fixed_offset()
}

fn unbounded_end() -> DateTime<FixedOffset> {
    DateTime::<Utc>::MAX_UTC.fixed_offset()
}

/// Longest clock jump stepped over when a wall-clock time does not exist
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// Pin a wall-clock time in `tz` to an instant. A time repeated when clocks
/// go back resolves to its first occurrence when `earliest`, else its last.
/// A time skipped when clocks go forward moves to the nearest minute that
/// exists, forwards when `earliest`, backwards otherwise.
fn resolve_local<Tz: TimeZone>(
    tz: &Tz,
    naive: NaiveDateTime,
    earliest: bool,
) -> Option<DateTime<FixedOffset>> {
    let step = if earliest {
        Duration::minutes(1)
    } else {
        Duration::minutes(-1)
    };

    let mut candidate = naive;
    for _ in 0..=MAX_GAP_MINUTES {
        match tz.from_local_datetime(&candidate) {
            LocalResult::Single(t) => return Some(t.fixed_offset()),
            LocalResult::Ambiguous(first, last) => {
                let t = if earliest { first } else { last };
                return Some(t.fixed_offset());
            }
            LocalResult::None => candidate = candidate.checked_add_signed(step)?,
        }
    }
    None
}

/// Bounds of a calendar month in `tz`, from 00:00:00.000 on the first day to
/// 23:59:59.999 on the last, each resolved with the zone's own offset on
/// that day.
///
/// `month` is 1-based; values outside 1..=12 roll into neighbouring years.
/// Returns `None` only for years chrono cannot represent.
pub fn month_range<Tz: TimeZone>(year: i32, month: u32, tz: &Tz) -> Option<DateRange> {
    let absolute = i64::from(year) * 12 + i64::from(month) - 1;
    let year = i32::try_from(absolute.div_euclid(12)).ok()?;
    let month = u32::try_from(absolute.rem_euclid(12)).ok()? + 1;

    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;

    let start = resolve_local(tz, first.and_hms_milli_opt(0, 0, 0, 0)?, true)?;
    let end = resolve_local(tz, last.and_hms_milli_opt(23, 59, 59, 999)?, false)?;

    Some(DateRange { start, end })
}

/// The calendar month containing `now`, in `now`'s time zone
pub fn current_month_range<Tz: TimeZone>(now: &DateTime<Tz>) -> DateRange {
    month_range(now.year(), now.month(), &now.timezone()).unwrap_or(DateRange {
        start: unbounded_start(),
        end: unbounded_end(),
    })
}

/// Start of the period of the same length immediately preceding `start`.
///
/// Months step back on the calendar of `start`'s zone; a result that lands
/// in a skipped wall-clock hour falls back to `start`'s fixed offset.
pub fn prior_period<Tz: TimeZone>(
    start: &DateTime<Tz>,
    timeframe: Timeframe,
) -> DateTime<FixedOffset> {
    let fixed = start.fixed_offset();
    match timeframe {
        Timeframe::Week => fixed
            .checked_sub_signed(Duration::days(7))
            .unwrap_or_else(unbounded_start),
        Timeframe::Month => start
            .clone()
            .checked_sub_months(Months::new(1))
            .map(|t| t.fixed_offset())
            .or_else(|| fixed.checked_sub_months(Months::new(1)))
            .unwrap_or_else(unbounded_start),
        Timeframe::All => unbounded_start(),
    }
}

/// Parse an ISO-8601 timestamp from the backend snapshot.
///
/// Values without an offset are read as wall-clock time in `tz`; a bare date
/// means midnight. Anything else yields `None`.
pub fn parse_timestamp<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed);
    }

    // Postgres-style offsets without a colon, e.g. "2026-01-05 10:00:00+0530"
    for format in ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%#z"] {
        if let Ok(parsed) = DateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return resolve_local(tz, naive, true);
        }
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    resolve_local(tz, date.and_hms_opt(0, 0, 0)?, true)
}
