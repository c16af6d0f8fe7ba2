//! Time types for room availability queries.
//!
//! [`TimeWindow`] is the range a room must be free for, and [`Interval`] is a
//! busy range reported by the calendar service. The helpers at the bottom
//! turn the pieces a user gives ("on the 5th at 14:00 for half an hour")
//! into a window.

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while building time windows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    /// The window would be empty or inverted.
    #[error("window start {start} must be before end {end}")]
    EmptyWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// A duration string could not be parsed.
    #[error("invalid duration '{0}', expected minutes or ISO-8601 (e.g. PT30M)")]
    InvalidDuration(String),

    /// A time of day could not be parsed.
    #[error("invalid time of day '{0}', expected HH:MM")]
    InvalidClock(String),

    /// A calendar date could not be parsed or is out of range.
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// The local time falls in a DST gap.
    #[error("local time {0} does not exist in the configured timezone")]
    NonexistentLocalTime(NaiveDateTime),
}

/// A time window to check room availability for.
///
/// Represents a half-open interval `[start, end)` in UTC. The constructor
/// guarantees `start < end`, including when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WindowBounds")]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct WindowBounds {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<WindowBounds> for TimeWindow {
    type Error = TimeError;

    fn try_from(bounds: WindowBounds) -> Result<Self, Self::Error> {
        Self::new(bounds.start, bounds.end)
    }
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::EmptyWindow`] unless `start < end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TimeError> {
        if start >= end {
            return Err(TimeError::EmptyWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a time window from a start time and duration.
    pub fn from_duration(start: DateTime<Utc>, duration: Duration) -> Result<Self, TimeError> {
        let end = start
            .checked_add_signed(duration)
            .ok_or_else(|| TimeError::InvalidDuration(duration.to_string()))?;
        Self::new(start, end)
    }

    /// Creates a window from a local date, a local time of day and a duration.
    ///
    /// The end is computed as an instant, so a meeting that crosses midnight
    /// ends on the following day. Ambiguous local times (DST fall-back)
    /// resolve to the earlier instant.
    pub fn from_local<Tz: TimeZone>(
        date: NaiveDate,
        clock: NaiveTime,
        duration: Duration,
        tz: &Tz,
    ) -> Result<Self, TimeError> {
        let start = resolve_local(tz, date.and_time(clock))?;
        Self::from_duration(start, duration)
    }

    /// Creates a time window covering a whole local day.
    pub fn for_date<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Result<Self, TimeError> {
        let next = date
            .succ_opt()
            .ok_or_else(|| TimeError::InvalidDate(date.to_string()))?;
        let start = resolve_local(tz, date.and_time(NaiveTime::MIN))?;
        let end = resolve_local(tz, next.and_time(NaiveTime::MIN))?;
        Self::new(start, end)
    }

    /// Start of the window (inclusive).
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// End of the window (exclusive).
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Checks if a busy interval overlaps with this window.
    ///
    /// Intervals that merely touch the window edges do not overlap.
    pub fn overlaps(&self, interval: &Interval) -> bool {
        interval.start < self.end && interval.end > self.start
    }
}

/// A busy interval reported by the calendar service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }
}

fn resolve_local<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> Result<DateTime<Utc>, TimeError> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Err(TimeError::NonexistentLocalTime(local)),
    }
}

/// Parses a meeting duration.
///
/// Accepts plain minutes (`"30"`) or an ISO-8601 duration with week, day,
/// hour, minute and second components (`"PT1H15M"`, `"P1D"`). Year and
/// month components are rejected since their length is not fixed.
pub fn parse_duration(input: &str) -> Result<Duration, TimeError> {
    let invalid = || TimeError::InvalidDuration(input.to_string());
    let trimmed = input.trim();

    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        let minutes: i64 = trimmed.parse().map_err(|_| invalid())?;
        return Duration::try_minutes(minutes).ok_or_else(invalid);
    }

    let upper = trimmed.to_ascii_uppercase();
    let rest = upper.strip_prefix('P').ok_or_else(invalid)?;
    let (date_part, time_part) = match rest.split_once('T') {
        Some((date, time)) if !time.is_empty() => (date, Some(time)),
        Some(_) => return Err(invalid()),
        None => (rest, None),
    };

    let mut total = Duration::zero();
    let mut seen = 0;

    for (value, unit) in components(date_part).ok_or_else(invalid)? {
        let part = match unit {
            'W' => Duration::try_weeks(value),
            'D' => Duration::try_days(value),
            _ => None,
        };
        total = part
            .and_then(|p| total.checked_add(&p))
            .ok_or_else(invalid)?;
        seen += 1;
    }

    if let Some(time_part) = time_part {
        for (value, unit) in components(time_part).ok_or_else(invalid)? {
            let part = match unit {
                'H' => Duration::try_hours(value),
                'M' => Duration::try_minutes(value),
                'S' => Duration::try_seconds(value),
                _ => None,
            };
            total = part
                .and_then(|p| total.checked_add(&p))
                .ok_or_else(invalid)?;
            seen += 1;
        }
    }

    if seen == 0 {
        return Err(invalid());
    }
    Ok(total)
}

/// Splits `"1H15M"` into `[(1, 'H'), (15, 'M')]`.
fn components(part: &str) -> Option<Vec<(i64, char)>> {
    let mut out = Vec::new();
    let mut digits = String::new();
    for c in part.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else {
            if digits.is_empty() {
                return None;
            }
            out.push((digits.parse().ok()?, c));
            digits.clear();
        }
    }
    if !digits.is_empty() {
        return None;
    }
    Some(out)
}

/// Parses a `HH:MM` time of day.
pub fn parse_clock(input: &str) -> Result<NaiveTime, TimeError> {
    NaiveTime::parse_from_str(input.trim(), "%H:%M")
        .map_err(|_| TimeError::InvalidClock(input.to_string()))
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<NaiveDate, TimeError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| TimeError::InvalidDate(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::Toronto;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn clock(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    mod time_window {
        use super::*;

        #[test]
        fn creation() {
            let start = utc(2025, 2, 5, 9, 0, 0);
            let end = utc(2025, 2, 5, 17, 0, 0);
            let window = TimeWindow::new(start, end).unwrap();
            assert_eq!(window.start(), start);
            assert_eq!(window.end(), end);
            assert_eq!(window.end() - window.start(), Duration::hours(8));
        }

        #[test]
        fn rejects_inverted_and_empty() {
            let start = utc(2025, 2, 5, 17, 0, 0);
            let end = utc(2025, 2, 5, 9, 0, 0);
            assert!(matches!(
                TimeWindow::new(start, end),
                Err(TimeError::EmptyWindow { .. })
            ));
            assert!(TimeWindow::new(start, start).is_err());
            assert!(TimeWindow::from_duration(start, Duration::zero()).is_err());
        }

        #[test]
        fn overlaps_interval() {
            let window =
                TimeWindow::new(utc(2025, 2, 5, 9, 0, 0), utc(2025, 2, 5, 10, 0, 0)).unwrap();

            let inside = Interval::new(utc(2025, 2, 5, 9, 15, 0), utc(2025, 2, 5, 9, 45, 0));
            let around = Interval::new(utc(2025, 2, 5, 8, 0, 0), utc(2025, 2, 5, 11, 0, 0));
            let before = Interval::new(utc(2025, 2, 5, 8, 0, 0), utc(2025, 2, 5, 9, 0, 0));
            let after = Interval::new(utc(2025, 2, 5, 10, 0, 0), utc(2025, 2, 5, 11, 0, 0));

            assert!(window.overlaps(&inside));
            assert!(window.overlaps(&around));
            assert!(!window.overlaps(&before));
            assert!(!window.overlaps(&after));
        }

        #[test]
        fn from_local_converts_timezone() {
            // Toronto is UTC-5 in February.
            let window =
                TimeWindow::from_local(date(2025, 2, 5), clock(14, 0), Duration::minutes(30), &Toronto)
                    .unwrap();
            assert_eq!(window.start(), utc(2025, 2, 5, 19, 0, 0));
            assert_eq!(window.end(), utc(2025, 2, 5, 19, 30, 0));
        }

        #[test]
        fn from_local_crosses_midnight() {
            let window =
                TimeWindow::from_local(date(2025, 2, 5), clock(23, 30), Duration::hours(1), &Utc)
                    .unwrap();
            assert_eq!(window.end(), utc(2025, 2, 6, 0, 30, 0));
        }

        #[test]
        fn from_local_rejects_dst_gap() {
            // 02:30 on 2025-03-09 is skipped in Toronto.
            let result =
                TimeWindow::from_local(date(2025, 3, 9), clock(2, 30), Duration::hours(1), &Toronto);
            assert!(matches!(result, Err(TimeError::NonexistentLocalTime(_))));
        }

        #[test]
        fn for_date() {
            let window = TimeWindow::for_date(date(2025, 2, 5), &Utc).unwrap();
            assert_eq!(window.start(), utc(2025, 2, 5, 0, 0, 0));
            assert_eq!(window.end(), utc(2025, 2, 6, 0, 0, 0));

            let local = TimeWindow::for_date(date(2025, 2, 5), &Toronto).unwrap();
            assert_eq!(local.start(), utc(2025, 2, 5, 5, 0, 0));
            assert_eq!(local.end() - local.start(), Duration::hours(24));
        }

        #[test]
        fn deserialize_enforces_invariant() {
            let ok = r#"{"start":"2025-02-05T09:00:00Z","end":"2025-02-05T10:00:00Z"}"#;
            let window: TimeWindow = serde_json::from_str(ok).unwrap();
            assert_eq!(window.end() - window.start(), Duration::hours(1));

            let inverted = r#"{"start":"2025-02-05T10:00:00Z","end":"2025-02-05T09:00:00Z"}"#;
            assert!(serde_json::from_str::<TimeWindow>(inverted).is_err());
        }
    }

    mod parsing {
        use super::*;

        #[test]
        fn duration_plain_minutes() {
            assert_eq!(parse_duration("30").unwrap(), Duration::minutes(30));
            assert_eq!(parse_duration(" 90 ").unwrap(), Duration::minutes(90));
        }

        #[test]
        fn duration_iso8601() {
            assert_eq!(parse_duration("PT30M").unwrap(), Duration::minutes(30));
            assert_eq!(parse_duration("PT1H15M").unwrap(), Duration::minutes(75));
            assert_eq!(parse_duration("pt2h").unwrap(), Duration::hours(2));
            assert_eq!(parse_duration("P1D").unwrap(), Duration::days(1));
            assert_eq!(parse_duration("P1DT1H").unwrap(), Duration::hours(25));
            assert_eq!(parse_duration("PT45S").unwrap(), Duration::seconds(45));
        }

        #[test]
        fn duration_rejects_garbage() {
            for input in [
                "", "P", "PT", "P1DT", "P1Y", "P2M", "P1Y2D", "PT1.5H", "1H", "PTM", "PT5", "P-1D",
                "abc",
            ] {
                assert!(parse_duration(input).is_err(), "accepted {input:?}");
            }
        }

        #[test]
        fn duration_rejects_overflow() {
            for input in [
                "PT99999999999999H",
                "PT99999999999999999999M",
                "P99999999999W",
                "99999999999999999999",
                "P100000000000DT9223372036854775807S",
            ] {
                assert!(
                    matches!(parse_duration(input), Err(TimeError::InvalidDuration(_))),
                    "accepted {input:?}"
                );
            }
        }

        #[test]
        fn duration_too_long_for_a_window() {
            let huge = parse_duration("P99999999D").unwrap();
            let start = utc(2025, 2, 5, 9, 0, 0);
            assert!(matches!(
                TimeWindow::from_duration(start, huge),
                Err(TimeError::InvalidDuration(_))
            ));
        }

        #[test]
        fn clock_and_date() {
            assert_eq!(parse_clock("09:30").unwrap(), clock(9, 30));
            assert!(parse_clock("9h30").is_err());
            assert!(parse_clock("25:00").is_err());
            assert_eq!(parse_date("2025-02-05").unwrap(), date(2025, 2, 5));
            assert!(parse_date("05/02/2025").is_err());
        }
    }
}
