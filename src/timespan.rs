//! Decoding of Aeon range values into civil dates, times, and durations.
//!
//! Aeon stores an event position as seconds since civil 0001-01-01T00:00:00
//! and an event length as a span of calendar units, any subset of which may
//! be present. Year and month counts cover intervals of irregular length, so
//! the day count they contribute is derived from the calendar rather than a
//! fixed factor.

use chrono::{Duration, Months, NaiveDate, NaiveDateTime, Timelike};
use serde::Deserialize;

/// Timestamps below this bound fall before year 1 and are not rendered.
const MIN_TIMESTAMP: i64 = 0;

/// A span of calendar units attached to an event's range value.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Span {
    pub years: Option<i64>,
    pub months: Option<i64>,
    pub weeks: Option<i64>,
    pub days: Option<i64>,
    pub hours: Option<i64>,
    pub minutes: Option<i64>,
    pub seconds: Option<i64>,
}

/// A decoded event position: normalized date, time, and duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Moment {
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM:SS`, shortened to `HH:MM` when the seconds component is zero.
    pub time: String,
    pub lasts_days: i64,
    pub lasts_hours: i64,
    pub lasts_minutes: i64,
}

/// Decode a timestamp and span into a [`Moment`].
///
/// Returns `None` when the timestamp is absent or falls outside the
/// representable civil range; out-of-range positions are omitted rather than
/// clamped. An all-absent span decodes to a zero duration.
pub fn decode(timestamp: Option<i64>, span: &Span) -> Option<Moment> {
    let seconds = timestamp?;
    if seconds < MIN_TIMESTAMP {
        return None;
    }
    let start = epoch().checked_add_signed(Duration::try_seconds(seconds)?)?;

    let date = start.format("%Y-%m-%d").to_string();
    let time = if start.time().second() == 0 {
        start.format("%H:%M").to_string()
    } else {
        start.format("%H:%M:%S").to_string()
    };

    let mut days = month_span_days(start.date(), span);
    days += span.weeks.unwrap_or(0) * 7;
    days += span.days.unwrap_or(0);
    let mut hours = 0;
    if let Some(span_hours) = span.hours {
        days += span_hours.div_euclid(24);
        hours += span_hours.rem_euclid(24);
    }
    let mut minutes = 0;
    if let Some(span_minutes) = span.minutes {
        hours += span_minutes.div_euclid(60);
        minutes += span_minutes.rem_euclid(60);
    }
    if let Some(span_seconds) = span.seconds {
        minutes += span_seconds.div_euclid(60);
    }
    hours += minutes.div_euclid(60);
    minutes = minutes.rem_euclid(60);
    days += hours.div_euclid(24);
    hours = hours.rem_euclid(24);

    Some(Moment {
        date,
        time,
        lasts_days: days,
        lasts_hours: hours,
        lasts_minutes: minutes,
    })
}

fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .expect("civil epoch valid")
        .and_hms_opt(0, 0, 0)
        .expect("civil epoch valid")
}

/// Day count contributed by the year/month units of the span: advance the
/// start date by the given number of months (years fold into months, an end
/// day past the target month's length clamps to its last day) and take the
/// exact calendar distance. Absent units contribute nothing.
fn month_span_days(start: NaiveDate, span: &Span) -> i64 {
    if span.years.is_none() && span.months.is_none() {
        return 0;
    }
    let total_months = span.years.unwrap_or(0) * 12 + span.months.unwrap_or(0);
    let end = if total_months >= 0 {
        u32::try_from(total_months)
            .ok()
            .and_then(|count| start.checked_add_months(Months::new(count)))
    } else {
        u32::try_from(-total_months)
            .ok()
            .and_then(|count| start.checked_sub_months(Months::new(count)))
    };
    end.map(|end| (end - start).num_days()).unwrap_or(0)
}
