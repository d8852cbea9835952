//! Human-readable spans of time.
//!
//! Conventions show how long they run ("3 days") next to their start time.
//! The span is measured from midnight of the start day to the last second of
//! the end day, so a Friday-to-Sunday convention reads as three days no
//! matter when its first and last events fall.
//!
//! Wording follows the usual "distance in words" buckets:
//!
//! ```text
//! 0 min            less than a minute
//! 1 min            1 minute
//! 2-44 min         N minutes
//! 45-89 min        about 1 hour
//! 90 min - 24 h    about N hours
//! 24 h - 42 h      1 day
//! 42 h - 30 days   N days
//! 30 - 60 days     about N months (1 or 2)
//! 60 days - 1 yr   N months
//! beyond           about / over / almost N years
//! ```

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const MINUTES_PER_DAY: i64 = 1440;
const MINUTES_PER_MONTH: i64 = 43_200;
const MINUTES_PER_YEAR: i64 = 525_600;

/// Describe the distance between two instants, order-insensitive.
pub fn distance_in_words(from: NaiveDateTime, to: NaiveDateTime) -> String {
    let seconds = (to - from).num_seconds().abs();
    let minutes = (seconds as f64 / 60.0).round() as i64;

    match minutes {
        0 => "less than a minute".to_string(),
        1 => "1 minute".to_string(),
        2..=44 => format!("{minutes} minutes"),
        45..=89 => "about 1 hour".to_string(),
        90..=1439 => format!("about {} hours", rounded(minutes, 60)),
        1440..=2519 => "1 day".to_string(),
        2520..=43_199 => format!("{} days", rounded(minutes, MINUTES_PER_DAY)),
        43_200..=86_399 => {
            let months = rounded(minutes, MINUTES_PER_MONTH);
            if months == 1 {
                "about 1 month".to_string()
            } else {
                format!("about {months} months")
            }
        }
        86_400..=525_599 => format!("{} months", rounded(minutes, MINUTES_PER_MONTH)),
        _ => years_in_words(minutes),
    }
}

fn years_in_words(minutes: i64) -> String {
    let years = minutes / MINUTES_PER_YEAR;
    let remainder = minutes % MINUTES_PER_YEAR;
    let plural = |n: i64| if n == 1 { "year" } else { "years" };

    if remainder < MINUTES_PER_YEAR / 4 {
        format!("about {years} {}", plural(years))
    } else if remainder < MINUTES_PER_YEAR * 3 / 4 {
        format!("over {years} {}", plural(years))
    } else {
        format!("almost {} {}", years + 1, plural(years + 1))
    }
}

fn rounded(minutes: i64, unit: i64) -> i64 {
    (minutes as f64 / unit as f64).round() as i64
}

/// Span of whole days from `start`'s midnight to the end of `end`'s day.
pub fn whole_day_span(start: NaiveDateTime, end: NaiveDateTime) -> String {
    distance_in_words(start_of_day(start.date()), end_of_day(end.date()))
}

fn start_of_day(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN)
}

fn end_of_day(day: NaiveDate) -> NaiveDateTime {
    // 23:59:59 always exists on a naive date.
    day.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN))
}
