use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Time elapsed since a starting moment, split for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Elapsed {
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub total_days: i64,
}

/// Calendar parts (years, months, days) borrow from the month preceding `now`;
/// clock parts come from the absolute difference. Both instants are local
/// wall-clock readings.
pub fn elapsed_since(start: NaiveDateTime, now: NaiveDateTime) -> Elapsed {
    if now <= start {
        return Elapsed::default();
    }

    let total_seconds = (now - start).num_seconds();
    let total_minutes = total_seconds / 60;
    let total_hours = total_minutes / 60;

    let mut years = i64::from(now.year() - start.year());
    let mut months = i64::from(now.month()) - i64::from(start.month());
    let mut days = i64::from(now.day()) - i64::from(start.day());

    if days < 0 {
        months -= 1;
        days += days_in_previous_month(now.date());
    }
    if months < 0 {
        years -= 1;
        months += 12;
    }

    Elapsed {
        years,
        months,
        days,
        hours: total_hours % 24,
        minutes: total_minutes % 60,
        seconds: total_seconds % 60,
        total_days: total_hours / 24,
    }
}

fn days_in_previous_month(date: NaiveDate) -> i64 {
    date.with_day(1)
        .and_then(|first| first.pred_opt())
        .map(|last| i64::from(last.day()))
        .unwrap_or(30)
}
