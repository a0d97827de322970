//! Date helpers shared by the calendar views and the chat thread.
//!
//! Every calendar date is derived from the *local* fields of an instant in the
//! configured time zone, never from its UTC rendering.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;

use crate::models::ValidationError;

const WEEKDAYS_FR: [&str; 7] = [
    "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche",
];

const MONTHS_FR: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// `YYYY-MM-DD` built from the year/month/day fields, zero-padded.
pub fn date_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

pub fn parse_date_key(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

/// Adds calendar months, clamping to the last day of shorter months.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.week(Weekday::Mon).first_day()
}

pub fn month_name_fr(month: u32) -> &'static str {
    MONTHS_FR[(month.clamp(1, 12) - 1) as usize]
}

pub fn weekday_name_fr(weekday: Weekday) -> &'static str {
    WEEKDAYS_FR[weekday.num_days_from_monday() as usize]
}

/// Label shown on event cards: "Aujourd'hui", "Demain", otherwise the long
/// French date, with the year only when it differs from the current one.
pub fn event_date_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        return "Aujourd'hui".to_string();
    }
    if today.succ_opt() == Some(date) {
        return "Demain".to_string();
    }

    let mut label = format!(
        "{} {} {}",
        weekday_name_fr(date.weekday()),
        date.day(),
        month_name_fr(date.month())
    );
    if date.year() != today.year() {
        label.push_str(&format!(" {}", date.year()));
    }
    label
}

/// Section header of a chat day.
pub fn day_header_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Aujourd'hui".to_string()
    } else if today.pred_opt() == Some(date) {
        "Hier".to_string()
    } else {
        format!("{} {}", date.day(), month_name_fr(date.month()))
    }
}

/// `HH:MM` of an instant in local time.
pub fn clock_time(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%H:%M").to_string()
}
