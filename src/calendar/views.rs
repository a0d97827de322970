use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::calendar::buckets::{bucket_events, events_on, group_by_date};
use crate::calendar::dates::{add_months, date_key, event_date_label, parse_date_key, week_start};
use crate::models::{Event, User, ValidationError};

/// Number of upcoming events shown next to the calendar.
pub const DEFAULT_UPCOMING_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub day: u32,
    pub date: String,
    pub has_events: bool,
    pub is_today: bool,
}

/// One month laid out Monday-first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    /// Empty cells before the 1st (0 when the month starts on a Monday).
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
    pub previous: (i32, u32),
    pub next: (i32, u32),
}

pub fn month_grid(
    events: &[Event],
    year: i32,
    month: u32,
    today: NaiveDate,
) -> Result<MonthGrid, ValidationError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(ValidationError::InvalidMonth { year, month })?;
    let next_first = add_months(first, 1);
    let previous_first = first
        .checked_sub_months(chrono::Months::new(1))
        .unwrap_or(first);

    let by_date = group_by_date(events);
    let mut days = Vec::new();
    let mut cursor = first;
    while cursor < next_first {
        let key = date_key(cursor);
        days.push(DayCell {
            day: cursor.day(),
            has_events: by_date.contains_key(&key),
            is_today: cursor == today,
            date: key,
        });
        cursor = match cursor.succ_opt() {
            Some(d) => d,
            None => break,
        };
    }

    Ok(MonthGrid {
        year,
        month,
        leading_blanks: first.weekday().num_days_from_monday(),
        days,
        previous: (previous_first.year(), previous_first.month()),
        next: (next_first.year(), next_first.month()),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekDay {
    pub date: String,
    pub is_today: bool,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekView {
    pub start: String,
    pub end: String,
    pub days: Vec<WeekDay>,
}

/// Monday..Sunday of the week containing `today`, moved by `offset_weeks`.
pub fn week_view(events: &[Event], today: NaiveDate, offset_weeks: i64) -> WeekView {
    let monday = week_start(today);
    let start = offset_weeks
        .unsigned_abs()
        .checked_mul(7)
        .map(Days::new)
        .and_then(|shift| {
            if offset_weeks >= 0 {
                monday.checked_add_days(shift)
            } else {
                monday.checked_sub_days(shift)
            }
        })
        .unwrap_or(monday);

    let days: Vec<WeekDay> = (0..7)
        .filter_map(|i| start.checked_add_days(Days::new(i)))
        .map(|date| {
            let key = date_key(date);
            WeekDay {
                is_today: date == today,
                events: events_on(events, &key).into_iter().cloned().collect(),
                date: key,
            }
        })
        .collect();

    let end = days
        .last()
        .map(|d| d.date.clone())
        .unwrap_or_else(|| date_key(start));

    WeekView {
        start: date_key(start),
        end,
        days,
    }
}

/// Binary split used by the "upcoming" list and the archive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpcomingSplit {
    /// `date >= today`, soonest first, truncated to the requested limit.
    pub upcoming: Vec<Event>,
    /// `date < today`, most recent first.
    pub archived: Vec<Event>,
}

pub fn split_upcoming(events: &[Event], today: NaiveDate, take: Option<usize>) -> UpcomingSplit {
    let today = date_key(today);

    let mut upcoming: Vec<Event> = events
        .iter()
        .filter(|e| e.date.as_str() >= today.as_str())
        .cloned()
        .collect();
    upcoming.sort_by(|a, b| a.date.cmp(&b.date));
    if let Some(n) = take {
        upcoming.truncate(n);
    }

    let mut archived: Vec<Event> = events
        .iter()
        .filter(|e| e.date.as_str() < today.as_str())
        .cloned()
        .collect();
    archived.sort_by(|a, b| b.date.cmp(&a.date));

    UpcomingSplit { upcoming, archived }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventStats {
    pub total: usize,
    pub upcoming: usize,
    pub archived: usize,
    pub by_ilias: usize,
    pub by_melissa: usize,
}

pub fn event_stats(events: &[Event], today: NaiveDate) -> EventStats {
    let buckets = bucket_events(events, today);
    let count_for = |user: User| events.iter().filter(|e| e.created_by == user).count();

    EventStats {
        total: events.len(),
        upcoming: buckets.upcoming_count(),
        archived: buckets.past.len(),
        by_ilias: count_for(User::Ilias),
        by_melissa: count_for(User::Melissa),
    }
}

/// An event paired with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledEvent {
    #[serde(flatten)]
    pub event: Event,
    pub date_label: String,
}

pub fn label_events(events: Vec<Event>, today: NaiveDate) -> Vec<LabeledEvent> {
    events
        .into_iter()
        .map(|event| {
            let date_label = parse_date_key(&event.date)
                .map(|d| event_date_label(d, today))
                .unwrap_or_else(|_| event.date.clone());
            LabeledEvent { event, date_label }
        })
        .collect()
}
