use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::calendar::dates::{add_months, date_key};
use crate::models::Event;

/// Events partitioned by their distance from a reference day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventBuckets {
    pub today: Vec<Event>,
    pub this_week: Vec<Event>,
    pub this_month: Vec<Event>,
    pub later: Vec<Event>,
    pub past: Vec<Event>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Bucket {
    Today,
    ThisWeek,
    ThisMonth,
    Later,
    Past,
}

/// Date keys delimiting the buckets, computed once per reference day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketBounds {
    today: String,
    week_end: String,
    month_end: String,
}

impl BucketBounds {
    pub fn new(today: NaiveDate) -> Self {
        let week_end = today.checked_add_days(Days::new(7)).unwrap_or(NaiveDate::MAX);
        Self {
            today: date_key(today),
            week_end: date_key(week_end),
            month_end: date_key(add_months(today, 1)),
        }
    }

    /// today: `= today`; thisWeek: `(today, today+7]`; thisMonth:
    /// `(today+7, today+1 month)`; later: `>= today+1 month`; past: `< today`.
    pub fn classify(&self, date: &str) -> Bucket {
        if date < self.today.as_str() {
            Bucket::Past
        } else if date == self.today {
            Bucket::Today
        } else if date <= self.week_end.as_str() {
            Bucket::ThisWeek
        } else if date < self.month_end.as_str() {
            Bucket::ThisMonth
        } else {
            Bucket::Later
        }
    }
}

impl EventBuckets {
    pub fn get(&self, bucket: Bucket) -> &[Event] {
        match bucket {
            Bucket::Today => &self.today,
            Bucket::ThisWeek => &self.this_week,
            Bucket::ThisMonth => &self.this_month,
            Bucket::Later => &self.later,
            Bucket::Past => &self.past,
        }
    }

    fn get_mut(&mut self, bucket: Bucket) -> &mut Vec<Event> {
        match bucket {
            Bucket::Today => &mut self.today,
            Bucket::ThisWeek => &mut self.this_week,
            Bucket::ThisMonth => &mut self.this_month,
            Bucket::Later => &mut self.later,
            Bucket::Past => &mut self.past,
        }
    }

    /// Events from today up to (excluding) the "later" horizon.
    pub fn upcoming_count(&self) -> usize {
        self.today.len() + self.this_week.len() + self.this_month.len()
    }
}

/// Partitions `events` relative to `today`. Each bucket is sorted by date key
/// ascending; events sharing a date keep their input order.
pub fn bucket_events(events: &[Event], today: NaiveDate) -> EventBuckets {
    let bounds = BucketBounds::new(today);
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by(|a, b| a.date.cmp(&b.date));

    let mut buckets = EventBuckets::default();
    for event in sorted {
        buckets.get_mut(bounds.classify(&event.date)).push(event.clone());
    }
    buckets
}

/// Events whose date key is exactly `date`.
pub fn events_on<'a>(events: &'a [Event], date: &str) -> Vec<&'a Event> {
    events.iter().filter(|e| e.date == date).collect()
}

/// Groups events by exact date key, in key order.
pub fn group_by_date(events: &[Event]) -> BTreeMap<String, Vec<Event>> {
    let mut groups: BTreeMap<String, Vec<Event>> = BTreeMap::new();
    for event in events {
        groups.entry(event.date.clone()).or_default().push(event.clone());
    }
    groups
}
