//! Pure calendar logic: date keys, time buckets and the derived views.

pub mod buckets;
pub mod dates;
pub mod elapsed;
pub mod views;

pub use buckets::{bucket_events, events_on, group_by_date, Bucket, BucketBounds, EventBuckets};
pub use dates::{date_key, local_date, parse_date_key, Clock, FixedClock, SystemClock};
pub use elapsed::{elapsed_since, Elapsed};
pub use views::{
    event_stats, label_events, month_grid, split_upcoming, week_view, EventStats, LabeledEvent,
    MonthGrid, UpcomingSplit, WeekView, DEFAULT_UPCOMING_LIMIT,
};
