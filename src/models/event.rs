use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::calendar::dates::{date_key, parse_date_key};
use crate::models::{User, ValidationError};

/// A calendar entry as persisted in the `events` table.
///
/// `date` is kept as the plain `YYYY-MM-DD` key and compared as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub date: String,
    pub time: Option<String>,
    #[sqlx(try_from = "String")]
    pub created_by: User,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    title: String,
    description: Option<String>,
    date: String,
    time: Option<String>,
    created_by: User,
}

impl NewEvent {
    /// Trims the free-text fields, drops blank optionals and normalizes `date`
    /// and `time` to their zero-padded forms.
    pub fn new(
        title: &str,
        description: Option<&str>,
        date: &str,
        time: Option<&str>,
        created_by: User,
    ) -> Result<Self, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        let date = date_key(parse_date_key(date)?);

        let time = match non_blank(time) {
            Some(raw) => Some(
                NaiveTime::parse_from_str(raw, "%H:%M")
                    .map_err(|_| ValidationError::InvalidTime(raw.to_string()))?
                    .format("%H:%M")
                    .to_string(),
            ),
            None => None,
        };

        Ok(Self {
            title: title.to_string(),
            description: non_blank(description).map(str::to_string),
            date,
            time,
            created_by,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn time(&self) -> Option<&str> {
        self.time.as_deref()
    }

    pub fn created_by(&self) -> User {
        self.created_by
    }

    /// Materializes the row a store would write for this input.
    pub fn into_event(self, id: i64, created_at: DateTime<Utc>) -> Event {
        Event {
            id,
            title: self.title,
            description: self.description,
            date: self.date,
            time: self.time,
            created_by: self.created_by,
            created_at,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
