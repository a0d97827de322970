use chrono::{NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::calendar::dates::{local_date, Clock, SystemClock};
use crate::config::{Config, StoreBackend};
use crate::store::{EventStore, MemoryStore, MessageStore, PgStore, StoreError};

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub events: Arc<dyn EventStore>,
    pub messages: Arc<dyn MessageStore>,
    pub clock: Arc<dyn Clock>,
    pub timezone: Tz,
    pub relationship_start: NaiveDateTime,
    pub poll_interval: Duration,
}

impl AppState {
    /// Opens the configured backend.
    pub async fn from_config(config: &Config) -> Result<Self, StoreError> {
        let (events, messages): (Arc<dyn EventStore>, Arc<dyn MessageStore>) =
            match config.store_backend {
                StoreBackend::Postgres => {
                    let store = Arc::new(
                        PgStore::connect(
                            &config.database_url,
                            config.max_connections,
                            config.store_timeout,
                        )
                        .await?,
                    );
                    (store.clone() as Arc<dyn EventStore>, store as Arc<dyn MessageStore>)
                }
                StoreBackend::Memory => {
                    warn!("Using the in-memory store, data is lost on restart");
                    let store = Arc::new(MemoryStore::new());
                    (store.clone() as Arc<dyn EventStore>, store as Arc<dyn MessageStore>)
                }
            };

        info!(timezone = %config.timezone, "Calendar time zone");
        Ok(Self::new(events, messages, Arc::new(SystemClock), config))
    }

    pub fn new(
        events: Arc<dyn EventStore>,
        messages: Arc<dyn MessageStore>,
        clock: Arc<dyn Clock>,
        config: &Config,
    ) -> Self {
        Self {
            events,
            messages,
            clock,
            timezone: config.timezone,
            relationship_start: config.relationship_start,
            poll_interval: config.poll_interval,
        }
    }

    /// Local calendar date of the current instant.
    pub fn today(&self) -> NaiveDate {
        local_date(self.clock.now(), self.timezone)
    }
}
