//! Persistence of events and messages.
//!
//! Reads are best-effort at the call sites that render data (see
//! [`list_events_or_empty`]); writes always report failures to the caller.
//! Deleting an id that does not exist is not an error.

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::error;

use crate::models::{Event, Message, NewEvent, NewMessage};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(10);

/// The store could not be reached or did not answer in time.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),

    #[error("store did not answer within {0:?}")]
    TimedOut(Duration),
}

#[async_trait]
pub trait EventStore: Send + Sync {
    /// All events, `date` ascending then newest first within a date.
    async fn list_events(&self) -> Result<Vec<Event>, StoreError>;

    async fn create_event(&self, event: &NewEvent) -> Result<Event, StoreError>;

    async fn delete_event(&self, id: i64) -> Result<(), StoreError>;
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    /// All messages in chat order (oldest first).
    async fn list_messages(&self) -> Result<Vec<Message>, StoreError>;

    async fn create_message(&self, message: &NewMessage) -> Result<Message, StoreError>;

    async fn delete_message(&self, id: i64) -> Result<(), StoreError>;
}

/// Bounds a store call by `limit`, mapping expiry to [`StoreError::TimedOut`].
pub async fn with_timeout<T, E, F>(limit: Duration, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, E>>,
    E: Into<StoreError>,
{
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| StoreError::TimedOut(limit))?
        .map_err(Into::into)
}

pub async fn list_events_or_empty(store: &dyn EventStore) -> Vec<Event> {
    match store.list_events().await {
        Ok(events) => events,
        Err(e) => {
            error!(error = %e, "Failed to list events, rendering none");
            Vec::new()
        }
    }
}

pub async fn list_messages_or_empty(store: &dyn MessageStore) -> Vec<Message> {
    match store.list_messages().await {
        Ok(messages) => messages,
        Err(e) => {
            error!(error = %e, "Failed to list messages, rendering none");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_maps_expiry() {
        let result: Result<(), StoreError> = with_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, sqlx::Error>(())
        })
        .await;

        assert!(matches!(result, Err(StoreError::TimedOut(_))));
    }

    #[tokio::test]
    async fn test_lenient_reads_degrade_to_empty() {
        let store = MemoryStore::new();
        store.set_available(false);

        assert!(list_events_or_empty(&store).await.is_empty());
        assert!(list_messages_or_empty(&store).await.is_empty());
    }
}
