use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info};

use crate::models::{Event, Message, NewEvent, NewMessage};
use crate::store::{with_timeout, EventStore, MessageStore, StoreError};

const SELECT_EVENTS: &str = "SELECT id, title, description, date, time, created_by, created_at \
     FROM events ORDER BY date ASC, created_at DESC";

const INSERT_EVENT: &str = "INSERT INTO events (title, description, date, time, created_by) \
     VALUES ($1, $2, $3, $4, $5) \
     RETURNING id, title, description, date, time, created_by, created_at";

const DELETE_EVENT: &str = "DELETE FROM events WHERE id = $1";

const SELECT_MESSAGES: &str =
    "SELECT id, content, sender, created_at FROM messages ORDER BY created_at ASC, id ASC";

const INSERT_MESSAGE: &str = "INSERT INTO messages (content, sender) VALUES ($1, $2) \
     RETURNING id, content, sender, created_at";

const DELETE_MESSAGE: &str = "DELETE FROM messages WHERE id = $1";

/// Events and messages in Postgres, one statement per operation.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    timeout: Duration,
}

impl PgStore {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Connects and applies pending migrations.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(timeout)
            .connect(database_url)
            .await?;

        info!("Successfully connected to database");

        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(|e| StoreError::Unavailable(e.into()))?;

        info!("Migrations run successfully");

        Ok(Self::new(pool, timeout))
    }
}

#[async_trait]
impl EventStore for PgStore {
    async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        with_timeout(
            self.timeout,
            sqlx::query_as::<_, Event>(SELECT_EVENTS).fetch_all(&self.pool),
        )
        .await
    }

    async fn create_event(&self, event: &NewEvent) -> Result<Event, StoreError> {
        let insert = sqlx::query_as::<_, Event>(INSERT_EVENT)
            .bind(event.title())
            .bind(event.description())
            .bind(event.date())
            .bind(event.time())
            .bind(event.created_by().as_str())
            .fetch_one(&self.pool);
        let created = with_timeout(self.timeout, insert).await?;

        debug!(id = created.id, date = %created.date, "Event inserted");
        Ok(created)
    }

    async fn delete_event(&self, id: i64) -> Result<(), StoreError> {
        let delete = sqlx::query(DELETE_EVENT).bind(id).execute(&self.pool);
        let result = with_timeout(self.timeout, delete).await?;

        debug!(id, rows = result.rows_affected(), "Event delete executed");
        Ok(())
    }
}

#[async_trait]
impl MessageStore for PgStore {
    async fn list_messages(&self) -> Result<Vec<Message>, StoreError> {
        with_timeout(
            self.timeout,
            sqlx::query_as::<_, Message>(SELECT_MESSAGES).fetch_all(&self.pool),
        )
        .await
    }

    async fn create_message(&self, message: &NewMessage) -> Result<Message, StoreError> {
        let insert = sqlx::query_as::<_, Message>(INSERT_MESSAGE)
            .bind(message.content())
            .bind(message.sender().as_str())
            .fetch_one(&self.pool);
        let created = with_timeout(self.timeout, insert).await?;

        debug!(id = created.id, sender = %created.sender, "Message inserted");
        Ok(created)
    }

    async fn delete_message(&self, id: i64) -> Result<(), StoreError> {
        let delete = sqlx::query(DELETE_MESSAGE).bind(id).execute(&self.pool);
        let result = with_timeout(self.timeout, delete).await?;

        debug!(id, rows = result.rows_affected(), "Message delete executed");
        Ok(())
    }
}
