use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::models::{Event, Message, NewEvent, NewMessage};
use crate::store::{EventStore, MessageStore, StoreError};

#[derive(Default)]
struct Tables {
    events: Vec<Event>,
    messages: Vec<Message>,
    next_event_id: i64,
    next_message_id: i64,
}

/// Volatile in-process store with the same ordering and idempotence rules as
/// the Postgres tables. Used for local development and tests.
pub struct MemoryStore {
    tables: Mutex<Tables>,
    available: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            available: AtomicBool::new(true),
        }
    }

    /// When unavailable, every call fails as an unreachable database would.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(sqlx::Error::PoolClosed));
        }
        // A poisoned lock only means another test thread panicked mid-write.
        Ok(self.tables.lock().unwrap_or_else(|p| p.into_inner()))
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        let tables = self.tables()?;
        let mut events = tables.events.clone();
        events.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then(b.created_at.cmp(&a.created_at))
                .then(b.id.cmp(&a.id))
        });
        Ok(events)
    }

    async fn create_event(&self, event: &NewEvent) -> Result<Event, StoreError> {
        let mut tables = self.tables()?;
        tables.next_event_id += 1;
        let created = event.clone().into_event(tables.next_event_id, Utc::now());
        tables.events.push(created.clone());
        Ok(created)
    }

    async fn delete_event(&self, id: i64) -> Result<(), StoreError> {
        self.tables()?.events.retain(|e| e.id != id);
        Ok(())
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn list_messages(&self) -> Result<Vec<Message>, StoreError> {
        let tables = self.tables()?;
        let mut messages = tables.messages.clone();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(messages)
    }

    async fn create_message(&self, message: &NewMessage) -> Result<Message, StoreError> {
        let mut tables = self.tables()?;
        tables.next_message_id += 1;
        let created = message.clone().into_message(tables.next_message_id, Utc::now());
        tables.messages.push(created.clone());
        Ok(created)
    }

    async fn delete_message(&self, id: i64) -> Result<(), StoreError> {
        self.tables()?.messages.retain(|m| m.id != id);
        Ok(())
    }
}
