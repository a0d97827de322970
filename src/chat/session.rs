use chrono_tz::Tz;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::calendar::dates::Clock;
use crate::chat::poller::Poller;
use crate::chat::reconcile::{DayGroup, DisplayedMessage, MessageThread};
use crate::identity::IdentityFile;
use crate::models::{Message, NewMessage, User, ValidationError};
use crate::store::{MessageStore, StoreError};

#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no active user selected")]
    NoActiveUser,
}

/// One user's live view of the conversation.
///
/// Writes from the same session are serialized; every successful write is
/// followed by a refresh of the authoritative list.
pub struct ChatSession {
    user: User,
    store: Arc<dyn MessageStore>,
    clock: Arc<dyn Clock>,
    thread: Mutex<MessageThread>,
    writes: tokio::sync::Mutex<()>,
}

impl ChatSession {
    pub fn new(user: User, store: Arc<dyn MessageStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            user,
            store,
            clock,
            thread: Mutex::new(MessageThread::default()),
            writes: tokio::sync::Mutex::new(()),
        }
    }

    /// Starts a session for the user remembered in `identity` and loads the
    /// current list.
    pub async fn open(
        identity: &IdentityFile,
        store: Arc<dyn MessageStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ChatError> {
        let user = identity.load().ok_or(ChatError::NoActiveUser)?;
        let session = Self::new(user, store, clock);
        session.refresh().await;
        info!(user = %user, "Chat session opened");
        Ok(session)
    }

    pub fn user(&self) -> User {
        self.user
    }

    fn thread(&self) -> MutexGuard<'_, MessageThread> {
        self.thread.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn displayed(&self) -> Vec<DisplayedMessage> {
        self.thread().displayed()
    }

    pub fn grouped_by_day(&self, tz: Tz) -> Vec<DayGroup> {
        let now = self.clock.now();
        self.thread().grouped_by_day(tz, now)
    }

    /// Re-fetches the list. A failed fetch is logged and leaves the thread as is.
    pub async fn refresh(&self) -> bool {
        let ticket = self.thread().begin_refresh();
        match self.store.list_messages().await {
            Ok(messages) => self.thread().apply_refresh(ticket, messages),
            Err(e) => {
                warn!(error = %e, "Background message refresh failed");
                false
            }
        }
    }

    pub async fn send(&self, content: &str) -> Result<Message, ChatError> {
        let input = NewMessage::new(content, self.user)?;
        let temp_id = self.thread().begin_send(&input, self.clock.now());

        let created = {
            let _write = self.writes.lock().await;
            self.store.create_message(&input).await
        };

        match created {
            Ok(message) => {
                self.thread().acknowledge(temp_id);
                self.refresh().await;
                Ok(message)
            }
            Err(e) => {
                self.thread().fail(temp_id);
                warn!(error = %e, user = %self.user, "Message could not be sent");
                Err(e.into())
            }
        }
    }

    pub async fn delete(&self, id: i64) -> Result<(), ChatError> {
        {
            let _write = self.writes.lock().await;
            self.store.delete_message(id).await?;
        }
        self.refresh().await;
        Ok(())
    }

    /// Refreshes every `period` until the returned poller is cancelled or dropped.
    pub fn start_polling(self: &Arc<Self>, period: Duration) -> Poller {
        let session = Arc::clone(self);
        Poller::spawn(period, move || {
            let session = Arc::clone(&session);
            async move {
                session.refresh().await;
            }
        })
    }
}
