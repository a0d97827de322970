use thiserror::Error;

pub mod event;
pub mod message;
pub mod user;

pub use event::{Event, NewEvent};
pub use message::{Message, NewMessage};
pub use user::User;

/// Rejected input, raised before anything reaches a store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("message content must not be empty")]
    EmptyContent,

    #[error("'{0}' is not a YYYY-MM-DD date")]
    InvalidDate(String),

    #[error("'{0}' is not a HH:MM time")]
    InvalidTime(String),

    #[error("unknown user '{0}'")]
    UnknownUser(String),

    #[error("{year}-{month:02} is not a valid month")]
    InvalidMonth { year: i32, month: u32 },
}
