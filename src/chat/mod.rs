//! The message thread as one user sees it: optimistic sends, periodic
//! refreshes, day grouping.

pub mod poller;
pub mod reconcile;
pub mod session;

pub use poller::{Poller, DEFAULT_POLL_INTERVAL};
pub use reconcile::{
    group_by_day, DayGroup, DisplayedMessage, GroupedMessage, MessageThread, PendingMessage, TempId,
};
pub use session::{ChatError, ChatSession};
