//! Optimistic overlay for the chat thread.
//!
//! A sent message is shown immediately as [`DisplayedMessage::Pending`]. Once
//! the store acknowledges the write, the next refresh *issued after* that
//! acknowledgement replaces the whole list with the authoritative one and
//! drops the entry. A failed write removes its entry straight away.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::calendar::dates::{clock_time, date_key, day_header_label, local_date};
use crate::models::{Message, NewMessage, User};

/// Client-side identifier of a message the store has not confirmed yet.
pub type TempId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingMessage {
    pub temp_id: TempId,
    pub content: String,
    pub sender: User,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    acked_at: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DisplayedMessage {
    Confirmed(Message),
    Pending(PendingMessage),
}

impl DisplayedMessage {
    pub fn content(&self) -> &str {
        match self {
            DisplayedMessage::Confirmed(m) => &m.content,
            DisplayedMessage::Pending(p) => &p.content,
        }
    }

    pub fn sender(&self) -> User {
        match self {
            DisplayedMessage::Confirmed(m) => m.sender,
            DisplayedMessage::Pending(p) => p.sender,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            DisplayedMessage::Confirmed(m) => m.created_at,
            DisplayedMessage::Pending(p) => p.created_at,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, DisplayedMessage::Pending(_))
    }
}

/// Handed out by [`MessageThread::begin_refresh`] before the list is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    issued_at: u64,
}

/// A message with its local `HH:MM` stamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupedMessage {
    #[serde(flatten)]
    pub message: DisplayedMessage,
    pub time: String,
}

/// Messages of one calendar day, with the header shown above them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayGroup {
    pub date: String,
    pub label: String,
    pub messages: Vec<GroupedMessage>,
}

#[derive(Debug, Default)]
pub struct MessageThread {
    confirmed: Vec<Message>,
    pending: Vec<PendingMessage>,
    seq: u64,
    last_applied: u64,
    last_temp_id: TempId,
}

impl MessageThread {
    pub fn new(confirmed: Vec<Message>) -> Self {
        Self {
            confirmed,
            ..Self::default()
        }
    }

    /// Appends `message` as pending and returns its temporary id. Ids come
    /// from the client clock in milliseconds and never repeat within a thread.
    pub fn begin_send(&mut self, message: &NewMessage, now: DateTime<Utc>) -> TempId {
        let temp_id = now.timestamp_millis().max(self.last_temp_id + 1);
        self.last_temp_id = temp_id;

        self.pending.push(PendingMessage {
            temp_id,
            content: message.content().to_string(),
            sender: message.sender(),
            created_at: now,
            acked_at: None,
        });
        temp_id
    }

    /// Records that the store persisted `temp_id`. Returns false for unknown ids.
    pub fn acknowledge(&mut self, temp_id: TempId) -> bool {
        self.seq += 1;
        let seq = self.seq;
        match self.pending.iter_mut().find(|p| p.temp_id == temp_id) {
            Some(entry) => {
                entry.acked_at = Some(seq);
                true
            }
            None => false,
        }
    }

    /// Drops a pending entry whose write was rejected.
    pub fn fail(&mut self, temp_id: TempId) -> Option<PendingMessage> {
        let index = self.pending.iter().position(|p| p.temp_id == temp_id)?;
        Some(self.pending.remove(index))
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.seq += 1;
        RefreshTicket {
            issued_at: self.seq,
        }
    }

    /// Installs a fetched list. Pending entries acknowledged before `ticket`
    /// was issued are superseded; a ticket older than the last applied one is
    /// ignored so a slow fetch cannot roll the thread back.
    pub fn apply_refresh(&mut self, ticket: RefreshTicket, authoritative: Vec<Message>) -> bool {
        if ticket.issued_at < self.last_applied {
            return false;
        }
        self.last_applied = ticket.issued_at;
        self.confirmed = authoritative;
        self.pending
            .retain(|p| !matches!(p.acked_at, Some(acked) if acked < ticket.issued_at));
        true
    }

    /// Authoritative messages followed by the still-pending ones.
    pub fn displayed(&self) -> Vec<DisplayedMessage> {
        self.confirmed
            .iter()
            .cloned()
            .map(DisplayedMessage::Confirmed)
            .chain(self.pending.iter().cloned().map(DisplayedMessage::Pending))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.confirmed.len() + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn grouped_by_day(&self, tz: Tz, now: DateTime<Utc>) -> Vec<DayGroup> {
        group_by_day(self.displayed(), tz, now)
    }
}

/// Groups messages by the local calendar day of their timestamp, keeping the
/// order in which days first appear.
pub fn group_by_day(
    messages: impl IntoIterator<Item = DisplayedMessage>,
    tz: Tz,
    now: DateTime<Utc>,
) -> Vec<DayGroup> {
    let today = local_date(now, tz);
    let mut groups: Vec<DayGroup> = Vec::new();

    for message in messages {
        let day = local_date(message.created_at(), tz);
        let key = date_key(day);
        let entry = GroupedMessage {
            time: clock_time(message.created_at(), tz),
            message,
        };
        match groups.iter_mut().find(|g| g.date == key) {
            Some(group) => group.messages.push(entry),
            None => groups.push(DayGroup {
                label: day_header_label(day, today),
                date: key,
                messages: vec![entry],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn message(id: i64, content: &str, at: DateTime<Utc>) -> Message {
        Message {
            id,
            content: content.to_string(),
            sender: User::Ilias,
            created_at: at,
        }
    }

    fn noon(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_pending_entry_is_appended() {
        let mut thread = MessageThread::new(vec![message(1, "salut", noon(10))]);
        let input = NewMessage::new("ça va ?", User::Melissa).unwrap();

        thread.begin_send(&input, noon(10));

        let shown = thread.displayed();
        assert_eq!(shown.len(), 2);
        assert!(!shown[0].is_pending());
        assert!(shown[1].is_pending());
        assert_eq!(shown[1].content(), "ça va ?");
        assert_eq!(shown[1].sender(), User::Melissa);
    }

    #[test]
    fn test_refresh_after_ack_supersedes_pending() {
        let mut thread = MessageThread::new(vec![message(1, "salut", noon(10))]);
        let input = NewMessage::new("ça va ?", User::Melissa).unwrap();
        let temp_id = thread.begin_send(&input, noon(10));

        assert!(thread.acknowledge(temp_id));
        let ticket = thread.begin_refresh();
        thread.apply_refresh(
            ticket,
            vec![message(1, "salut", noon(10)), message(2, "ça va ?", noon(10))],
        );

        assert_eq!(thread.len(), 2);
        assert_eq!(thread.pending_count(), 0);
    }

    #[test]
    fn test_refresh_issued_before_ack_keeps_pending() {
        let mut thread = MessageThread::default();
        let input = NewMessage::new("hello", User::Ilias).unwrap();
        let temp_id = thread.begin_send(&input, noon(10));

        // A poll starts while the write is still in flight.
        let poll = thread.begin_refresh();
        thread.acknowledge(temp_id);
        thread.apply_refresh(poll, Vec::new());

        assert_eq!(thread.pending_count(), 1);

        let after = thread.begin_refresh();
        thread.apply_refresh(after, vec![message(7, "hello", noon(10))]);
        assert_eq!(thread.pending_count(), 0);
        assert_eq!(thread.len(), 1);
    }

    #[test]
    fn test_unacknowledged_entries_survive_refresh() {
        let mut thread = MessageThread::default();
        let input = NewMessage::new("hello", User::Ilias).unwrap();
        thread.begin_send(&input, noon(10));

        let ticket = thread.begin_refresh();
        thread.apply_refresh(ticket, vec![message(1, "old", noon(9))]);

        let shown = thread.displayed();
        assert_eq!(shown.len(), 2);
        assert!(shown[1].is_pending());
    }

    #[test]
    fn test_stale_refresh_is_ignored() {
        let mut thread = MessageThread::default();
        let slow = thread.begin_refresh();
        let fast = thread.begin_refresh();

        let newer = vec![message(1, "a", noon(9)), message(2, "b", noon(9))];
        assert!(thread.apply_refresh(fast, newer));
        assert!(!thread.apply_refresh(slow, vec![message(1, "a", noon(9))]));
        assert_eq!(thread.len(), 2);
    }

    #[test]
    fn test_failed_send_is_removed() {
        let mut thread = MessageThread::new(vec![message(1, "salut", noon(10))]);
        let input = NewMessage::new("perdu", User::Ilias).unwrap();
        let temp_id = thread.begin_send(&input, noon(10));

        let removed = thread.fail(temp_id).unwrap();
        assert_eq!(removed.content, "perdu");
        assert_eq!(thread.len(), 1);
        assert!(thread.fail(temp_id).is_none());
    }

    #[test]
    fn test_temp_ids_are_unique_for_same_instant() {
        let mut thread = MessageThread::default();
        let input = NewMessage::new("x", User::Ilias).unwrap();
        let a = thread.begin_send(&input, noon(10));
        let b = thread.begin_send(&input, noon(10));
        assert!(b > a);
    }

    #[test]
    fn test_grouped_by_day_uses_local_days() {
        let tz = chrono_tz::Europe::Paris;
        let mut thread = MessageThread::new(vec![
            message(1, "a", noon(8)),
            // 22:30 UTC on the 9th is already the 10th in Paris.
            message(2, "b", Utc.with_ymd_and_hms(2025, 6, 9, 22, 30, 0).unwrap()),
            message(3, "c", noon(10)),
        ]);
        let input = NewMessage::new("d", User::Melissa).unwrap();
        thread.begin_send(&input, noon(10));

        let groups = thread.grouped_by_day(tz, noon(10));

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date, "2025-06-08");
        assert_eq!(groups[0].label, "8 juin");
        assert_eq!(groups[1].label, "Aujourd'hui");
        assert_eq!(groups[1].messages.len(), 3);
        assert!(groups[1].messages[2].message.is_pending());
        assert_eq!(groups[1].messages[0].time, "00:30");
    }
}
