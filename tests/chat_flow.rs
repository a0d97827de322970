use std::sync::Arc;
use std::time::Duration;

use couple_calendar::calendar::SystemClock;
use couple_calendar::chat::{ChatSession, DEFAULT_POLL_INTERVAL};
use couple_calendar::identity::IdentityFile;
use couple_calendar::models::{NewMessage, User};
use couple_calendar::store::{MemoryStore, MessageStore};

fn identity_for(test: &str) -> IdentityFile {
    IdentityFile::new(std::env::temp_dir().join(format!(
        "couple_calendar_{}_{}.json",
        test,
        std::process::id()
    )))
}

#[tokio::test(start_paused = true)]
async fn polling_picks_up_the_other_users_messages() {
    let identity = identity_for("polling");
    identity.save(User::Ilias).unwrap();

    let store = Arc::new(MemoryStore::new());
    let session = Arc::new(
        ChatSession::open(&identity, store.clone(), Arc::new(SystemClock))
            .await
            .unwrap(),
    );
    assert_eq!(session.user(), User::Ilias);
    assert!(session.displayed().is_empty());

    let poller = session.start_polling(DEFAULT_POLL_INTERVAL);

    store
        .create_message(&NewMessage::new("tu rentres quand ?", User::Melissa).unwrap())
        .await
        .unwrap();
    assert!(session.displayed().is_empty());

    tokio::time::sleep(Duration::from_millis(3_100)).await;

    let shown = session.displayed();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].sender(), User::Melissa);

    poller.cancel().await;
    identity.clear().unwrap();
}

#[tokio::test]
async fn send_reply_and_group_by_day() {
    let identity = identity_for("reply");
    identity.save(User::Melissa).unwrap();

    let store = Arc::new(MemoryStore::new());
    store
        .create_message(&NewMessage::new("coucou", User::Ilias).unwrap())
        .await
        .unwrap();

    let session = ChatSession::open(&identity, store.clone(), Arc::new(SystemClock))
        .await
        .unwrap();
    assert_eq!(session.displayed().len(), 1);

    session.send("vers 19h").await.unwrap();

    let groups = session.grouped_by_day(chrono_tz::Europe::Paris);
    let total: usize = groups.iter().map(|g| g.messages.len()).sum();
    assert_eq!(total, 2);
    assert!(groups
        .iter()
        .flat_map(|g| g.messages.iter())
        .all(|m| !m.message.is_pending()));

    assert_eq!(store.list_messages().await.unwrap().len(), 2);
    identity.clear().unwrap();
}
