//! `PostgreSQL` integration tests for notification storage and read state.

use chrono::Utc;
use deskflow::notification::{
    domain::{NewNotification, Notification, NotificationKind},
    ports::{NotificationRepository, NotificationRepositoryError},
};
use deskflow::principal::domain::PrincipalId;
use deskflow::task::domain::Priority;
use mockable::DefaultClock;
use rstest::rstest;

use crate::postgres::helpers::{BoxError, IsolatedSchema, schema};

fn notification(recipient: &str, message: &str) -> Result<Notification, BoxError> {
    Ok(Notification::new(
        NewNotification {
            user_id: PrincipalId::new(recipient)?,
            message: message.to_owned(),
            kind: NotificationKind::Mention,
            priority: Priority::Medium,
            link: Some("/tasks/abc".to_owned()),
        },
        &DefaultClock,
    )?)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stored_notification_round_trips(
    schema: Result<IsolatedSchema, BoxError>,
) -> Result<(), BoxError> {
    let isolated = schema?;
    let repository = isolated.notifications();
    let emitted = notification("emp1", "Arun Sharma commented")?;
    repository.store(&emitted).await?;

    let found = repository
        .find_by_id(emitted.id())
        .await?
        .ok_or("notification should be found")?;
    let duplicate = repository.store(&emitted).await;

    assert_eq!(found.message(), "Arun Sharma commented");
    assert_eq!(found.kind(), NotificationKind::Mention);
    assert_eq!(found.link(), Some("/tasks/abc"));
    assert!(!found.is_read());
    assert!(found.created_at() <= Utc::now());
    assert!(matches!(
        duplicate,
        Err(NotificationRepositoryError::DuplicateNotification(_))
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_is_newest_first_and_limited(
    schema: Result<IsolatedSchema, BoxError>,
) -> Result<(), BoxError> {
    let isolated = schema?;
    let repository = isolated.notifications();
    for index in 0..4 {
        repository
            .store(&notification("emp1", &format!("message {index}"))?)
            .await?;
    }
    repository.store(&notification("mgr1", "elsewhere")?).await?;
    let recipient = PrincipalId::new("emp1")?;

    let page = repository.list_for_user(&recipient, 2).await?;

    let messages: Vec<&str> = page.iter().map(Notification::message).collect();
    assert_eq!(messages, vec!["message 3", "message 2"]);
    assert_eq!(repository.count_unread(&recipient).await?, 4);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn read_state_is_owner_scoped(
    schema: Result<IsolatedSchema, BoxError>,
) -> Result<(), BoxError> {
    let isolated = schema?;
    let repository = isolated.notifications();
    let owner = PrincipalId::new("emp1")?;
    let stranger = PrincipalId::new("mgr1")?;
    let first = notification("emp1", "first")?;
    repository.store(&first).await?;
    repository.store(&notification("emp1", "second")?).await?;

    let by_stranger = repository.mark_read(first.id(), &stranger).await?;
    let by_owner = repository
        .mark_read(first.id(), &owner)
        .await?
        .ok_or("owner should mark read")?;
    let bulk = repository.mark_all_read(&owner).await?;
    let repeat = repository.mark_all_read(&owner).await?;

    assert!(by_stranger.is_none());
    assert!(by_owner.is_read());
    assert_eq!(bulk, 1);
    assert_eq!(repeat, 0);
    assert_eq!(repository.count_unread(&owner).await?, 0);
    Ok(())
}
