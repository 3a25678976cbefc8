use chrono::{Duration, Utc};
use mindtrack_db::journal::journal_entry;
use mindtrack_db::{migration, user};
use sea_orm::{Database, DatabaseConnection, DbErr};
use test_log::test;
use uuid::Uuid;

async fn setup() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::run(&db).await.unwrap();
    db
}

#[test(tokio::test)]
async fn test_entries_are_scoped_to_owner() {
    let db = &setup().await;
    let owner = user::Mutation::create_user(db, "owner".to_owned(), None).await.unwrap();
    let other = user::Mutation::create_user(db, "other".to_owned(), None).await.unwrap();

    let now = Utc::now().fixed_offset();
    let first = journal_entry::Mutation::create_journal_entry(db, owner.id, "first".to_owned(), Some(3), now)
        .await
        .unwrap();
    journal_entry::Mutation::create_journal_entry(db, owner.id, "second".to_owned(), None, now + Duration::hours(1))
        .await
        .unwrap();

    let entries = journal_entry::Query::get_user_journal_entries(db, owner.id).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|entry| entry.user_id == owner.id));
    assert!(entries.iter().any(|entry| entry.id == first.id && entry.mood == Some(3)));

    assert!(
        journal_entry::Query::get_user_journal_entries(db, other.id)
            .await
            .unwrap()
            .is_empty()
    );
    assert!(
        journal_entry::Query::get_user_journal_entry(db, other.id, first.id)
            .await
            .unwrap()
            .is_none()
    );
    assert_eq!(
        journal_entry::Query::get_user_journal_entry(db, owner.id, first.id)
            .await
            .unwrap()
            .map(|entry| entry.text),
        Some("first".to_owned())
    );
}

#[test(tokio::test)]
async fn test_reflection_is_write_once() {
    let db = &setup().await;
    let owner = user::Mutation::create_user(db, "owner".to_owned(), None).await.unwrap();
    let entry = journal_entry::Mutation::create_journal_entry(
        db,
        owner.id,
        "tired but okay".to_owned(),
        Some(2),
        Utc::now().fixed_offset(),
    )
    .await
    .unwrap();
    assert_eq!(entry.reflection, None);

    journal_entry::Mutation::set_reflection(db, entry.id, "Rest is important.".to_owned())
        .await
        .unwrap();
    let res = journal_entry::Mutation::set_reflection(db, entry.id, "overwrite".to_owned()).await;
    assert!(matches!(res, Err(DbErr::RecordNotFound(_))));

    let res = journal_entry::Mutation::set_reflection(db, Uuid::new_v4(), "missing".to_owned()).await;
    assert!(matches!(res, Err(DbErr::RecordNotFound(_))));

    let stored = journal_entry::Query::get_user_journal_entry(db, owner.id, entry.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.reflection.as_deref(), Some("Rest is important."));
}
