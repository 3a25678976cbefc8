use mindtrack_entity::journal::{
    journal_entry, journal_entry::Entity as JournalEntry, journal_entry::Model as JournalEntryModel,
};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use std::error::Error;
use uuid::Uuid;

pub struct Query;

impl Query {
    /// All entries of the user in no particular order.
    pub async fn get_user_journal_entries<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
    ) -> Result<Vec<JournalEntryModel>, DbErr> {
        tracing::trace!(%user_id, "loading user journal entries");
        JournalEntry::find()
            .filter(journal_entry::Column::UserId.eq(user_id))
            .all(conn)
            .await
            .inspect_err(|error| tracing::error!(error = error as &dyn Error, "failed to load user journal entries"))
    }

    pub async fn get_user_journal_entry<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        journal_entry_id: Uuid,
    ) -> Result<Option<JournalEntryModel>, DbErr> {
        JournalEntry::find_by_id(journal_entry_id)
            .filter(journal_entry::Column::UserId.eq(user_id))
            .one(conn)
            .await
            .inspect_err(|error| tracing::error!(error = error as &dyn Error, "failed to load user journal entry"))
    }
}
