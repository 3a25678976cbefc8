use chrono::{DateTime, FixedOffset};
use mindtrack_entity::journal::{journal_entry, journal_entry::Model as JournalEntryModel};
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use std::error::Error;
use uuid::Uuid;

pub struct Mutation;

impl Mutation {
    pub async fn create_journal_entry<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        text: String,
        mood: Option<i16>,
        created_at: DateTime<FixedOffset>,
    ) -> Result<JournalEntryModel, DbErr> {
        let journal_entry = journal_entry::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            user_id: ActiveValue::Set(user_id),
            text: ActiveValue::Set(text),
            mood: ActiveValue::Set(mood),
            reflection: ActiveValue::Set(None),
            created_at: ActiveValue::Set(created_at),
        };

        journal_entry
            .insert(conn)
            .await
            .inspect_err(|error| tracing::error!(error = error as &dyn Error, "failed to create journal entry"))
    }

    /// Attach the reflection to an entry. Fails with [`DbErr::RecordNotFound`] if the entry does
    /// not exist or already carries a reflection.
    pub async fn set_reflection<C: ConnectionTrait>(
        conn: &C,
        journal_entry_id: Uuid,
        reflection: String,
    ) -> Result<(), DbErr> {
        let res = journal_entry::Entity::update_many()
            .col_expr(journal_entry::Column::Reflection, Expr::value(reflection))
            .filter(journal_entry::Column::Id.eq(journal_entry_id))
            .filter(journal_entry::Column::Reflection.is_null())
            .exec(conn)
            .await?;
        if res.rows_affected == 0 {
            return Err(DbErr::RecordNotFound(
                "Journal entry not found or reflection already set".to_string(),
            ));
        }
        Ok(())
    }
}
