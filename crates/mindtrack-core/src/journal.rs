use chrono::{DateTime, FixedOffset};
use mindtrack_db::journal::journal_entry;
use mindtrack_model::journal::mood::InvalidMood;
use mindtrack_model::journal::partial::NewJournalEntry;
use mindtrack_model::journal::{JournalEntry, Mood};
use mindtrack_model_tools::convert::TryIntoModel;
use sea_orm::{ConnectionTrait, DbErr};
use std::cmp::Reverse;
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error(transparent)]
    Mood(#[from] InvalidMood),
}

#[derive(Debug, Error)]
pub enum JournalError {
    #[error(transparent)]
    Db(#[from] DbErr),

    #[error(transparent)]
    Conversion(#[from] mindtrack_model_tools::error::Error),
}

/// A new entry that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEntry {
    pub text: String,
    pub mood: Option<Mood>,
}

/// Trim `value` and reject it if nothing is left.
pub fn require_text<'a>(value: &'a str, field: &'static str) -> Result<&'a str, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Missing(field));
    }
    Ok(value)
}

pub fn validate_new_entry(entry: &NewJournalEntry) -> Result<ValidatedEntry, ValidationError> {
    let text = require_text(&entry.text, "Text")?;
    let mood = entry.mood.map(Mood::try_from).transpose()?;
    Ok(ValidatedEntry {
        text: text.to_owned(),
        mood,
    })
}

pub fn sort_newest_first(entries: &mut [JournalEntry]) {
    entries.sort_by_key(|entry| Reverse(entry.created_at));
}

/// All entries of the user, newest first.
#[instrument(skip(conn))]
pub async fn load_user_entries<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> Result<Vec<JournalEntry>, JournalError> {
    let mut entries = journal_entry::Query::get_user_journal_entries(conn, user_id)
        .await?
        .into_iter()
        .map(TryIntoModel::try_into_model)
        .collect::<Result<Vec<JournalEntry>, _>>()?;
    sort_newest_first(&mut entries);
    Ok(entries)
}

#[instrument(skip(conn, entry))]
pub async fn create_entry<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    entry: ValidatedEntry,
    created_at: DateTime<FixedOffset>,
) -> Result<JournalEntry, JournalError> {
    let model = journal_entry::Mutation::create_journal_entry(
        conn,
        user_id,
        entry.text,
        entry.mood.map(i16::from),
        created_at,
    )
    .await?;
    tracing::debug!(entry_id = %model.id, "created journal entry");
    Ok(model.try_into_model()?)
}
