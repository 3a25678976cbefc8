use crate::convert::TryFromDbModel;
use crate::error::Error;
use mindtrack_entity::journal::journal_entry::Model as JournalEntryModel;
use mindtrack_model::journal::{JournalEntry, Mood};

impl TryFromDbModel<JournalEntryModel> for JournalEntry {
    type Error = Error;

    fn try_from_db_model(model: JournalEntryModel) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            text: model.text,
            mood: model.mood.map(Mood::try_from).transpose()?,
            reflection: model.reflection,
            created_at: model.created_at,
        })
    }
}
