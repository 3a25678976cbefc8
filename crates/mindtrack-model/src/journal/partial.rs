use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of a new journal entry. The mood is checked by the server so out of
/// range values are reported as validation errors.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewJournalEntry {
    #[schema(example = "Slept well and had coffee with a friend.")]
    pub text: String,
    #[serde(default)]
    #[schema(minimum = 1, maximum = 5)]
    pub mood: Option<i64>,
}
