pub mod mood;
pub mod partial;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub use mood::Mood;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct JournalEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mood: Option<Mood>,
    /// AI reflection, attached once after the entry was saved
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reflection: Option<String>,
    pub created_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReflectionRequest {
    #[schema(example = "Today I finally went for a walk after a long week.")]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReflectionResponse {
    pub ai_response: String,
}
