use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::journal::Mood;

/// Mood analytics over all entries of a user, recomputed on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MoodStats {
    pub total_entries: usize,
    pub entries_with_mood: usize,
    /// Mean mood rounded to one decimal, 0 without mood-bearing entries
    #[schema(example = 3.7)]
    pub average_mood: f64,
    /// Consecutive days with at least one entry, ending today
    pub current_streak: u32,
    /// Most recent mood-bearing entries, oldest first
    pub trend: Vec<TrendPoint>,
    pub distribution: Vec<MoodCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TrendPoint {
    pub entry_id: Uuid,
    pub created_at: DateTime<FixedOffset>,
    pub mood: Mood,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MoodCount {
    pub mood: Mood,
    #[schema(example = "Happy")]
    pub label: String,
    pub emoji: String,
    pub count: usize,
}
