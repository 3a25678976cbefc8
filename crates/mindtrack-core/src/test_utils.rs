//! Fakes for code that talks to a completion service.
use crate::llm::error::LlmError;
use crate::llm::{CompletionRequest, CompletionService};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use mindtrack_model::journal::{JournalEntry, Mood};
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

/// Answers every request with the same reply, or fails when constructed with [`StaticCompletion::failing`].
#[derive(Clone, Debug, Default)]
pub struct StaticCompletion {
    reply: Option<String>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl StaticCompletion {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            requests: Arc::default(),
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self::default()
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl CompletionService for StaticCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        self.reply.clone().ok_or(LlmError::EmptyResponse)
    }
}

/// Journal entry of a random user with the given timestamp and mood.
#[must_use]
pub fn entry_at(created_at: DateTime<FixedOffset>, mood: Option<i16>) -> JournalEntry {
    JournalEntry {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        text: format!("Entry written at {created_at}"),
        mood: mood.and_then(|mood| Mood::try_from(mood).ok()),
        reflection: None,
        created_at,
    }
}
