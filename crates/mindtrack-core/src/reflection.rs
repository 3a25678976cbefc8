use crate::llm::config::LlmConfig;
use crate::llm::{CompletionRequest, CompletionService, PromptMessage};
use mindtrack_db::journal::journal_entry;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};
use std::error::Error;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{Instrument, instrument};
use uuid::Uuid;

pub const REFLECTION_SYSTEM_PROMPT: &str = r#"You are a compassionate mental health companion. Your role is to provide supportive, empathetic responses to journal entries.

Guidelines:
- Keep responses to 2-3 sentences maximum
- Be warm, understanding, and non-judgmental
- Offer gentle insights or reflections
- Sometimes ask a thoughtful follow-up question
- Avoid giving medical advice or diagnosis
- Focus on validation, encouragement, and self-reflection
- Use a caring, professional tone

Examples of good responses:
- "It sounds like you're processing a lot right now. What do you think helped you get through similar challenges before?"
- "I hear the frustration in your words, and that's completely valid. Sometimes acknowledging our feelings is the first step toward understanding them."
- "It's wonderful that you're taking time to reflect on your experiences. What aspect of today felt most meaningful to you?""#;

pub const REFLECTION_FALLBACK: &str =
    "Thank you for sharing your thoughts. Taking time to reflect is an important step in your wellness journey.";

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 150;

#[must_use]
pub fn reflection_request(config: &LlmConfig, text: &str) -> CompletionRequest {
    CompletionRequest::builder()
        .model(config.get_reflection_model())
        .messages(vec![
            PromptMessage::system(REFLECTION_SYSTEM_PROMPT),
            PromptMessage::user(format!(
                "Please provide a supportive reflection on this journal entry: \"{text}\""
            )),
        ])
        .temperature(TEMPERATURE)
        .max_tokens(MAX_TOKENS)
        .build()
}

/// Ask the model for a short reflection. Falls back to [`REFLECTION_FALLBACK`] on any failure.
#[instrument(skip_all)]
pub async fn generate_reflection(service: &dyn CompletionService, config: &LlmConfig, text: &str) -> String {
    match service.complete(reflection_request(config, text)).await {
        Ok(reflection) => reflection,
        Err(error) => {
            tracing::warn!(error = &error as &dyn Error, "failed to generate reflection, using fallback");
            REFLECTION_FALLBACK.to_owned()
        }
    }
}

/// Generate a reflection for the entry and store it. The entry keeps its first reflection.
#[instrument(skip(conn, service, config, text))]
pub async fn attach_reflection<C: ConnectionTrait>(
    conn: &C,
    service: &dyn CompletionService,
    config: &LlmConfig,
    entry_id: Uuid,
    text: &str,
) -> Result<String, DbErr> {
    let reflection = generate_reflection(service, config, text).await;
    journal_entry::Mutation::set_reflection(conn, entry_id, reflection.clone()).await?;
    tracing::debug!("reflection attached");
    Ok(reflection)
}

/// Run [`attach_reflection`] in a detached task. Failures are logged and not retried.
pub fn spawn_reflection(
    conn: DatabaseConnection,
    service: Arc<dyn CompletionService>,
    config: LlmConfig,
    entry_id: Uuid,
    text: String,
) -> JoinHandle<()> {
    let span = tracing::info_span!("reflection_task", %entry_id);
    tokio::spawn(
        async move {
            if let Err(error) = attach_reflection(&conn, service.as_ref(), &config, entry_id, &text).await {
                tracing::error!(error = &error as &dyn Error, "failed to attach reflection");
            }
        }
        .instrument(span),
    )
}
