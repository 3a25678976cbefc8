pub mod config;
pub mod error;

use crate::llm::config::LlmConfig;
use crate::llm::error::LlmError;
use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use mindtrack_model::chat::{ChatMessage, ChatRole};
use std::error::Error;
use std::time::Duration;
use tracing::instrument;
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

impl From<ChatMessage> for PromptMessage {
    fn from(message: ChatMessage) -> Self {
        let role = match message.role {
            ChatRole::User => Role::User,
            ChatRole::Assistant => Role::Assistant,
        };
        Self {
            role,
            content: message.content,
        }
    }
}

impl TryFrom<PromptMessage> for ChatCompletionRequestMessage {
    type Error = async_openai::error::OpenAIError;

    fn try_from(message: PromptMessage) -> Result<Self, Self::Error> {
        Ok(match message.role {
            Role::System => ChatCompletionRequestSystemMessageArgs::default()
                .content(message.content)
                .build()?
                .into(),
            Role::User => ChatCompletionRequestUserMessageArgs::default()
                .content(message.content)
                .build()?
                .into(),
            Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                .content(message.content)
                .build()?
                .into(),
        })
    }
}

#[derive(Debug, Clone, TypedBuilder)]
pub struct CompletionRequest {
    #[builder(setter(into))]
    pub model: String,
    pub messages: Vec<PromptMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A chat completion backend: role tagged messages in, reply text out.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;
}

/// Completion over any OpenAI compatible API.
#[derive(Debug, Clone)]
pub struct OpenAiCompletion {
    client: Client<OpenAIConfig>,
}

impl OpenAiCompletion {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|error| {
                tracing::error!(error = &error as &dyn Error, "failed to build http client for llm");
                LlmError::HttpClientBuild(error)
            })?;

        // A zero budget turns off the client's retries on rate limits
        let backoff = ExponentialBackoffBuilder::default()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();

        let client = Client::with_config(config.get_openai_config())
            .with_http_client(http_client)
            .with_backoff(backoff);
        Ok(Self { client })
    }
}

#[async_trait]
impl CompletionService for OpenAiCompletion {
    #[instrument(skip_all, fields(model = %request.model))]
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let messages = request
            .messages
            .into_iter()
            .map(ChatCompletionRequestMessage::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        #[allow(deprecated)]
        let request = CreateChatCompletionRequestArgs::default()
            .model(request.model)
            .messages(messages)
            .temperature(request.temperature)
            .max_tokens(request.max_tokens)
            .build()?;

        tracing::debug!("sending completion request");
        let response = self.client.chat().create(request).await.map_err(|error| {
            tracing::warn!(error = &error as &dyn Error, "completion call failed");
            LlmError::Api(error)
        })?;

        if let Some(usage) = &response.usage {
            tracing::debug!(tokens = usage.total_tokens, "completion finished");
        }

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindtrack_model::chat::ChatMessage;

    #[test]
    fn test_convert_messages() {
        assert_eq!(PromptMessage::from(ChatMessage::assistant("hi")).role, Role::Assistant);
        assert_eq!(PromptMessage::from(ChatMessage::user("hey")).role, Role::User);

        let message = ChatCompletionRequestMessage::try_from(PromptMessage::system("be kind")).unwrap();
        assert!(matches!(message, ChatCompletionRequestMessage::System(_)));
    }

    #[test]
    fn test_client_from_config() {
        let config = LlmConfig::builder().api_key("secret").build();
        assert!(OpenAiCompletion::new(&config).is_ok());
    }
}
