use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error(transparent)]
    Api(#[from] async_openai::error::OpenAIError),

    #[error("No response from the completion service")]
    EmptyResponse,

    #[error(transparent)]
    HttpClientBuild(#[from] reqwest::Error),
}
