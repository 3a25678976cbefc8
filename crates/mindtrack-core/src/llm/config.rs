use async_openai::config::OpenAIConfig;
use mindtrack_utils::args::llm::{DEFAULT_API_BASE, DEFAULT_MODEL, LlmArgs};
use std::time::Duration;
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, TypedBuilder)]
pub struct LlmConfig {
    #[builder(default, setter(strip_option, into))]
    api_key: Option<String>,
    #[builder(default = DEFAULT_API_BASE.to_owned(), setter(into))]
    api_base: String,
    #[builder(default = DEFAULT_MODEL.to_owned(), setter(into))]
    reflection_model: String,
    #[builder(default, setter(strip_option, into))]
    chat_model: Option<String>,
    #[builder(default = Duration::from_secs(30))]
    timeout: Duration,
}

impl From<LlmArgs> for LlmConfig {
    fn from(args: LlmArgs) -> Self {
        Self {
            api_key: args.llm_api_key,
            api_base: args.llm_api_base,
            reflection_model: args.reflection_model,
            chat_model: args.chat_model,
            timeout: Duration::from_secs(args.llm_timeout_secs),
        }
    }
}

impl LlmConfig {
    #[must_use]
    pub fn get_openai_config(&self) -> OpenAIConfig {
        let mut openai_config = OpenAIConfig::default().with_api_base(&self.api_base);
        if let Some(api_key) = &self.api_key {
            openai_config = openai_config.with_api_key(api_key);
        }
        openai_config
    }

    #[must_use]
    pub fn get_reflection_model(&self) -> &str {
        &self.reflection_model
    }

    #[must_use]
    pub fn get_chat_model(&self) -> &str {
        self.chat_model.as_deref().unwrap_or(&self.reflection_model)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LlmConfig::builder().build();
        assert_eq!(config.get_reflection_model(), "llama3-8b-8192");
        assert_eq!(config.get_chat_model(), "llama3-8b-8192");
        assert_eq!(config.api_base, "https://api.groq.com/openai/v1");

        let config = LlmConfig::builder().chat_model("llama-3.3-70b").build();
        assert_eq!(config.get_chat_model(), "llama-3.3-70b");
    }
}
