use clap::Args;

pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";

/// Connection to an OpenAI compatible chat completion service.
#[derive(Debug, Clone, Args)]
pub struct LlmArgs {
    #[arg(long, env = "LLM_API_KEY", hide_env_values = true)]
    pub llm_api_key: Option<String>,

    #[arg(long, env = "LLM_API_BASE", default_value = DEFAULT_API_BASE)]
    pub llm_api_base: String,

    #[arg(long, env = "LLM_REFLECTION_MODEL", default_value = DEFAULT_MODEL)]
    pub reflection_model: String,

    #[arg(long, env = "LLM_CHAT_MODEL", help = "Defaults to the reflection model")]
    pub chat_model: Option<String>,

    #[arg(long, env = "LLM_TIMEOUT_SECS", default_value_t = 30, help = "HTTP timeout of a single completion call")]
    pub llm_timeout_secs: u64,
}
