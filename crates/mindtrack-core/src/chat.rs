use crate::llm::config::LlmConfig;
use crate::llm::{CompletionRequest, CompletionService, PromptMessage};
use crate::safety::prepend_crisis_banner;
use chrono::{DateTime, Duration, FixedOffset};
use mindtrack_model::chat::ChatMessage;
use mindtrack_model::journal::JournalEntry;
use mindtrack_utils::date::local_day;
use std::error::Error;
use tracing::instrument;

pub const CHAT_FALLBACK: &str =
    "I'm here to listen and support you. Could you tell me more about what you're experiencing?";

pub const NO_ENTRIES_CONTEXT: &str = "User has no journal entries yet.";

const NO_CONTEXT: &str = "No journal context available.";

const CHAT_SYSTEM_PROMPT: &str = "You are a compassionate, supportive AI therapist assistant. Your role is to provide empathetic, non-judgmental support based on the user's journal entries and current conversation.

Guidelines:
- Be warm, understanding, and professionally supportive
- Ask thoughtful follow-up questions to encourage reflection
- Offer gentle insights and coping strategies when appropriate
- Validate emotions and experiences
- Keep responses conversational and not overly clinical
- Limit responses to 2-3 paragraphs maximum
- Never provide medical diagnoses or prescribe treatments
- Encourage professional help when appropriate
- Focus on emotional support and self-reflection";

const CHAT_CLOSING: &str =
    "Remember: You're having a supportive conversation, not conducting therapy. Be genuine and caring.";

/// Messages of earlier conversation sent along with a new message.
pub const HISTORY_LIMIT: usize = 8;
/// Days covered by the average mood of the context summary, counted back from now.
pub const CONTEXT_DAYS: i64 = 14;
const CONTEXT_ENTRIES: usize = 5;
const SNIPPET_LENGTH: usize = 100;
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 300;

fn snippet(text: &str) -> String {
    match text.char_indices().nth(SNIPPET_LENGTH) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_owned(),
    }
}

fn mood_suffix(entry: &JournalEntry) -> String {
    entry
        .mood
        .map(|mood| format!(" (Mood: {}/5)", mood.value()))
        .unwrap_or_default()
}

/// Summary of the user's journal handed to the assistant. `entries` are expected newest first.
#[must_use]
pub fn build_context_summary(entries: &[JournalEntry], now: DateTime<FixedOffset>) -> String {
    if entries.is_empty() {
        return NO_ENTRIES_CONTEXT.to_owned();
    }

    let since = now - Duration::days(CONTEXT_DAYS);
    let recent_moods = entries
        .iter()
        .filter(|entry| entry.created_at >= since)
        .filter_map(|entry| entry.mood)
        .map(|mood| u32::from(mood.value()))
        .collect::<Vec<_>>();
    let average = if recent_moods.is_empty() {
        "No mood data".to_owned()
    } else {
        #[allow(clippy::cast_precision_loss)]
        let average = f64::from(recent_moods.iter().sum::<u32>()) / recent_moods.len() as f64;
        format!("{average:.1}")
    };

    let offset = now.timezone();
    let snippets = entries
        .iter()
        .take(CONTEXT_ENTRIES)
        .map(|entry| {
            format!(
                "  • {}: {}{}",
                local_day(entry.created_at, offset).format("%-m/%-d/%Y"),
                snippet(&entry.text),
                mood_suffix(entry)
            )
        })
        .collect::<Vec<_>>();

    let mut context = format!(
        "User Context Summary:\n- Average mood (last {CONTEXT_DAYS} days): {average}\n- Recent entries ({}):\n{}",
        snippets.len(),
        snippets.join("\n")
    );

    let today = now.date_naive();
    if let Some(entry) = entries
        .iter()
        .find(|entry| local_day(entry.created_at, offset) == today)
    {
        context.push_str(&format!("\n- Today's entry{}: {}", mood_suffix(entry), entry.text));
    }
    context
}

#[must_use]
pub fn chat_request(config: &LlmConfig, message: &str, context: &str, history: &[ChatMessage]) -> CompletionRequest {
    let context = if context.trim().is_empty() { NO_CONTEXT } else { context };
    let system = format!("{CHAT_SYSTEM_PROMPT}\n\nUser's Journal Context:\n{context}\n\n{CHAT_CLOSING}");

    let skip = history.len().saturating_sub(HISTORY_LIMIT);
    let messages = std::iter::once(PromptMessage::system(system))
        .chain(history[skip..].iter().cloned().map(PromptMessage::from))
        .chain([PromptMessage::user(message)])
        .collect();

    CompletionRequest::builder()
        .model(config.get_chat_model())
        .messages(messages)
        .temperature(TEMPERATURE)
        .max_tokens(MAX_TOKENS)
        .build()
}

/// Reply of the supportive assistant. Never fails: errors fall back to [`CHAT_FALLBACK`]. The
/// crisis banner is prepended when the message or the context contains crisis keywords.
#[instrument(skip_all, fields(history = history.len()))]
pub async fn supportive_reply(
    service: &dyn CompletionService,
    config: &LlmConfig,
    message: &str,
    context: &str,
    history: &[ChatMessage],
) -> String {
    let reply = match service.complete(chat_request(config, message, context, history)).await {
        Ok(reply) => reply,
        Err(error) => {
            tracing::warn!(error = &error as &dyn Error, "failed to generate chat reply, using fallback");
            CHAT_FALLBACK.to_owned()
        }
    };
    prepend_crisis_banner(reply, [message, context])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;
    use crate::safety::CRISIS_BANNER;
    use crate::test_utils::{StaticCompletion, entry_at};
    use test_log::test;

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-06-15T20:00:00+02:00").unwrap()
    }

    #[test]
    fn test_empty_context() {
        assert_eq!(build_context_summary(&[], now()), NO_ENTRIES_CONTEXT);
    }

    #[test]
    fn test_context_summary() {
        let mut today = entry_at(now() - Duration::hours(1), Some(4));
        today.text = "a".repeat(120);
        let mut old = entry_at(now() - Duration::days(30), Some(1));
        old.text = "old entry".to_owned();
        let entries = [today, entry_at(now() - Duration::days(2), Some(2)), old];

        let context = build_context_summary(&entries, now());
        let lines = context.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "User Context Summary:");
        assert_eq!(lines[1], "- Average mood (last 14 days): 3.0");
        assert_eq!(lines[2], "- Recent entries (3):");
        assert_eq!(lines[3], format!("  • 6/15/2024: {}... (Mood: 4/5)", "a".repeat(100)));
        assert_eq!(lines[5], "  • 5/16/2024: old entry (Mood: 1/5)");
        assert_eq!(lines[6], format!("- Today's entry (Mood: 4/5): {}", "a".repeat(120)));
    }

    #[test]
    fn test_mood_window_is_rolling() {
        let entries = [
            entry_at(now() - Duration::days(13), Some(5)),
            entry_at(now() - Duration::days(14) - Duration::hours(1), Some(1)),
        ];
        let context = build_context_summary(&entries, now());
        assert!(context.contains("- Average mood (last 14 days): 5.0"));
    }

    #[test]
    fn test_context_without_recent_moods() {
        let entries = [entry_at(now() - Duration::days(3), None), entry_at(now() - Duration::days(40), Some(3))];
        let context = build_context_summary(&entries, now());
        assert!(context.contains("- Average mood (last 14 days): No mood data"));
        assert!(!context.contains("Today's entry"));
    }

    #[test]
    fn test_history_is_truncated() {
        let history = (0..12)
            .map(|i| ChatMessage::user(format!("message {i}")))
            .collect::<Vec<_>>();
        let request = chat_request(&LlmConfig::builder().build(), "hello", "", &history);
        assert_eq!(request.messages.len(), 1 + HISTORY_LIMIT + 1);
        assert_eq!(request.messages[1].content, "message 4");
        assert_eq!(request.messages.last().map(|m| m.role), Some(Role::User));
        assert!(request.messages[0].content.contains("No journal context available."));
        assert_eq!(request.max_tokens, 300);
    }

    #[test(tokio::test)]
    async fn test_supportive_reply() {
        let config = LlmConfig::builder().build();
        let service = StaticCompletion::replying("That sounds hard.");
        let reply = supportive_reply(&service, &config, "work was stressful", "User has no journal entries yet.", &[]).await;
        assert_eq!(reply, "That sounds hard.");

        let reply = supportive_reply(&service, &config, "I feel like I can't go on", "", &[]).await;
        assert_eq!(reply, format!("{CRISIS_BANNER}That sounds hard."));
    }

    #[test(tokio::test)]
    async fn test_fallback_keeps_banner() {
        let config = LlmConfig::builder().build();
        let service = StaticCompletion::failing();
        let reply = supportive_reply(&service, &config, "hello", "", &[]).await;
        assert_eq!(reply, CHAT_FALLBACK);

        let reply = supportive_reply(&service, &config, "hello", "- Today's entry: I want to die", &[]).await;
        assert_eq!(reply, format!("{CRISIS_BANNER}{CHAT_FALLBACK}"));
    }
}
