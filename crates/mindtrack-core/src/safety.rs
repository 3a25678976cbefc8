/// Phrases that indicate a risk of self-harm. Matched case-insensitively as substrings.
pub const CRISIS_KEYWORDS: &[&str] = &[
    "suicide",
    "kill myself",
    "end my life",
    "want to die",
    "self harm",
    "hurt myself",
    "cutting",
    "overdose",
    "jump off",
    "hang myself",
    "worthless",
    "better off dead",
    "no point living",
    "can't go on",
    "end it all",
];

pub const CRISIS_BANNER: &str = "🚨 I'm concerned about what you're sharing. Please reach out for immediate support:

• Call 988 (Suicide & Crisis Lifeline) - Available 24/7
• Text HOME to 741741 (Crisis Text Line)
• Go to your nearest emergency room
• Call 911 if you're in immediate danger

You matter, and there are people who want to help. Here's my response to your message:

";

#[must_use]
pub fn contains_crisis_keywords(text: &str) -> bool {
    let text = text.to_lowercase();
    CRISIS_KEYWORDS.iter().any(|keyword| text.contains(keyword))
}

/// Prefix `reply` with [`CRISIS_BANNER`] if any of `screened` contains a crisis keyword.
#[must_use]
pub fn prepend_crisis_banner<'a>(reply: String, screened: impl IntoIterator<Item = &'a str>) -> String {
    if screened.into_iter().any(contains_crisis_keywords) {
        tracing::info!("crisis keywords detected, adding safety resources");
        format!("{CRISIS_BANNER}{reply}")
    } else {
        reply
    }
}
