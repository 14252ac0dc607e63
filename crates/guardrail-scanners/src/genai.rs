//! GenAI scanner wire protocol (§4.1 grounding): a single chat-completion
//! call carrying `<UNSAFE CATEGORIES>` and `<CONVERSATION>` sections, whose
//! response is either `safe` or `unsafe\n<tag>,<tag>,...` and whose
//! sensitivity score is `exp(logprob)` of the first response token.

use guardrail_core::{Message, Role, ScannerDefinition};
use serde::{Deserialize, Serialize};

/// Outcome of one GenAI scanner call for a window.
#[derive(Debug, Clone, PartialEq)]
pub struct GenaiMatch {
    pub tags: Vec<String>,
    pub score: f32,
}

/// Build the `<UNSAFE CATEGORIES>` / `<CONVERSATION>` instruction sent to the
/// safety model.
pub fn build_prompt(scanners: &[&ScannerDefinition], messages: &[Message]) -> String {
    let mut categories = String::new();
    for s in scanners {
        categories.push_str(&format!("{}: {}. {}\n", s.tag, s.name, s.definition));
    }

    let mut conversation = String::new();
    for m in messages {
        let role = match m.role {
            Role::User => "user",
            Role::System => "system",
            Role::Assistant => "assistant",
        };
        conversation.push_str(&format!("{}: {}\n", role, m.as_text()));
    }

    format!("<UNSAFE CATEGORIES>\n{categories}<CONVERSATION>\n{conversation}")
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    logprobs: bool,
    top_logprobs: u32,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    logprobs: Option<Logprobs>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct Logprobs {
    content: Vec<TokenLogprob>,
}

#[derive(Debug, Deserialize)]
struct TokenLogprob {
    logprob: f32,
}

/// HTTP client for the GenAI safety model backing GenAI-kind scanners.
pub struct GenaiClient {
    http: reqwest::Client,
    api_url: String,
    model: String,
}

impl GenaiClient {
    pub fn new(http: reqwest::Client, api_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.into(),
            model: model.into(),
        }
    }

    /// Evaluate one window against the given GenAI scanners. A failed call
    /// (network error, malformed response) is treated as `safe` (§4.1
    /// "Failure semantics") — returns `None` rather than an error so the
    /// caller never blocks the request on detection-infrastructure failure.
    pub async fn evaluate(
        &self,
        scanners: &[&ScannerDefinition],
        messages: &[Message],
    ) -> Option<GenaiMatch> {
        let prompt = build_prompt(scanners, messages);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            logprobs: true,
            top_logprobs: 1,
            max_tokens: 32,
            temperature: 0.0,
        };

        let resp = match self.http.post(&self.api_url).json(&body).send().await {
            Ok(r) => r,
            Err(err) => {
                tracing::warn!(error = %err, "genai scanner call failed, treating window as safe");
                return None;
            }
        };

        let parsed: ChatResponse = match resp.json().await {
            Ok(p) => p,
            Err(err) => {
                tracing::warn!(error = %err, "genai scanner response parse failed, treating window as safe");
                return None;
            }
        };

        let choice = parsed.choices.first()?;
        let text = choice.message.content.trim();

        if text.eq_ignore_ascii_case("safe") {
            return None;
        }

        let logprob = choice
            .logprobs
            .as_ref()
            .and_then(|l| l.content.first())
            .map(|t| t.logprob)
            .unwrap_or(0.0);
        let score = logprob.exp();

        let tag_list = text
            .strip_prefix("unsafe")
            .unwrap_or(text)
            .trim_start_matches(|c: char| c == '\n' || c == ':' || c.is_whitespace());

        let tags: Vec<String> = tag_list
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if tags.is_empty() {
            return None;
        }

        Some(GenaiMatch { tags, score })
    }
}
