//! Request DTOs for the detection, gateway, scan, dify, and proxy HTTP
//! surfaces (§6). Conversation payloads reuse [`guardrail_core::Message`]
//! directly rather than a parallel wire type — its `Role`/`MessageContent`
//! serde shapes already match the wire.

use guardrail_core::Message;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

/// `POST /v1/guardrails` body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GuardrailsRequest {
    pub model: String,
    #[validate(length(min = 1, message = "messages must not be empty"))]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// `POST /v1/scan/email` and `POST /v1/scan/webpage` body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScanRequest {
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// `POST /v1/gateway/process-input` body (§4.4).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProcessInputRequest {
    #[validate(length(min = 1, message = "messages must not be empty"))]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub stream: bool,
    #[serde(default)]
    pub client_ip: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// `POST /v1/gateway/process-output` body (§4.4).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProcessOutputRequest {
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub is_streaming: bool,
    #[serde(default)]
    pub chunk_index: u64,
}

/// `POST /dify/moderation` point selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifyPoint {
    #[serde(rename = "ping")]
    Ping,
    #[serde(rename = "app.moderation.input")]
    ModerationInput,
    #[serde(rename = "app.moderation.output")]
    ModerationOutput,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DifyParams {
    #[serde(default)]
    pub inputs: Option<serde_json::Value>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifyModerationRequest {
    pub point: DifyPoint,
    #[serde(default)]
    pub params: DifyParams,
}

/// `POST /v1/chat/completions` body. Unknown OpenAI fields (temperature,
/// top_p, tools, …) are preserved in `extra` and forwarded upstream
/// unexamined — detection only looks at `messages`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChatCompletionRequest {
    pub model: String,
    #[validate(length(min = 1, message = "messages must not be empty"))]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub stream: bool,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// `POST /v1/completions` body (legacy single-prompt form).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompletionRequest {
    pub model: String,
    #[validate(length(min = 1, message = "prompt must not be empty"))]
    pub prompt: String,
    #[serde(default)]
    pub stream: bool,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardrail_core::Role;

    #[test]
    fn guardrails_request_rejects_empty_messages() {
        let req = GuardrailsRequest {
            model: "gpt-4".to_string(),
            messages: vec![],
            user_id: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn guardrails_request_deserializes_wire_shape() {
        let json = r#"{"model":"gpt-4","messages":[{"role":"user","content":"hi"}]}"#;
        let req: GuardrailsRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.messages[0].role, Role::User);
    }

    #[test]
    fn dify_point_matches_spec_wire_values() {
        let json = r#""app.moderation.input""#;
        let point: DifyPoint = serde_json::from_str(json).unwrap();
        assert_eq!(point, DifyPoint::ModerationInput);
    }

    #[test]
    fn chat_completion_request_preserves_unknown_fields() {
        let json = r#"{"model":"gpt-4","messages":[{"role":"user","content":"hi"}],"temperature":0.7}"#;
        let req: ChatCompletionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.extra.get("temperature").and_then(|v| v.as_f64()), Some(0.7));
    }
}
