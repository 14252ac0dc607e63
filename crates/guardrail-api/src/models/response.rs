//! Response DTOs for the detection, gateway, scan, dify, and proxy HTTP
//! surfaces (§6). `compliance`/`security`/`data` dimension verdicts and
//! conversation payloads reuse `guardrail_core` types directly; only the
//! envelope shapes specific to each surface live here.

use guardrail_anonymize::EntityMatch;
use guardrail_core::{Message, RiskLevel, SuggestAction};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One dimension's verdict as reported by `/v1/guardrails` (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionResult {
    pub risk_level: RiskLevel,
    pub categories: Vec<String>,
}

/// An entity the data dimension's anonymization pass detected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedEntityDto {
    pub entity_type: String,
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub confidence: f32,
}

impl From<&EntityMatch> for DetectedEntityDto {
    fn from(m: &EntityMatch) -> Self {
        Self {
            entity_type: m.entity_type.as_str().to_string(),
            text: m.value.clone(),
            start: m.start,
            end: m.end,
            confidence: m.confidence,
        }
    }
}

/// The data dimension carries anonymization output alongside its verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataDimensionResult {
    pub risk_level: RiskLevel,
    pub categories: Vec<String>,
    #[serde(default)]
    pub detected_entities: Vec<DetectedEntityDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anonymized_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restore_mapping: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailsResult {
    pub compliance: DimensionResult,
    pub security: DimensionResult,
    pub data: DataDimensionResult,
}

/// `POST /v1/guardrails` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailsResponse {
    pub id: String,
    pub result: GuardrailsResult,
    pub overall_risk_level: RiskLevel,
    pub suggest_action: SuggestAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggest_answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

/// Risk level vocabulary used by the scan API (§6), distinct from the
/// detection API's `RiskLevel` wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanRiskLevel {
    None,
    Low,
    Medium,
    High,
}

impl From<RiskLevel> for ScanRiskLevel {
    fn from(level: RiskLevel) -> Self {
        match level {
            RiskLevel::NoRisk => ScanRiskLevel::None,
            RiskLevel::LowRisk => ScanRiskLevel::Low,
            RiskLevel::MediumRisk => ScanRiskLevel::Medium,
            RiskLevel::HighRisk => ScanRiskLevel::High,
        }
    }
}

/// `POST /v1/scan/email` and `POST /v1/scan/webpage` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResultResponse {
    pub id: String,
    pub scan_type: String,
    pub risk_level: ScanRiskLevel,
    #[serde(default)]
    pub risk_types: Vec<String>,
    pub risk_content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

/// The gateway API's action vocabulary (§4.4), distinct from the detection
/// API's `SuggestAction` spelling (`reject` vs `block`,
/// `replace_with_anonymized` vs `anonymize`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayAction {
    Pass,
    Block,
    Replace,
    Anonymize,
    SwitchPrivateModel,
}

impl From<SuggestAction> for GatewayAction {
    fn from(action: SuggestAction) -> Self {
        match action {
            SuggestAction::Pass => GatewayAction::Pass,
            SuggestAction::Reject => GatewayAction::Block,
            SuggestAction::Replace => GatewayAction::Replace,
            SuggestAction::ReplaceWithAnonymized => GatewayAction::Anonymize,
            SuggestAction::SwitchPrivateModel => GatewayAction::SwitchPrivateModel,
        }
    }
}

/// `POST /v1/gateway/process-input` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessInputResponse {
    pub action: GatewayAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Message>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub detection_result: GuardrailsResult,
    pub processing_time_ms: u64,
}

/// Output-side action vocabulary (§4.4): narrower than the input side's —
/// output moderation never anonymizes or switches models itself, it only
/// passes, blocks, replaces, or restores placeholders left by an earlier
/// `process-input` anonymization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayOutputAction {
    Pass,
    Block,
    Replace,
    Restore,
}

/// `POST /v1/gateway/process-output` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessOutputResponse {
    pub action: GatewayOutputAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// `POST /dify/moderation` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifyModerationResponse {
    pub flagged: bool,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// OpenAI-compatible choice/usage shapes for `/v1/chat/completions` and
/// `/v1/model/chat/completions`. The upstream's own JSON is otherwise
/// forwarded unexamined; these only cover the pieces detection needs to
/// construct a rejection response in the upstream's place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionChoice {
    pub index: u32,
    pub message: Message,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatCompletionChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}
