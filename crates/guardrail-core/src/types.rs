//! Domain vocabulary shared by the scanner engine, disposition resolver,
//! proxy, and gateway-integration API: conversation messages, risk levels,
//! dimensions, scanner definitions, and suggest-actions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    System,
    Assistant,
}

/// One part of a structured (multi-part) message content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagePart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Message content: either a plain string or a list of typed parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<MessagePart>),
}

impl MessageContent {
    /// Flatten to a single string for scanning (images are dropped — text-only
    /// detection, matching the spec's scanner evaluation over message text).
    pub fn as_text(&self) -> String {
        match self {
            MessageContent::Text(s) => s.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    MessagePart::Text { text } => Some(text.clone()),
                    MessagePart::ImageUrl { .. } => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_text().trim().is_empty()
    }

    pub fn char_len(&self) -> usize {
        self.as_text().chars().count()
    }
}

/// One message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn as_text(&self) -> String {
        self.content.as_text()
    }
}

/// Per-message-length constraint (§4.1 input constraints).
pub const MAX_MESSAGE_CHARS: usize = 1_000_000;

/// Default sliding-window budget (characters, used as a token-count proxy).
pub const DEFAULT_MAX_DETECTION_CONTEXT_LENGTH: usize = 7168;

/// Risk level total order: `no_risk < low_risk < medium_risk < high_risk`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    NoRisk,
    LowRisk,
    MediumRisk,
    HighRisk,
}

impl RiskLevel {
    pub fn max(self, other: Self) -> Self {
        std::cmp::max(self, other)
    }

    /// Priority used for template/category ordering: high=3, medium=2, low=1, no_risk=0.
    pub fn priority(self) -> u8 {
        match self {
            RiskLevel::NoRisk => 0,
            RiskLevel::LowRisk => 1,
            RiskLevel::MediumRisk => 2,
            RiskLevel::HighRisk => 3,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RiskLevel::NoRisk => "no_risk",
            RiskLevel::LowRisk => "low_risk",
            RiskLevel::MediumRisk => "medium_risk",
            RiskLevel::HighRisk => "high_risk",
        };
        write!(f, "{s}")
    }
}

/// The three orthogonal detection dimensions (§4.1 "Dimension mapping").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Compliance,
    Security,
    Data,
}

/// Scanner implementation kind (§4.1, §9 "Polymorphic scanners").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScannerKind {
    Genai,
    Regex,
    Keyword,
}

/// Static definition of a named scanner (built-in or custom), independent of
/// any one application's overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerDefinition {
    /// Unique tag, e.g. `S9`, `E1`, or `S104` for custom scanners.
    pub tag: String,
    pub name: String,
    pub description: String,
    pub kind: ScannerKind,
    /// Category text (GenAI), regex pattern (Regex), or newline keyword list (Keyword).
    pub definition: String,
    pub dimension: Dimension,
    pub default_risk_level: RiskLevel,
    pub default_scan_prompt: bool,
    pub default_scan_response: bool,
    pub active: bool,
}

/// Per-application override of a scanner's enablement/risk-level/direction.
/// `None` in any override field means "use the scanner's default" (§3).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScannerOverride {
    pub is_enabled: bool,
    pub risk_level: Option<RiskLevel>,
    pub scan_prompt: Option<bool>,
    pub scan_response: Option<bool>,
}

/// A scanner definition merged with its application-scoped overrides — the
/// shape the engine actually evaluates against.
#[derive(Debug, Clone)]
pub struct EffectiveScanner {
    pub definition: ScannerDefinition,
    pub is_enabled: bool,
    pub risk_level: RiskLevel,
    pub scan_prompt: bool,
    pub scan_response: bool,
}

impl EffectiveScanner {
    pub fn from_definition(def: ScannerDefinition, over: Option<&ScannerOverride>) -> Self {
        let risk_level = over
            .and_then(|o| o.risk_level)
            .unwrap_or(def.default_risk_level);
        let scan_prompt = over
            .and_then(|o| o.scan_prompt)
            .unwrap_or(def.default_scan_prompt);
        let scan_response = over
            .and_then(|o| o.scan_response)
            .unwrap_or(def.default_scan_response);
        let is_enabled = over.map(|o| o.is_enabled).unwrap_or(true);
        Self {
            definition: def,
            is_enabled,
            risk_level,
            scan_prompt,
            scan_response,
        }
    }
}

/// Result of evaluating a single dimension across all its scanners.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionVerdict {
    pub risk_level: RiskLevel,
    /// Human-readable scanner names, ordered by risk level desc then tag asc (§4.2 step 7).
    pub categories: Vec<String>,
    pub score: Option<f32>,
    /// Tags of scanners that matched and counted toward this verdict.
    pub matched_tags: Vec<String>,
}

impl DimensionVerdict {
    pub fn no_risk() -> Self {
        Self {
            risk_level: RiskLevel::NoRisk,
            categories: Vec::new(),
            score: None,
            matched_tags: Vec::new(),
        }
    }
}

/// The resolver's final verdict (§4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestAction {
    Pass,
    Reject,
    Replace,
    ReplaceWithAnonymized,
    SwitchPrivateModel,
}

/// One detected entity for anonymization purposes (§4.8).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedEntity {
    pub text: String,
    pub entity_type: String,
    pub start: Option<usize>,
    pub end: Option<usize>,
    pub anonymized_value: Option<String>,
    pub confidence: f32,
}

/// Per-entity-type anonymization method (§4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnonymizationMethod {
    Mask,
    Hash,
    Replace,
    GenaiNatural,
    GenaiCode,
    Shuffle,
    Random,
    RegexReplace,
}

/// Disposal action for data-leakage risk (§3 `*DataLeakagePolicy`, §4.2 step 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataDisposalAction {
    Block,
    SwitchPrivateModel,
    Anonymize,
    Pass,
}

/// Disposal action for security/compliance risk (§3 `*GatewayPolicy`, §4.2 step 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayDisposalAction {
    Block,
    Replace,
    Pass,
}

/// Sensitivity thresholds + trigger level for GenAI scanners (§4.1 step 3).
/// Ordered `high_threshold < medium_threshold < low_threshold` (Open Question #2).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SensitivityConfig {
    pub high_threshold: f32,
    pub medium_threshold: f32,
    pub low_threshold: f32,
    pub trigger_level: RiskLevel,
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            high_threshold: 0.40,
            medium_threshold: 0.60,
            low_threshold: 0.95,
            trigger_level: RiskLevel::MediumRisk,
        }
    }
}

impl SensitivityConfig {
    /// The score threshold a GenAI match must reach (inclusive) to count at all,
    /// given `trigger_level`. A score below this is treated as no match.
    pub fn minimum_threshold(&self) -> f32 {
        match self.trigger_level {
            RiskLevel::HighRisk => self.high_threshold,
            RiskLevel::MediumRisk => self.medium_threshold,
            RiskLevel::LowRisk => self.low_threshold,
            RiskLevel::NoRisk => 0.0,
        }
    }

    /// Map a score to the risk level it reaches, or `None` if it falls below
    /// every threshold that the trigger level allows to surface.
    pub fn level_for_score(&self, score: f32) -> Option<RiskLevel> {
        let level = if score >= self.high_threshold {
            RiskLevel::HighRisk
        } else if score >= self.medium_threshold {
            RiskLevel::MediumRisk
        } else if score >= self.low_threshold {
            RiskLevel::LowRisk
        } else {
            return None;
        };
        if level >= self.trigger_level {
            Some(level)
        } else {
            None
        }
    }
}

/// A single window produced by the sliding-window pre-processor.
#[derive(Debug, Clone)]
pub struct MessageWindow {
    pub messages: Vec<Message>,
    pub index: usize,
}

/// Metadata bag carried alongside per-call scanner parameters; kept generic
/// (JSON) since callers vary (admin CRUD DTOs, cache entries, log records).
pub type MetaMap = HashMap<String, serde_json::Value>;
