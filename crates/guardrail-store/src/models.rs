//! `sqlx::FromRow` entities (§3). JSONB-equivalent columns are
//! `sqlx::types::Json<T>` wrapping typed structs rather than raw
//! `serde_json::Value`, so callers get compile-time field checks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub active: bool,
    pub verified: bool,
    pub is_super_admin: bool,
    pub tenant_api_key: String,
    pub direct_model_api_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub application_api_key: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum SubscriptionType {
    Free,
    Subscribed,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct TenantSubscription {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub subscription_type: SubscriptionType,
    pub monthly_quota: i64,
    pub current_month_usage: i64,
    pub usage_reset_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum PackageType {
    Builtin,
    Purchasable,
    Custom,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ScannerPackage {
    pub id: Uuid,
    pub name: String,
    pub package_type: PackageType,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum ScannerType {
    Genai,
    Regex,
    Keyword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum RiskLevelColumn {
    HighRisk,
    MediumRisk,
    LowRisk,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ScannerRow {
    pub id: Uuid,
    pub package_id: Option<Uuid>,
    pub tag: String,
    pub name: String,
    pub description: String,
    pub scanner_type: ScannerType,
    pub definition: String,
    pub dimension: String,
    pub default_risk_level: RiskLevelColumn,
    pub default_scan_prompt: bool,
    pub default_scan_response: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ApplicationScannerConfig {
    pub id: Uuid,
    pub application_id: Uuid,
    pub scanner_id: Uuid,
    pub is_enabled: bool,
    pub risk_level_override: Option<RiskLevelColumn>,
    pub scan_prompt_override: Option<bool>,
    pub scan_response_override: Option<bool>,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct CustomScanner {
    pub id: Uuid,
    pub application_id: Uuid,
    pub scanner_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum PurchaseStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct PackagePurchase {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub package_id: Uuid,
    pub status: PurchaseStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Blacklist {
    pub id: Uuid,
    pub application_id: Uuid,
    pub name: String,
    pub keywords: Json<Vec<String>>,
    pub active: bool,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Whitelist {
    pub id: Uuid,
    pub application_id: Uuid,
    pub name: String,
    pub keywords: Json<Vec<String>>,
    pub active: bool,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub id: Uuid,
    pub application_id: Uuid,
    pub bound_to: String,
    pub index_path: String,
    pub total_pairs: i64,
    pub similarity_threshold: f32,
    pub is_global: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LanguageText {
    pub en: String,
    pub zh: Option<String>,
    #[serde(flatten)]
    pub other: std::collections::HashMap<String, String>,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ResponseTemplate {
    pub id: Uuid,
    pub application_id: Uuid,
    pub scanner_type: String,
    pub scanner_identifier: String,
    pub content: Json<LanguageText>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum TriggerLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct RiskTypeConfig {
    pub id: Uuid,
    pub application_id: Uuid,
    pub enabled_flags: Json<[bool; 21]>,
    pub low_threshold: f32,
    pub medium_threshold: f32,
    pub high_threshold: f32,
    pub trigger_level: TriggerLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum DataDisposalActionColumn {
    Block,
    SwitchPrivateModel,
    Anonymize,
    Pass,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct TenantDataLeakagePolicy {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub high: DataDisposalActionColumn,
    pub medium: DataDisposalActionColumn,
    pub low: DataDisposalActionColumn,
    pub safe_model_id: Option<Uuid>,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ApplicationDataLeakagePolicy {
    pub id: Uuid,
    pub application_id: Uuid,
    pub high: Option<DataDisposalActionColumn>,
    pub medium: Option<DataDisposalActionColumn>,
    pub low: Option<DataDisposalActionColumn>,
    pub safe_model_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum GatewayDisposalActionColumn {
    Block,
    Replace,
    Pass,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct TenantGatewayPolicy {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub high: GatewayDisposalActionColumn,
    pub medium: GatewayDisposalActionColumn,
    pub low: GatewayDisposalActionColumn,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ApplicationGatewayPolicy {
    pub id: Uuid,
    pub application_id: Uuid,
    pub high: Option<GatewayDisposalActionColumn>,
    pub medium: Option<GatewayDisposalActionColumn>,
    pub low: Option<GatewayDisposalActionColumn>,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct UpstreamApiConfig {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub config_name: String,
    pub provider: String,
    pub base_url: String,
    /// Fernet-equivalent-encrypted at rest (§4.x, `guardrail-secrets`); never
    /// decrypted except to build an outbound request.
    pub encrypted_api_key: String,
    pub is_data_safe: bool,
    pub is_default_private_model: bool,
    pub private_model_names: Json<Vec<String>>,
    pub block_on_input_risk: bool,
    pub block_on_output_risk: bool,
    pub safe_model_priority: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum MatchType {
    Exact,
    Prefix,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ModelRoute {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub model_pattern: String,
    pub match_type: MatchType,
    pub priority: i32,
    pub upstream_api_config_id: Uuid,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ModelRouteApplication {
    pub id: Uuid,
    pub model_route_id: Uuid,
    pub application_id: Uuid,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct DetectionResult {
    pub id: Uuid,
    pub request_id: Uuid,
    pub application_id: Uuid,
    pub tenant_id: Uuid,
    pub content: String,
    pub security_risk_level: String,
    pub security_categories: Json<Vec<String>>,
    pub compliance_risk_level: String,
    pub compliance_categories: Json<Vec<String>>,
    pub data_risk_level: String,
    pub data_categories: Json<Vec<String>>,
    pub suggest_action: String,
    pub suggest_answer: Option<String>,
    pub model_response: Option<String>,
    pub score: Option<f32>,
    pub image_paths: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum AppealStatus {
    Pending,
    AiReviewed,
    HumanReviewed,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct AppealRecord {
    pub id: Uuid,
    pub request_id: Uuid,
    pub status: AppealStatus,
    pub ai_verdict: Option<String>,
    pub human_verdict: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct AppealConfig {
    pub id: Uuid,
    pub application_id: Uuid,
    pub enabled: bool,
    pub require_human_review: bool,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ModelUsage {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub model: String,
    pub usage_date: chrono::NaiveDate,
    pub requests: i64,
    pub input_tokens: i64,
    pub output_tokens: i64,
    pub total_tokens: i64,
}
