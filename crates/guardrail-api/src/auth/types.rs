//! Authentication types: the `sk-xxai-...` API key family, JWT claims for
//! the admin dashboard login flow, and the resolved [`AuthContext`] every
//! handler downstream of auth middleware actually operates on (§4.5).

use chrono::{DateTime, Utc};
use guardrail_core::Error;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, Error>;

/// The three key kinds the gateway issues, distinguished by which DB column
/// matched (§4.5 "API key family"):
///
/// - `tenant_api_key` — full tenant scope, used by admin tooling acting on
///   behalf of a tenant and by the `X-OG-Application-ID` auto-discovery path.
/// - `application_api_key` — scoped to one application; the normal
///   detection/gateway/proxy credential.
/// - `direct_model_api_key` — bypasses detection entirely (§4.3 "direct
///   model access"), usage-metered only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiKeyKind {
    Tenant,
    Application,
    DirectModel,
}

/// Resolved identity attached to a request after authentication succeeds.
/// This is what handlers match on — never the raw key again.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthContext {
    /// A tenant-scoped key, or a JWT issued to the tenant's registered email.
    Tenant { tenant_id: Uuid },
    /// An application-scoped key, or a tenant key plus a resolved
    /// `X-OG-Application-ID` (§4.3 "Application auto-discovery").
    Application {
        tenant_id: Uuid,
        application_id: Uuid,
    },
    /// A direct-model key: detection is never run for this request.
    DirectModel { tenant_id: Uuid },
}

impl AuthContext {
    pub fn tenant_id(&self) -> Uuid {
        match self {
            AuthContext::Tenant { tenant_id } => *tenant_id,
            AuthContext::Application { tenant_id, .. } => *tenant_id,
            AuthContext::DirectModel { tenant_id } => *tenant_id,
        }
    }

    pub fn application_id(&self) -> Option<Uuid> {
        match self {
            AuthContext::Application { application_id, .. } => Some(*application_id),
            _ => None,
        }
    }

    pub fn kind(&self) -> ApiKeyKind {
        match self {
            AuthContext::Tenant { .. } => ApiKeyKind::Tenant,
            AuthContext::Application { .. } => ApiKeyKind::Application,
            AuthContext::DirectModel { .. } => ApiKeyKind::DirectModel,
        }
    }

    /// Require an application-scoped context, resolving against
    /// `X-OG-Application-ID` first when the context is only tenant-scoped
    /// (§4.3). Returns `None` when no application can be determined.
    pub fn with_application(self, application_id: Uuid) -> AuthContext {
        match self {
            AuthContext::Application { tenant_id, .. } => AuthContext::Application {
                tenant_id,
                application_id,
            },
            AuthContext::Tenant { tenant_id } => AuthContext::Application {
                tenant_id,
                application_id,
            },
            other => other,
        }
    }
}

/// JWT claims for the admin dashboard's email/password login (§4.5). The
/// proxy/gateway/detection surfaces never see a JWT — only `sk-xxai-...`
/// keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Tenant id (subject)
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    /// Expiry, seconds since epoch
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(tenant_id: Uuid, email: impl Into<String>, role: impl Into<String>, ttl: chrono::Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: tenant_id,
            email: email.into(),
            role: role.into(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}

/// An `sk-xxai-...` API key: generated once, shown once, stored raw in the
/// tenant/application table it belongs to (the store layer compares by
/// equality — see `guardrail_store::repo::{tenants,applications}::find_by_api_key`).
/// Unlike a password, there is no separate "verify" step: possession of the
/// value *is* the credential, exactly as looked up in Postgres.
pub struct GeneratedApiKey {
    pub value: String,
    pub created_at: DateTime<Utc>,
}

const KEY_PREFIX: &str = "sk-xxai-";
const KEY_BODY_LEN: usize = 48;

/// Generate a new `sk-xxai-<48 alphanumeric chars>` key.
pub fn generate_api_key() -> GeneratedApiKey {
    use rand::Rng;

    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    let body: String = (0..KEY_BODY_LEN)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();

    GeneratedApiKey {
        value: format!("{KEY_PREFIX}{body}"),
        created_at: Utc::now(),
    }
}

/// Format check run before ever touching the database (§4.5 "fast fail").
pub fn is_well_formed_api_key(key: &str) -> bool {
    key.starts_with(KEY_PREFIX) && key.len() == KEY_PREFIX.len() + KEY_BODY_LEN
}
