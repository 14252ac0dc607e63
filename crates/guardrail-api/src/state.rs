//! Shared application state (§4: every component handlers need a handle
//! to), built once per process and cloned cheaply into every request via
//! axum's `State` extractor.

use crate::config::AppConfig;
use crate::crypto::ApiKeyCipher;
use crate::log_pipeline::LogSender;
use crate::rate_limiting::{ConcurrentLimiter, MultiTierRateLimiter};
use crate::templates::KbEntry;
use guardrail_anonymize::adapters::{InMemoryVault, RegexEntityDetector, TracingAuditLogger};
use guardrail_anonymize::{Anonymizer, AnonymizerConfig};
use guardrail_core::{EffectiveScanner, SensitivityConfig};
use guardrail_models::cache::{CacheConfig, TtlCache};
use guardrail_scanners::disposition::{BlacklistEntry, DataLeakagePolicy, GatewayPolicy, WhitelistEntry};
use guardrail_scanners::{DispositionResolver, GenaiClient, ScannerEngine};
use guardrail_store::models::LanguageText;
use guardrail_store::repo::{lists, policies, scanners, templates, tenants};
use guardrail_store::Result as StoreResult;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::auth::AuthService;

/// Everything an application needs from the database to evaluate one
/// request, bundled so it can be cached as a unit (§4.9 caches table).
#[derive(Debug, Clone)]
pub struct ApplicationConfig {
    pub scanners: Vec<EffectiveScanner>,
    pub sensitivity: SensitivityConfig,
    pub whitelists: Vec<WhitelistEntry>,
    pub blacklists: Vec<BlacklistEntry>,
    pub data_policy: DataLeakagePolicy,
    pub gateway_policy: GatewayPolicy,
    pub safe_model_id: Option<Uuid>,
    pub templates: HashMap<String, LanguageText>,
    pub kb_entries: Vec<KbEntry>,
}

/// Process-wide state shared by every handler. Cloning an `AppState` only
/// bumps `Arc` refcounts.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pool: PgPool,
    pub auth: Arc<AuthService>,
    pub disposition: Arc<DispositionResolver>,
    pub anonymizer: Arc<Anonymizer>,
    pub http_client: reqwest::Client,
    pub rate_limiter: Arc<MultiTierRateLimiter>,
    pub concurrent_limiter: Arc<ConcurrentLimiter>,
    pub log_tx: LogSender,
    pub api_key_cipher: Arc<ApiKeyCipher>,
    application_config_cache: TtlCache<Arc<ApplicationConfig>>,
    /// Enterprise deployments run against a self-managed model fleet with
    /// no per-tenant billing relationship; the monthly-quota check in the
    /// rate-limit middleware is a no-op in that mode. Derived once from
    /// `config.detection.deployment_mode` at startup.
    pub enterprise_deployment: bool,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, pool: PgPool, auth: Arc<AuthService>, log_tx: LogSender) -> Self {
        let enterprise_deployment = config.detection.is_enterprise();
        let genai = if config.genai.enabled {
            Some(Arc::new(GenaiClient::new(
                reqwest::Client::new(),
                config.genai.api_url.clone(),
                config.genai.model.clone(),
            )))
        } else {
            None
        };
        let engine = ScannerEngine::new(genai);

        let anonymizer = Arc::new(Anonymizer::new(
            AnonymizerConfig::default(),
            Arc::new(RegexEntityDetector::new()),
            Arc::new(InMemoryVault::new(Duration::from_secs(3600))),
            Arc::new(TracingAuditLogger::new()),
        ));

        let disposition = Arc::new(DispositionResolver::new(engine, anonymizer.clone()));

        let rate_limiter = Arc::new(MultiTierRateLimiter::new(config.rate_limit.clone()));
        let concurrent_limiter = Arc::new(ConcurrentLimiter::new());

        let application_config_cache = TtlCache::new(CacheConfig {
            max_size: config.cache.max_size,
            ttl: config.cache.ttl(),
        });

        let api_key_cipher = Arc::new(
            ApiKeyCipher::new(&config.crypto.encryption_key_hex)
                .expect("config.crypto.encryption_key_hex already validated by AppConfig::validate"),
        );

        Self {
            config,
            pool,
            auth,
            disposition,
            anonymizer,
            http_client: reqwest::Client::new(),
            rate_limiter,
            concurrent_limiter,
            log_tx,
            api_key_cipher,
            application_config_cache,
            enterprise_deployment,
        }
    }

    /// Load the effective scanner set, sensitivity thresholds, lists, and
    /// disposal policies for `application_id`, serving from cache when
    /// present (§4.9). Not `&mut self` — the cache is interior-mutable, so
    /// handlers call this straight off a shared `AppState`.
    pub async fn application_config(&self, tenant_id: Uuid, application_id: Uuid) -> StoreResult<Arc<ApplicationConfig>> {
        let key = application_id.to_string();
        if let Some(cached) = self.application_config_cache.get(&key) {
            return Ok(cached);
        }

        let scanner_set = scanners::effective_scanners(&self.pool, tenant_id, application_id).await?;
        let sensitivity = policies::sensitivity_config(&self.pool, application_id).await?;
        let whitelists = lists::whitelists_for_application(&self.pool, application_id).await?;
        let blacklists = lists::blacklists_for_application(&self.pool, application_id).await?;
        let (data_policy, safe_model_id) = policies::data_leakage_policy(&self.pool, tenant_id, application_id).await?;
        let gateway_policy = policies::gateway_policy(&self.pool, tenant_id, application_id).await?;
        let response_templates = templates::templates_for_application(&self.pool, application_id).await?;
        let kb_rows = templates::knowledge_bases_for_application(&self.pool, application_id).await?;
        let kb_entries = crate::templates::load_kb_entries(&kb_rows).await;

        let bundle = Arc::new(ApplicationConfig {
            scanners: scanner_set,
            sensitivity,
            whitelists,
            blacklists,
            data_policy,
            gateway_policy,
            safe_model_id,
            templates: response_templates,
            kb_entries,
        });

        self.application_config_cache.insert(key, bundle.clone());
        Ok(bundle)
    }

    /// Invalidate a cached application config — called by admin endpoints
    /// after any write that changes scanners, lists, or policies for the
    /// application.
    pub fn invalidate_application_config(&self, application_id: Uuid) {
        self.application_config_cache.invalidate(&application_id.to_string());
    }

    /// Resolve a tenant's current subscription tier, used by the auth
    /// middleware to pick a rate-limit tier and by the quota middleware to
    /// decide whether the monthly cap has been hit (no-op in enterprise
    /// deployments).
    pub async fn tenant_subscription(&self, tenant_id: Uuid) -> StoreResult<guardrail_store::models::TenantSubscription> {
        tenants::subscription(&self.pool, tenant_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn test_pool() -> PgPool {
        PgPool::connect_lazy("postgres://localhost/guardrail_test").expect("lazy pool construction does not touch the network")
    }

    fn test_state() -> AppState {
        let config = Arc::new(AppConfig::default());
        let pool = test_pool();
        let auth_cache = Arc::new(crate::auth::AuthCache::new(Duration::from_secs(300), 100));
        let auth = Arc::new(AuthService::new(pool.clone(), auth_cache, config.jwt.secret.clone()));
        let log_tx = crate::log_pipeline::spawn(pool.clone(), std::env::temp_dir(), 16);
        AppState::new(config, pool, auth, log_tx)
    }

    #[test]
    fn new_constructs_without_touching_the_network() {
        let state = test_state();
        assert!(state.config.genai.enabled == false || state.config.genai.enabled == true);
    }

    #[tokio::test]
    async fn application_config_cache_starts_empty() {
        let state = test_state();
        assert!(state.application_config_cache.get(&Uuid::new_v4().to_string()).is_none());
    }
}
