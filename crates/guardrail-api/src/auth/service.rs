//! Authentication service: resolves a raw `sk-xxai-...` key or JWT bearer
//! token to an [`AuthContext`], backed by the auth cache in front of
//! Postgres (§4.5, §4.9).

use super::cache::AuthCache;
use super::types::{is_well_formed_api_key, AuthContext, Claims};
use guardrail_core::Error;
use guardrail_store::repo::{applications, tenants};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

type Result<T> = std::result::Result<T, Error>;

#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
    cache: Arc<AuthCache>,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(pool: PgPool, cache: Arc<AuthCache>, jwt_secret: impl Into<String>) -> Self {
        Self {
            pool,
            cache,
            jwt_secret: jwt_secret.into(),
        }
    }

    /// Resolve an `sk-xxai-...` key to its [`AuthContext`], trying the auth
    /// cache first (§4.9). Checks the application table before the tenant
    /// table: an application key is the narrower, more specific credential.
    pub async fn resolve_api_key(&self, raw_key: &str) -> Result<AuthContext> {
        if !is_well_formed_api_key(raw_key) {
            return Err(Error::unauthorized("malformed API key"));
        }

        if let Some(ctx) = self.cache.get(raw_key) {
            return Ok(ctx);
        }

        if let Some(app) = applications::find_by_api_key(&self.pool, raw_key).await? {
            let ctx = AuthContext::Application {
                tenant_id: app.tenant_id,
                application_id: app.id,
            };
            self.cache.insert(raw_key, ctx.clone());
            return Ok(ctx);
        }

        if let Some(tenant) = tenants::find_by_api_key(&self.pool, raw_key).await? {
            let ctx = if tenant.direct_model_api_key.as_deref() == Some(raw_key) {
                AuthContext::DirectModel { tenant_id: tenant.id }
            } else {
                AuthContext::Tenant { tenant_id: tenant.id }
            };
            self.cache.insert(raw_key, ctx.clone());
            return Ok(ctx);
        }

        Err(Error::unauthorized("invalid API key"))
    }

    /// Resolve the `X-OG-Application-ID` auto-discovery header against a
    /// tenant-scoped context (§4.3 "Application auto-discovery"): the header
    /// is the application's UUID, or, for legacy integrations, a value
    /// looked up against the application's own id column.
    pub async fn resolve_application_header(
        &self,
        ctx: AuthContext,
        header_value: &str,
    ) -> Result<AuthContext> {
        let tenant_id = ctx.tenant_id();

        if let Ok(app_id) = Uuid::parse_str(header_value) {
            let app = applications::find_by_id(&self.pool, app_id).await?;
            if app.tenant_id != tenant_id {
                return Err(Error::unauthorized("application does not belong to this tenant"));
            }
            return Ok(ctx.with_application(app.id));
        }

        let app = applications::find_by_tenant_and_external_id(&self.pool, tenant_id, header_value)
            .await?
            .ok_or_else(|| Error::not_found("application"))?;
        Ok(ctx.with_application(app.id))
    }

    /// Issue a JWT for the admin dashboard's email/password login flow.
    pub fn issue_jwt(&self, tenant_id: Uuid, email: &str, role: &str, ttl: chrono::Duration) -> Result<String> {
        let claims = Claims::new(tenant_id, email, role, ttl);
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| Error::auth(format!("failed to issue JWT: {e}")))
    }

    /// Verify a JWT bearer token, returning a tenant-scoped [`AuthContext`].
    pub fn verify_jwt(&self, token: &str) -> Result<AuthContext> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| Error::unauthorized(format!("invalid JWT: {e}")))?;

        Ok(AuthContext::Tenant {
            tenant_id: data.claims.sub,
        })
    }

    /// Bust the cached entry for a key — called by admin endpoints that
    /// rotate or revoke a tenant/application key.
    pub fn invalidate_key(&self, raw_key: &str) {
        self.cache.invalidate(raw_key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_service() -> AuthService {
        let pool = PgPool::connect_lazy("postgres://localhost/guardrail_test")
            .expect("lazy pool construction does not touch the network");
        let cache = Arc::new(AuthCache::new(Duration::from_secs(300), 100));
        AuthService::new(pool, cache, "test-secret")
    }

    #[test]
    fn jwt_round_trips_through_issue_and_verify() {
        let service = test_service();
        let tenant_id = Uuid::new_v4();
        let token = service
            .issue_jwt(tenant_id, "a@b.com", "owner", chrono::Duration::hours(1))
            .unwrap();
        let ctx = service.verify_jwt(&token).unwrap();
        assert_eq!(ctx.tenant_id(), tenant_id);
    }

    #[test]
    fn malformed_jwt_is_rejected() {
        let service = test_service();
        assert!(service.verify_jwt("not-a-jwt").is_err());
    }

    #[tokio::test]
    async fn malformed_api_key_is_rejected_before_any_db_call() {
        let service = test_service();
        let result = service.resolve_api_key("not-a-key").await;
        assert!(matches!(result, Err(Error::Unauthorized(_))));
    }
}
