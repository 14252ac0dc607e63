//! Bridges the standalone [`detector::regex::RegexDetector`](crate::detector::regex::RegexDetector)
//! and [`vault::MemoryVault`](crate::vault::MemoryVault) into the narrower
//! `EntityDetector`/`VaultStorage`/`AuditLogger` traits [`Anonymizer`](crate::Anonymizer)
//! is generic over. The detection and storage logic lives in `detector`/`vault`;
//! this module only translates types and error kinds at the seam.

use crate::anonymizer::{AuditLogger, EntityDetector, VaultStorage};
use crate::detector::regex::RegexDetector;
use crate::detector::EntityDetector as RawEntityDetector;
use crate::types::{EntityMapping, EntityMatch};
use crate::vault::{EntityMapping as VaultMapping, MemoryVault, VaultStorage as RawVaultStorage};
use crate::{AnonymizationError, Result};
use async_trait::async_trait;
use std::time::{Duration, SystemTime};
use tracing::info;

/// Adapts [`RegexDetector`] to the [`EntityDetector`] trait `Anonymizer` expects.
pub struct RegexEntityDetector {
    inner: RegexDetector,
}

impl RegexEntityDetector {
    pub fn new() -> Self {
        Self {
            inner: RegexDetector::new(),
        }
    }
}

impl Default for RegexEntityDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntityDetector for RegexEntityDetector {
    async fn detect(&self, text: &str) -> Result<Vec<EntityMatch>> {
        self.inner
            .detect(text)
            .await
            .map_err(|e| AnonymizationError::DetectorError(e.to_string()))
    }
}

/// Adapts [`MemoryVault`] (session-keyed, `vault::EntityMapping`) to the
/// session-id-as-parameter [`VaultStorage`] trait `Anonymizer` expects
/// (`crate::types::EntityMapping`, which carries no `session_id` of its own).
pub struct InMemoryVault {
    inner: MemoryVault,
    default_ttl: Duration,
}

impl InMemoryVault {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            inner: MemoryVault::new(),
            default_ttl,
        }
    }
}

fn to_vault_mapping(session_id: &str, mapping: EntityMapping) -> VaultMapping {
    VaultMapping {
        session_id: session_id.to_string(),
        placeholder: mapping.placeholder,
        entity_type: mapping.entity_type,
        original_value: mapping.original_value,
        confidence: mapping.confidence,
        timestamp: mapping.timestamp,
        expires_at: mapping.expires_at.unwrap_or(SystemTime::now() + Duration::from_secs(3600)),
    }
}

fn from_vault_mapping(mapping: VaultMapping) -> EntityMapping {
    EntityMapping {
        entity_type: mapping.entity_type,
        original_value: mapping.original_value,
        placeholder: mapping.placeholder,
        confidence: mapping.confidence,
        timestamp: mapping.timestamp,
        expires_at: Some(mapping.expires_at),
    }
}

#[async_trait]
impl VaultStorage for InMemoryVault {
    async fn store_mapping(&self, session_id: &str, mapping: EntityMapping) -> Result<()> {
        let mapping = if mapping.expires_at.is_none() {
            EntityMapping {
                expires_at: Some(SystemTime::now() + self.default_ttl),
                ..mapping
            }
        } else {
            mapping
        };
        self.inner
            .store_mapping(to_vault_mapping(session_id, mapping))
            .await
            .map_err(|e| AnonymizationError::VaultError(e.to_string()))
    }

    async fn get_mapping(&self, session_id: &str, placeholder: &str) -> Result<Option<EntityMapping>> {
        self.inner
            .get_mapping(session_id, placeholder)
            .await
            .map(|opt| opt.map(from_vault_mapping))
            .map_err(|e| AnonymizationError::VaultError(e.to_string()))
    }

    async fn get_session_mappings(&self, session_id: &str) -> Result<Vec<EntityMapping>> {
        self.inner
            .get_session_mappings(session_id)
            .await
            .map(|mappings| mappings.into_iter().map(from_vault_mapping).collect())
            .map_err(|e| AnonymizationError::VaultError(e.to_string()))
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        self.inner
            .delete_session(session_id)
            .await
            .map_err(|e| AnonymizationError::VaultError(e.to_string()))
    }
}

/// Structured-log-only audit trail: one `tracing` event per anonymize /
/// deanonymize call, session id redacted to its first 8 characters.
pub struct TracingAuditLogger;

impl TracingAuditLogger {
    pub fn new() -> Self {
        Self
    }

    fn redact(session_id: &str) -> String {
        format!("{}****", &session_id[..session_id.len().min(8)])
    }
}

impl Default for TracingAuditLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditLogger for TracingAuditLogger {
    fn log_anonymize(&self, session_id: &str, entity_count: usize) {
        info!(event = "anonymize", session_id = %Self::redact(session_id), entity_count, "text anonymized");
    }

    fn log_deanonymize(&self, session_id: &str, entity_count: usize) {
        info!(event = "deanonymize", session_id = %Self::redact(session_id), entity_count, "text restored");
    }
}
