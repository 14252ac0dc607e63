//! Main Anonymizer component.
//!
//! Two entry points, per §4.8 / `unified_anonymization_service.py`:
//!
//! - [`Anonymizer::anonymize`] — one-way; each entity is replaced by its
//!   `anonymized_value` computed from its configured [`Method`](crate::method::Method).
//!   Used for output-side data-leakage disposal and any path with no
//!   restoration need.
//! - [`Anonymizer::anonymize_with_restore`] — always uses the simple
//!   `__<entity_type>_<n>__` placeholder, because restoration must be an
//!   exact inverse. Used on the proxy's input-detection path.

use crate::config::AnonymizerConfig;
use crate::method;
use crate::placeholder::PlaceholderGenerator;
use crate::replacer::{replace_entities, resolve_overlaps, restore_placeholders};
use crate::types::{EntityMapping, EntityMatch};
use crate::Result;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::SystemTime;

/// Trait for entity detection
#[async_trait::async_trait]
pub trait EntityDetector: Send + Sync {
    /// Detect entities in the given text
    async fn detect(&self, text: &str) -> Result<Vec<EntityMatch>>;
}

/// Trait for vault storage
#[async_trait::async_trait]
pub trait VaultStorage: Send + Sync {
    /// Store an entity mapping
    async fn store_mapping(&self, session_id: &str, mapping: EntityMapping) -> Result<()>;

    /// Retrieve an entity mapping
    async fn get_mapping(&self, session_id: &str, placeholder: &str) -> Result<Option<EntityMapping>>;

    /// Retrieve every mapping for a session, used to restore a whole text in one pass.
    async fn get_session_mappings(&self, session_id: &str) -> Result<Vec<EntityMapping>>;

    /// Delete all mappings for a session
    async fn delete_session(&self, session_id: &str) -> Result<()>;
}

/// Trait for audit logging
pub trait AuditLogger: Send + Sync {
    /// Log an anonymization event
    fn log_anonymize(&self, session_id: &str, entity_count: usize);

    /// Log a deanonymization event
    fn log_deanonymize(&self, session_id: &str, entity_count: usize);
}

/// Result of an anonymization operation
#[derive(Debug, Clone, PartialEq)]
pub struct AnonymizeResult {
    /// Anonymized text (placeholders or per-entity anonymized values, depending on mode)
    pub anonymized_text: String,
    /// Unique session ID for this anonymization (only meaningful with restoration)
    pub session_id: String,
    /// Entities that were detected and replaced
    pub entities: Vec<EntityMatch>,
    /// `placeholder -> original` map, populated only by `anonymize_with_restore`
    pub restore_mapping: HashMap<String, String>,
}

/// Result of restoring a previously anonymized text.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreResult {
    pub restored_text: String,
    pub placeholders_restored: usize,
}

/// Main anonymizer component
pub struct Anonymizer {
    config: AnonymizerConfig,
    detector: Arc<dyn EntityDetector>,
    vault: Arc<dyn VaultStorage>,
    audit: Arc<dyn AuditLogger>,
}

impl Anonymizer {
    /// Create a new Anonymizer
    pub fn new(
        config: AnonymizerConfig,
        detector: Arc<dyn EntityDetector>,
        vault: Arc<dyn VaultStorage>,
        audit: Arc<dyn AuditLogger>,
    ) -> Self {
        Self {
            config,
            detector,
            vault,
            audit,
        }
    }

    /// One-way anonymization: each entity's text is replaced by its
    /// `anonymized_value`, computed from its configured method. No
    /// restore mapping is produced or stored — this is irreversible by
    /// design (§4.8).
    pub async fn anonymize(&self, text: &str) -> Result<AnonymizeResult> {
        let entities = resolve_overlaps(self.detector.detect(text).await?);
        if entities.is_empty() {
            return Ok(AnonymizeResult {
                anonymized_text: text.to_string(),
                session_id: String::new(),
                entities: vec![],
                restore_mapping: HashMap::new(),
            });
        }

        let values: Vec<String> = entities
            .iter()
            .map(|e| {
                let m = self.config.method_for(e.entity_type);
                method::compute(e.entity_type, &e.value, m)
            })
            .collect();

        let anonymized_text = replace_entities(text, &entities, &values)?;
        self.audit.log_anonymize("", entities.len());

        Ok(AnonymizeResult {
            anonymized_text,
            session_id: String::new(),
            entities,
            restore_mapping: HashMap::new(),
        })
    }

    /// Anonymize text using restorable `__<entity_type>_<n>__` placeholders,
    /// persisting the `placeholder -> original` mapping in the session vault
    /// (TTL `config.vault_ttl`) and returning it inline for callers that
    /// thread restoration through request-local context instead (§4.8, §9
    /// "Request-scoped context... explicit argument").
    pub async fn anonymize_with_restore(&self, text: &str) -> Result<AnonymizeResult> {
        let entities = resolve_overlaps(self.detector.detect(text).await?);

        if entities.is_empty() {
            let generator = PlaceholderGenerator::new();
            return Ok(AnonymizeResult {
                anonymized_text: text.to_string(),
                session_id: generator.session_id().to_string(),
                entities: vec![],
                restore_mapping: HashMap::new(),
            });
        }

        let generator = PlaceholderGenerator::new();
        let session_id = generator.session_id().to_string();
        let placeholders = generator.generate_batch(&entities);

        let anonymized_text = replace_entities(text, &entities, &placeholders)?;

        let now = SystemTime::now();
        let expires_at = now + self.config.vault_ttl;
        let mut restore_mapping = HashMap::with_capacity(entities.len());

        for (i, entity) in entities.iter().enumerate() {
            let mapping = EntityMapping {
                entity_type: entity.entity_type,
                original_value: entity.value.clone(),
                placeholder: placeholders[i].clone(),
                confidence: entity.confidence,
                timestamp: now,
                expires_at: Some(expires_at),
            };
            restore_mapping.insert(placeholders[i].clone(), entity.value.clone());
            self.vault.store_mapping(&session_id, mapping).await?;
        }

        self.audit.log_anonymize(&session_id, entities.len());

        Ok(AnonymizeResult {
            anonymized_text,
            session_id,
            entities,
            restore_mapping,
        })
    }

    /// Restore placeholders in `text` using the session's stored mapping
    /// (§4.8 "Restoration"). Safe to call repeatedly / on partial chunks —
    /// only placeholders present in `text` are touched.
    pub async fn restore(&self, session_id: &str, text: &str) -> Result<RestoreResult> {
        let mappings = self.vault.get_session_mappings(session_id).await?;
        if mappings.is_empty() {
            return Ok(RestoreResult {
                restored_text: text.to_string(),
                placeholders_restored: 0,
            });
        }

        let map: HashMap<String, String> = mappings
            .iter()
            .map(|m| (m.placeholder.clone(), m.original_value.clone()))
            .collect();

        let restored_text = restore_placeholders(text, &map);
        let placeholders_restored = mappings
            .iter()
            .filter(|m| text.contains(&m.placeholder))
            .count();

        if placeholders_restored > 0 {
            self.audit.log_deanonymize(session_id, placeholders_restored);
        }

        Ok(RestoreResult {
            restored_text,
            placeholders_restored,
        })
    }

    /// Restore text given an explicit mapping, bypassing the vault — used
    /// by callers (the proxy) that thread the mapping through request-local
    /// context rather than a session id (§9).
    pub fn restore_with_mapping(&self, text: &str, mapping: &HashMap<String, String>) -> String {
        restore_placeholders(text, mapping)
    }
}
