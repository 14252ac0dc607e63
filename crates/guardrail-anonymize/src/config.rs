//! Configuration for anonymization

use crate::method::Method;
use crate::types::EntityType;
use std::collections::HashMap;
use std::time::Duration;

/// Configuration for the Anonymizer component
#[derive(Debug, Clone)]
pub struct AnonymizerConfig {
    /// Entity types to detect and anonymize
    pub entity_types: Vec<EntityType>,
    /// Placeholder format to use
    pub placeholder_format: PlaceholderFormat,
    /// Time-to-live for vault mappings
    pub vault_ttl: Duration,
    /// Per-entity-type anonymization method for the one-way `anonymize`
    /// action (§4.8); entity types absent from this map use `Method::Mask`.
    pub methods: HashMap<EntityType, Method>,
}

impl Default for AnonymizerConfig {
    fn default() -> Self {
        Self {
            entity_types: vec![
                EntityType::Person,
                EntityType::Email,
                EntityType::CreditCard,
                EntityType::SSN,
                EntityType::PhoneNumber,
            ],
            placeholder_format: PlaceholderFormat::Numbered,
            vault_ttl: Duration::from_secs(3600), // 1 hour
            methods: HashMap::new(),
        }
    }
}

impl AnonymizerConfig {
    pub fn method_for(&self, entity_type: EntityType) -> Method {
        self.methods.get(&entity_type).copied().unwrap_or(Method::Mask)
    }
}

/// Format for generated placeholders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderFormat {
    /// Numbered format: `__person_1__`, `__email_1__`
    Numbered,
    /// UUID format: `__person_<uuid>__`
    Uuid,
    /// Hashed format: `__person_<hash>__`
    Hashed,
}
