//! Vault for cross-scanner state management
//!
//! ## SPARC Specification
//!
//! Provides thread-safe state storage for:
//! - Anonymization mappings
//! - Session context
//! - Cross-scanner communication

use crate::Error;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe state storage for scanners
///
/// ## Enterprise Design
///
/// - Thread-safe with RwLock
/// - Type-safe value storage
/// - Namespaced keys
/// - Clone-friendly (Arc<RwLock>)
#[derive(Clone)]
pub struct Vault {
    data: Arc<RwLock<HashMap<String, serde_json::Value>>>,
}

impl Vault {
    /// Create a new vault
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Store a value in the vault
    pub fn set<K: Into<String>, V: serde::Serialize>(&self, key: K, value: V) -> Result<(), Error> {
        let json_value = serde_json::to_value(value)
            .map_err(|e| Error::vault(format!("Failed to serialize value: {}", e)))?;

        self.data
            .write()
            .map_err(|e| Error::vault(format!("Failed to acquire write lock: {}", e)))?
            .insert(key.into(), json_value);

        Ok(())
    }

    /// Get a value from the vault
    pub fn get<K: AsRef<str>, V: for<'de> serde::Deserialize<'de>>(
        &self,
        key: K,
    ) -> Result<Option<V>, Error> {
        let data = self
            .data
            .read()
            .map_err(|e| Error::vault(format!("Failed to acquire read lock: {}", e)))?;

        match data.get(key.as_ref()) {
            Some(value) => {
                let typed_value = serde_json::from_value(value.clone())
                    .map_err(|e| Error::vault(format!("Failed to deserialize value: {}", e)))?;
                Ok(Some(typed_value))
            }
            None => Ok(None),
        }
    }

    /// Check if a key exists
    pub fn contains_key<K: AsRef<str>>(&self, key: K) -> bool {
        self.data
            .read()
            .map(|data| data.contains_key(key.as_ref()))
            .unwrap_or(false)
    }

    /// Remove a value from the vault
    pub fn remove<K: AsRef<str>>(&self, key: K) -> Result<(), Error> {
        self.data
            .write()
            .map_err(|e| Error::vault(format!("Failed to acquire write lock: {}", e)))?
            .remove(key.as_ref());

        Ok(())
    }

    /// Clear all values
    pub fn clear(&self) -> Result<(), Error> {
        self.data
            .write()
            .map_err(|e| Error::vault(format!("Failed to acquire write lock: {}", e)))?
            .clear();

        Ok(())
    }

    /// Get all keys
    pub fn keys(&self) -> Result<Vec<String>, Error> {
        let data = self
            .data
            .read()
            .map_err(|e| Error::vault(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.keys().cloned().collect())
    }

    /// Get number of entries
    pub fn len(&self) -> usize {
        self.data.read().map(|data| data.len()).unwrap_or(0)
    }

    /// Check if vault is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Vault {
    fn default() -> Self {
        Self::new()
    }
}
