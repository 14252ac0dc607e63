//! Text replacement algorithm for anonymization

use crate::types::EntityMatch;
use crate::{AnonymizationError, Result};

/// Replace entities in text with placeholders using reverse-order algorithm
///
/// This function preserves text indices by replacing from end to start.
/// It handles overlapping entities, preserves whitespace and punctuation,
/// and supports Unicode text.
///
/// # Arguments
/// * `text` - Original text
/// * `entities` - Detected entities (sorted by start position)
/// * `placeholders` - Replacement placeholders (one per entity)
///
/// # Returns
/// Anonymized text with entities replaced by placeholders
pub fn replace_entities(
    text: &str,
    entities: &[EntityMatch],
    placeholders: &[String],
) -> Result<String> {
    // Validate inputs
    if entities.len() != placeholders.len() {
        return Err(AnonymizationError::InvalidRange(format!(
            "Entity count ({}) must match placeholder count ({})",
            entities.len(),
            placeholders.len()
        )));
    }

    if entities.is_empty() {
        return Ok(text.to_string());
    }

    // Validate entity ranges
    for entity in entities {
        if entity.start >= entity.end {
            return Err(AnonymizationError::InvalidRange(format!(
                "Invalid entity range: {}..{}",
                entity.start, entity.end
            )));
        }
        if entity.end > text.len() {
            return Err(AnonymizationError::InvalidRange(format!(
                "Entity end ({}) exceeds text length ({})",
                entity.end,
                text.len()
            )));
        }
    }

    // Clone text as String for in-place modification
    let mut result = text.to_string();

    // Replace in reverse order to preserve indices
    for i in (0..entities.len()).rev() {
        let entity = &entities[i];
        let placeholder = &placeholders[i];

        // Replace the range
        result.replace_range(entity.start..entity.end, placeholder);
    }

    Ok(result)
}

/// Restore placeholders in text to their original values (§4.8 "Restoration").
///
/// Ordered by placeholder length descending so `__email_1__` is never
/// partially consumed by a substring match against `__email_12__`. No
/// placeholder is left unrestored if a mapping exists for it.
pub fn restore_placeholders(text: &str, mapping: &std::collections::HashMap<String, String>) -> String {
    let mut placeholders: Vec<&String> = mapping.keys().collect();
    placeholders.sort_by_key(|p| std::cmp::Reverse(p.len()));

    let mut result = text.to_string();
    for placeholder in placeholders {
        if let Some(original) = mapping.get(placeholder) {
            result = result.replace(placeholder.as_str(), original);
        }
    }
    result
}

/// Check if two entities overlap
fn entities_overlap(e1: &EntityMatch, e2: &EntityMatch) -> bool {
    e1.start < e2.end && e2.start < e1.end
}

/// Resolve overlapping entities by choosing the highest confidence
pub fn resolve_overlaps(entities: Vec<EntityMatch>) -> Vec<EntityMatch> {
    if entities.is_empty() {
        return entities;
    }

    let mut sorted = entities;
    sorted.sort_by_key(|e| e.start);

    let mut result = vec![];
    let mut current = sorted[0].clone();

    for next in sorted.into_iter().skip(1) {
        if entities_overlap(&current, &next) {
            // Choose entity with higher confidence
            if next.confidence > current.confidence {
                current = next;
            }
            // else keep current
        } else {
            result.push(current);
            current = next;
        }
    }
    result.push(current);

    result
}
