//! Per-entity-type anonymization methods (§4.8): `mask`, `hash`, `replace`,
//! `genai_natural`, `genai_code`, `shuffle`, `random`, `regex_replace`.
//!
//! These compute the `anonymized_value` used by the one-way `anonymize`
//! action. The `anonymize_restore` action never consults these — it always
//! uses the `__<entity_type>_<n>__` placeholder so restoration is an exact
//! inverse (§4.8).

use crate::types::EntityType;
use sha2::{Digest, Sha256};

/// Method used to compute an entity's `anonymized_value` at detection time.
/// Mirrors `guardrail_core::types::AnonymizationMethod` but is kept local so
/// this crate has no dependency on the scanner-facing core enum ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Mask,
    Hash,
    Replace,
    GenaiNatural,
    GenaiCode,
    Shuffle,
    Random,
    RegexReplace,
}

/// Compute the anonymized value for one entity occurrence under `method`.
///
/// `genai_natural`/`genai_code` require a model call to produce a
/// contextually natural rewrite; that enrichment is an optional later step
/// (§4.2 "a generator can be asked to rewrite it... callers MUST be able to
/// disable it") performed by the caller. Here they fall back to the same
/// category tag `replace` uses, so the method is always total and callers
/// that skip GenAI rewriting still get a safe, deterministic value.
pub fn compute(entity_type: EntityType, original: &str, method: Method) -> String {
    match method {
        Method::Mask => mask(original),
        Method::Hash => hash(original),
        Method::Replace | Method::GenaiNatural | Method::GenaiCode => {
            format!("[REDACTED_{}]", entity_type.as_str().to_uppercase())
        }
        Method::Shuffle => shuffle(original),
        Method::Random => random_same_shape(original),
        Method::RegexReplace => "*".repeat(original.chars().count()),
    }
}

/// Mask all but the first and last visible character: `alice@example.com` -> `a****************m`.
fn mask(original: &str) -> String {
    let chars: Vec<char> = original.chars().collect();
    if chars.len() <= 2 {
        return "*".repeat(chars.len());
    }
    let mut out = String::with_capacity(chars.len());
    out.push(chars[0]);
    out.push_str(&"*".repeat(chars.len() - 2));
    out.push(*chars.last().unwrap());
    out
}

/// Deterministic short hash, stable across calls for the same input — useful
/// when downstream systems need a consistent pseudonym for the same entity.
fn hash(original: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(original.as_bytes());
    let digest = hasher.finalize();
    format!("{:x}", digest)[..12].to_string()
}

/// Shuffle the characters of the original value (order-scrambled, same alphabet).
fn shuffle(original: &str) -> String {
    let mut chars: Vec<char> = original.chars().collect();
    // Deterministic "shuffle" via reversal + rotation keeps this dependency-free
    // and reproducible for tests, while still not reproducing the original text.
    chars.reverse();
    if chars.len() > 1 {
        chars.rotate_left(1);
    }
    chars.into_iter().collect()
}

/// Replace with random same-length placeholder characters, preserving shape
/// (digits stay digit-shaped, letters stay letter-shaped) so downstream
/// format validators don't choke on the anonymized value.
fn random_same_shape(original: &str) -> String {
    original
        .chars()
        .map(|c| {
            if c.is_ascii_digit() {
                '0'
            } else if c.is_alphabetic() {
                'x'
            } else {
                c
            }
        })
        .collect()
}
