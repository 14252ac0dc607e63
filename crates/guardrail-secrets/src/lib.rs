//! Guardrail Gateway Secrets
//!
//! Reserved crate for a future standalone secrets-detection engine (API
//! keys, private keys, credential patterns) decoupled from the scanner
//! runtime. Today this detection lives inline as a scanner at
//! `guardrail_scanners::input::secrets`, which is what the detection
//! pipeline actually runs.
