//! Guardrail Gateway NLP
//!
//! Reserved crate for shared natural-language preprocessing (tokenization,
//! language detection helpers) that scanner and anonymization crates would
//! otherwise duplicate. No scanner currently depends on it directly — the
//! sliding-window and keyword matching in `guardrail-scanners` implement
//! their own character-count tokenization proxy per the detection spec.
//!
//! Left empty intentionally: splitting this out only pays off once a second
//! consumer needs the same NLP primitives.
