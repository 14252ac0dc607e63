//! In-memory adapters feeding the disposition resolver's
//! `TemplateProvider`/`KnowledgeBaseProvider` traits (§4.2 step 5) from an
//! [`crate::state::ApplicationConfig`] snapshot. Both traits are
//! synchronous by design (the resolver calls them mid-resolution), so the
//! DB/file reads happen once, at cache-refresh time, not per lookup.

use std::collections::HashMap;
use std::path::PathBuf;

use guardrail_core::Message;
use guardrail_scanners::disposition::{KnowledgeBaseProvider, TemplateProvider};
use guardrail_store::models::{KnowledgeBase, LanguageText};

/// One question/answer pair belonging to a knowledge base bound to a
/// scanner tag or blacklist name.
#[derive(Debug, Clone)]
pub struct KbEntry {
    pub bound_to: String,
    pub question: String,
    pub answer: String,
    pub similarity_threshold: f32,
}

/// Derive the on-disk source path for a KB's question/answer pairs from its
/// `index_path` column. The spec's vector index lives at
/// `kb_<id>_vectors.pkl`; the jsonl source these entries are imported from
/// is the same stem with the `_vectors.pkl` suffix replaced by `.jsonl`.
fn source_path(index_path: &str) -> PathBuf {
    match index_path.strip_suffix("_vectors.pkl") {
        Some(stem) => PathBuf::from(format!("{stem}.jsonl")),
        None => PathBuf::from(index_path).with_extension("jsonl"),
    }
}

#[derive(serde::Deserialize)]
struct KbLine {
    question: String,
    answer: String,
}

/// Load every KB's question/answer pairs from disk. Missing or unreadable
/// files are skipped with a warning rather than failing config load — a KB
/// that hasn't been imported yet simply contributes no entries.
pub async fn load_kb_entries(kbs: &[KnowledgeBase]) -> Vec<KbEntry> {
    let mut entries = Vec::new();
    for kb in kbs {
        let path = source_path(&kb.index_path);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => {
                for line in contents.lines().filter(|l| !l.trim().is_empty()) {
                    match serde_json::from_str::<KbLine>(line) {
                        Ok(parsed) => entries.push(KbEntry {
                            bound_to: kb.bound_to.clone(),
                            question: parsed.question,
                            answer: parsed.answer,
                            similarity_threshold: kb.similarity_threshold,
                        }),
                        Err(err) => tracing::warn!(error = %err, path = %path.display(), "malformed knowledge base line"),
                    }
                }
            }
            Err(err) => {
                tracing::debug!(error = %err, path = %path.display(), "knowledge base source not readable, skipping");
            }
        }
    }
    entries
}

/// Selects a response template by category and language, falling back to
/// English and then to the resolver's built-in default (§4.2 step 5
/// "selecting the user's language... falling back to the platform's
/// default_language").
pub struct StaticTemplateProvider<'a> {
    templates: &'a HashMap<String, LanguageText>,
}

impl<'a> StaticTemplateProvider<'a> {
    pub fn new(templates: &'a HashMap<String, LanguageText>) -> Self {
        Self { templates }
    }
}

impl TemplateProvider for StaticTemplateProvider<'_> {
    fn template_for(&self, category: &str, language: &str) -> Option<String> {
        let text = self.templates.get(category)?;
        let content = match language {
            "en" => Some(text.en.clone()),
            "zh" => text.zh.clone().or_else(|| Some(text.en.clone())),
            other => text.other.get(other).cloned().or_else(|| Some(text.en.clone())),
        };
        content
    }
}

/// Looks an incoming conversation's last message up against every KB entry
/// bound to the matched category, using substring containment in either
/// direction as a similarity proxy (no embedding model is consulted here —
/// see `DESIGN.md`). A KB's configured `similarity_threshold` has no
/// continuous score to compare against under substring matching, so any
/// containment match counts as a hit.
pub struct StaticKbProvider<'a> {
    entries: &'a [KbEntry],
}

impl<'a> StaticKbProvider<'a> {
    pub fn new(entries: &'a [KbEntry]) -> Self {
        Self { entries }
    }
}

impl KnowledgeBaseProvider for StaticKbProvider<'_> {
    fn lookup(&self, category: &str, messages: &[Message]) -> Option<String> {
        let text = messages.last()?.as_text().to_lowercase();
        if text.trim().is_empty() {
            return None;
        }
        self.entries
            .iter()
            .filter(|e| e.bound_to == category)
            .find(|e| {
                let q = e.question.to_lowercase();
                text.contains(&q) || q.contains(&text)
            })
            .map(|e| e.answer.clone())
    }
}
