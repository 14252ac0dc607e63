//! Scanner engine (§4.1): evaluates a conversation's sliding windows against
//! a set of effective scanners and produces one [`DimensionVerdict`] per
//! dimension.

use crate::genai::GenaiClient;
use crate::kinds::{keyword_matches, regex_matches};
use crate::window::split_into_windows;
use guardrail_core::{
    Dimension, DimensionVerdict, EffectiveScanner, Message, RiskLevel, Role, ScannerKind,
    SensitivityConfig,
};
use std::collections::HashMap;
use std::sync::Arc;

const ALL_DIMENSIONS: [Dimension; 3] = [Dimension::Compliance, Dimension::Security, Dimension::Data];

/// Evaluates enabled scanners across a conversation's sliding windows.
pub struct ScannerEngine {
    genai: Option<Arc<GenaiClient>>,
}

impl ScannerEngine {
    pub fn new(genai: Option<Arc<GenaiClient>>) -> Self {
        Self { genai }
    }

    /// Evaluate `messages` against `scanners`, returning one verdict per
    /// dimension. `max_context_chars` bounds the sliding-window size.
    pub async fn evaluate(
        &self,
        messages: &[Message],
        scanners: &[EffectiveScanner],
        sensitivity: &SensitivityConfig,
        max_context_chars: usize,
    ) -> HashMap<Dimension, DimensionVerdict> {
        let windows = split_into_windows(messages, max_context_chars);
        let last_role = messages.last().map(|m| m.role);

        let applicable: Vec<&EffectiveScanner> = scanners
            .iter()
            .filter(|s| s.is_enabled && s.definition.active)
            .filter(|s| match last_role {
                Some(Role::Assistant) => s.scan_response,
                _ => s.scan_prompt,
            })
            .collect();

        let mut by_dimension: HashMap<Dimension, Vec<&EffectiveScanner>> = HashMap::new();
        for s in applicable {
            by_dimension.entry(s.definition.dimension).or_default().push(s);
        }

        let mut verdicts = HashMap::with_capacity(ALL_DIMENSIONS.len());
        for dim in ALL_DIMENSIONS {
            let dim_scanners = by_dimension.remove(&dim).unwrap_or_default();
            let verdict = if dim_scanners.is_empty() {
                DimensionVerdict::no_risk()
            } else {
                self.evaluate_dimension(&windows, &dim_scanners, sensitivity).await
            };
            verdicts.insert(dim, verdict);
        }

        verdicts
    }

    async fn evaluate_dimension(
        &self,
        windows: &[guardrail_core::MessageWindow],
        scanners: &[&EffectiveScanner],
        sensitivity: &SensitivityConfig,
    ) -> DimensionVerdict {
        let mut matched: HashMap<String, RiskLevel> = HashMap::new();
        let mut max_score: Option<f32> = None;

        let genai_defs: Vec<&guardrail_core::ScannerDefinition> = scanners
            .iter()
            .filter(|s| s.definition.kind == ScannerKind::Genai)
            .map(|s| &s.definition)
            .collect();

        for window in windows {
            for scanner in scanners {
                let hit = match scanner.definition.kind {
                    ScannerKind::Regex => regex_matches(&scanner.definition, &window.messages),
                    ScannerKind::Keyword => keyword_matches(&scanner.definition, &window.messages),
                    ScannerKind::Genai => false,
                };
                if hit {
                    record_match(&mut matched, &scanner.definition.tag, scanner.risk_level);
                }
            }

            if !genai_defs.is_empty() {
                if let Some(client) = &self.genai {
                    if let Some(result) = client.evaluate(&genai_defs, &window.messages).await {
                        max_score = Some(max_score.map_or(result.score, |m: f32| m.max(result.score)));
                        if sensitivity.level_for_score(result.score).is_some() {
                            for tag in &result.tags {
                                if let Some(scanner) = scanners.iter().find(|s| s.definition.tag == *tag) {
                                    record_match(&mut matched, tag, scanner.risk_level);
                                }
                            }
                        }
                    }
                }
            }
        }

        if matched.is_empty() {
            return DimensionVerdict::no_risk();
        }

        let risk_level = matched.values().copied().max().unwrap_or(RiskLevel::NoRisk);

        // §4.2 step 7: by risk level desc, then tag asc.
        let mut entries: Vec<(String, RiskLevel)> = matched.into_iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let matched_tags: Vec<String> = entries.iter().map(|(tag, _)| tag.clone()).collect();
        let categories: Vec<String> = entries
            .iter()
            .map(|(tag, _)| {
                scanners
                    .iter()
                    .find(|s| &s.definition.tag == tag)
                    .map(|s| s.definition.name.clone())
                    .unwrap_or_else(|| tag.clone())
            })
            .collect();

        DimensionVerdict {
            risk_level,
            categories,
            score: max_score,
            matched_tags,
        }
    }
}

fn record_match(matched: &mut HashMap<String, RiskLevel>, tag: &str, level: RiskLevel) {
    matched
        .entry(tag.to_string())
        .and_modify(|r| *r = (*r).max(level))
        .or_insert(level);
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardrail_core::{Dimension, ScannerDefinition, ScannerOverride};

    fn scanner(tag: &str, kind: ScannerKind, dimension: Dimension, definition: &str, level: RiskLevel) -> EffectiveScanner {
        let def = ScannerDefinition {
            tag: tag.to_string(),
            name: format!("Scanner {tag}"),
            description: "desc".to_string(),
            kind,
            definition: definition.to_string(),
            dimension,
            default_risk_level: level,
            default_scan_prompt: true,
            default_scan_response: true,
            active: true,
        };
        EffectiveScanner::from_definition(def, Some(&ScannerOverride::default()))
    }

    #[tokio::test]
    async fn no_risk_when_nothing_matches() {
        let engine = ScannerEngine::new(None);
        let scanners = vec![scanner("S1", ScannerKind::Keyword, Dimension::Compliance, "badword", RiskLevel::HighRisk)];
        let messages = vec![Message::new(Role::User, "hello there")];
        let sensitivity = SensitivityConfig::default();

        let verdicts = engine.evaluate(&messages, &scanners, &sensitivity, 7168).await;
        assert_eq!(verdicts[&Dimension::Compliance].risk_level, RiskLevel::NoRisk);
    }

    #[tokio::test]
    async fn keyword_match_sets_dimension_risk_level() {
        let engine = ScannerEngine::new(None);
        let scanners = vec![scanner("S1", ScannerKind::Keyword, Dimension::Compliance, "badword", RiskLevel::HighRisk)];
        let messages = vec![Message::new(Role::User, "this contains badword here")];
        let sensitivity = SensitivityConfig::default();

        let verdicts = engine.evaluate(&messages, &scanners, &sensitivity, 7168).await;
        let verdict = &verdicts[&Dimension::Compliance];
        assert_eq!(verdict.risk_level, RiskLevel::HighRisk);
        assert_eq!(verdict.categories, vec!["Scanner S1".to_string()]);
    }

    #[tokio::test]
    async fn disabled_direction_is_excluded() {
        let engine = ScannerEngine::new(None);
        let mut s = scanner("S1", ScannerKind::Keyword, Dimension::Compliance, "badword", RiskLevel::HighRisk);
        s.scan_response = false;
        let scanners = vec![s];
        // Last message is from the assistant, so only scan_response-enabled scanners apply.
        let messages = vec![
            Message::new(Role::User, "hello"),
            Message::new(Role::Assistant, "this contains badword here"),
        ];
        let sensitivity = SensitivityConfig::default();

        let verdicts = engine.evaluate(&messages, &scanners, &sensitivity, 7168).await;
        assert_eq!(verdicts[&Dimension::Compliance].risk_level, RiskLevel::NoRisk);
    }

    #[tokio::test]
    async fn category_ordering_is_risk_desc_then_tag_asc() {
        let engine = ScannerEngine::new(None);
        let scanners = vec![
            scanner("S2", ScannerKind::Keyword, Dimension::Compliance, "alpha", RiskLevel::LowRisk),
            scanner("S1", ScannerKind::Keyword, Dimension::Compliance, "beta", RiskLevel::HighRisk),
            scanner("S3", ScannerKind::Keyword, Dimension::Compliance, "gamma", RiskLevel::HighRisk),
        ];
        let messages = vec![Message::new(Role::User, "alpha beta gamma")];
        let sensitivity = SensitivityConfig::default();

        let verdicts = engine.evaluate(&messages, &scanners, &sensitivity, 7168).await;
        let verdict = &verdicts[&Dimension::Compliance];
        assert_eq!(verdict.matched_tags, vec!["S1".to_string(), "S3".to_string(), "S2".to_string()]);
    }
}
