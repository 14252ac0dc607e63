//! Disposition resolver (§4.2): combines dimension verdicts, whitelist,
//! blacklist, data-leakage policy, and security/compliance policy into a
//! single suggested disposition.

use crate::engine::ScannerEngine;
use guardrail_anonymize::Anonymizer;
use guardrail_core::{
    DataDisposalAction, Dimension, DimensionVerdict, EffectiveScanner, GatewayDisposalAction,
    Message, RiskLevel, SensitivityConfig, SuggestAction,
};
use std::collections::HashMap;
use std::sync::Arc;

/// A named keyword list the application has whitelisted; any match
/// short-circuits the whole resolution to `pass` (§4.2 step 1).
#[derive(Debug, Clone)]
pub struct WhitelistEntry {
    pub keyword: String,
}

/// A named keyword list the application has blacklisted. Blacklists always
/// fire regardless of sensitivity thresholds and contribute a `high_risk`
/// compliance-dimension category named after the list (§4.2 step 2).
#[derive(Debug, Clone)]
pub struct BlacklistEntry {
    pub list_name: String,
    pub keywords: Vec<String>,
}

impl BlacklistEntry {
    fn matches(&self, messages: &[Message]) -> bool {
        messages.iter().any(|m| {
            let text = m.as_text().to_lowercase();
            self.keywords.iter().any(|k| text.contains(&k.to_lowercase()))
        })
    }
}

/// Effective data-leakage disposal policy (application override, falling
/// back to tenant default, finally to the hardcoded triple below) — §4.2
/// step 4, `data_leakage_disposal_service.py` grounding.
#[derive(Debug, Clone, Copy)]
pub struct DataLeakagePolicy {
    pub high: DataDisposalAction,
    pub medium: DataDisposalAction,
    pub low: DataDisposalAction,
}

impl Default for DataLeakagePolicy {
    fn default() -> Self {
        Self {
            high: DataDisposalAction::Block,
            medium: DataDisposalAction::SwitchPrivateModel,
            low: DataDisposalAction::Anonymize,
        }
    }
}

impl DataLeakagePolicy {
    fn action_for(&self, level: RiskLevel) -> DataDisposalAction {
        match level {
            RiskLevel::HighRisk => self.high,
            RiskLevel::MediumRisk => self.medium,
            RiskLevel::LowRisk => self.low,
            RiskLevel::NoRisk => DataDisposalAction::Pass,
        }
    }
}

/// Effective security/compliance gateway disposal policy (§4.2 step 5).
#[derive(Debug, Clone, Copy)]
pub struct GatewayPolicy {
    pub high: GatewayDisposalAction,
    pub medium: GatewayDisposalAction,
    pub low: GatewayDisposalAction,
}

impl Default for GatewayPolicy {
    fn default() -> Self {
        Self {
            high: GatewayDisposalAction::Block,
            medium: GatewayDisposalAction::Replace,
            low: GatewayDisposalAction::Pass,
        }
    }
}

impl GatewayPolicy {
    fn action_for(&self, level: RiskLevel) -> GatewayDisposalAction {
        match level {
            RiskLevel::HighRisk => self.high,
            RiskLevel::MediumRisk => self.medium,
            RiskLevel::LowRisk => self.low,
            RiskLevel::NoRisk => GatewayDisposalAction::Pass,
        }
    }
}

/// An answer sourced from the Knowledge Base bound to a matched category,
/// used ahead of the static response template when similarity clears the
/// KB's configured threshold (§4.2 step 5).
pub trait KnowledgeBaseProvider: Send + Sync {
    fn lookup(&self, category: &str, messages: &[Message]) -> Option<String>;
}

/// Static per-category response templates, selected by the caller's
/// language (falling back to the platform default) — §4.2 step 5.
pub trait TemplateProvider: Send + Sync {
    fn template_for(&self, category: &str, language: &str) -> Option<String>;
}

fn builtin_default_template(category: &str) -> String {
    format!("This request was blocked due to a policy violation ({category}).")
}

/// The three per-dimension verdicts as handed to callers that need to
/// report each dimension separately (§6 `/v1/guardrails` response shape),
/// not just the resolver's combined action.
#[derive(Debug, Clone)]
pub struct DimensionSnapshot {
    pub compliance: DimensionVerdict,
    pub security: DimensionVerdict,
    pub data: DimensionVerdict,
}

impl DimensionSnapshot {
    fn no_risk() -> Self {
        Self {
            compliance: DimensionVerdict::no_risk(),
            security: DimensionVerdict::no_risk(),
            data: DimensionVerdict::no_risk(),
        }
    }
}

/// Final combined verdict returned by [`DispositionResolver::resolve`].
#[derive(Debug, Clone)]
pub struct Disposition {
    pub overall_risk_level: RiskLevel,
    pub suggest_action: SuggestAction,
    pub suggest_answer: Option<String>,
    pub score: Option<f32>,
    pub categories: Vec<String>,
    /// Set when `suggest_action` is `switch_private_model` (§4.2 step 4).
    pub switch_private_model: bool,
    /// Rewritten conversation when `suggest_action` is
    /// `replace_with_anonymized`.
    pub rewritten_messages: Option<Vec<Message>>,
    /// `placeholder -> original` map, populated only when restoration is
    /// required (proxy input path).
    pub restore_mapping: Option<HashMap<String, String>>,
    pub restore_session_id: Option<String>,
    /// Each dimension's own verdict, independent of which one drove
    /// `suggest_action` (§6 detection API response reports all three).
    pub dimensions: DimensionSnapshot,
    /// Entities the anonymizer detected, populated only on the
    /// `replace_with_anonymized` path.
    pub entities: Vec<guardrail_anonymize::EntityMatch>,
}

impl Disposition {
    fn pass() -> Self {
        Self {
            overall_risk_level: RiskLevel::NoRisk,
            suggest_action: SuggestAction::Pass,
            suggest_answer: None,
            score: None,
            categories: Vec::new(),
            switch_private_model: false,
            rewritten_messages: None,
            restore_mapping: None,
            restore_session_id: None,
            dimensions: DimensionSnapshot::no_risk(),
            entities: Vec::new(),
        }
    }
}

/// Combines scanner verdicts with policy to produce a single disposition.
pub struct DispositionResolver {
    engine: ScannerEngine,
    anonymizer: Arc<Anonymizer>,
}

impl DispositionResolver {
    pub fn new(engine: ScannerEngine, anonymizer: Arc<Anonymizer>) -> Self {
        Self { engine, anonymizer }
    }

    /// Resolve a conversation's disposition. `needs_restoration` selects
    /// `anonymize_with_restore` over the one-way `anonymize` (§4.2
    /// "Anonymize-action detail") for the `anonymize` data-leakage action.
    #[allow(clippy::too_many_arguments)]
    pub async fn resolve(
        &self,
        messages: &[Message],
        scanners: &[EffectiveScanner],
        sensitivity: &SensitivityConfig,
        max_context_chars: usize,
        whitelists: &[WhitelistEntry],
        blacklists: &[BlacklistEntry],
        data_policy: &DataLeakagePolicy,
        gateway_policy: &GatewayPolicy,
        kb: Option<&dyn KnowledgeBaseProvider>,
        templates: Option<&dyn TemplateProvider>,
        language: &str,
        needs_restoration: bool,
    ) -> Disposition {
        // Step 1: whitelist short-circuit.
        if whitelists
            .iter()
            .any(|w| messages.iter().any(|m| m.as_text().to_lowercase().contains(&w.keyword.to_lowercase())))
        {
            return Disposition::pass();
        }

        // Step 3: scanner evaluation.
        let mut verdicts = self
            .engine
            .evaluate(messages, scanners, sensitivity, max_context_chars)
            .await;

        // Step 2: blacklist, folded into the compliance verdict — always fires.
        for list in blacklists {
            if list.matches(messages) {
                let verdict = verdicts.entry(Dimension::Compliance).or_insert_with(DimensionVerdict::no_risk);
                if verdict.risk_level < RiskLevel::HighRisk {
                    verdict.risk_level = RiskLevel::HighRisk;
                }
                if !verdict.categories.contains(&list.list_name) {
                    verdict.categories.insert(0, list.list_name.clone());
                    verdict.matched_tags.insert(0, list.list_name.clone());
                }
            }
        }

        let data_verdict = verdicts.remove(&Dimension::Data).unwrap_or_else(DimensionVerdict::no_risk);
        let security_verdict = verdicts.remove(&Dimension::Security).unwrap_or_else(DimensionVerdict::no_risk);
        let compliance_verdict = verdicts.remove(&Dimension::Compliance).unwrap_or_else(DimensionVerdict::no_risk);

        let dimensions = DimensionSnapshot {
            compliance: compliance_verdict.clone(),
            security: security_verdict.clone(),
            data: data_verdict.clone(),
        };

        // Step 6: overall level, computed up front since both disposal steps
        // may short-circuit below without changing it.
        let overall_risk_level = data_verdict
            .risk_level
            .max(security_verdict.risk_level)
            .max(compliance_verdict.risk_level);

        // Step 4: data-leakage disposal.
        match data_policy.action_for(data_verdict.risk_level) {
            DataDisposalAction::Block => {
                let category = data_verdict.categories.first().cloned().unwrap_or_else(|| "data_leakage".to_string());
                let answer = templates
                    .and_then(|t| t.template_for(&category, language))
                    .unwrap_or_else(|| builtin_default_template(&category));
                return Disposition {
                    overall_risk_level,
                    suggest_action: SuggestAction::Reject,
                    suggest_answer: Some(answer),
                    score: data_verdict.score,
                    categories: data_verdict.categories,
                    switch_private_model: false,
                    rewritten_messages: None,
                    restore_mapping: None,
                    restore_session_id: None,
                    dimensions,
                    entities: Vec::new(),
                };
            }
            DataDisposalAction::SwitchPrivateModel => {
                return Disposition {
                    overall_risk_level,
                    suggest_action: SuggestAction::Pass,
                    suggest_answer: None,
                    score: data_verdict.score,
                    categories: data_verdict.categories,
                    switch_private_model: true,
                    rewritten_messages: None,
                    restore_mapping: None,
                    restore_session_id: None,
                    dimensions,
                    entities: Vec::new(),
                };
            }
            DataDisposalAction::Anonymize => {
                let combined = messages.iter().map(|m| m.as_text()).collect::<Vec<_>>().join("\n");
                let (anonymized_text, restore_mapping, session_id, entities) = if needs_restoration {
                    match self.anonymizer.anonymize_with_restore(&combined).await {
                        Ok(r) => (r.anonymized_text, Some(r.restore_mapping), Some(r.session_id), r.entities),
                        Err(err) => {
                            tracing::warn!(error = %err, "anonymize_with_restore failed, passing conversation through");
                            (combined.clone(), None, None, Vec::new())
                        }
                    }
                } else {
                    match self.anonymizer.anonymize(&combined).await {
                        Ok(r) => (r.anonymized_text, None, None, r.entities),
                        Err(err) => {
                            tracing::warn!(error = %err, "anonymize failed, passing conversation through");
                            (combined.clone(), None, None, Vec::new())
                        }
                    }
                };

                let rewritten = rewrite_last_message(messages, &anonymized_text);

                return Disposition {
                    overall_risk_level,
                    suggest_action: SuggestAction::ReplaceWithAnonymized,
                    suggest_answer: None,
                    score: data_verdict.score,
                    categories: data_verdict.categories,
                    switch_private_model: false,
                    rewritten_messages: Some(rewritten),
                    restore_mapping,
                    restore_session_id: session_id,
                    dimensions,
                    entities,
                };
            }
            DataDisposalAction::Pass => {}
        }

        // Step 5: security/compliance disposal over the max of the two levels.
        let gateway_level = security_verdict.risk_level.max(compliance_verdict.risk_level);
        let gateway_verdict = if security_verdict.risk_level >= compliance_verdict.risk_level {
            &security_verdict
        } else {
            &compliance_verdict
        };

        match gateway_policy.action_for(gateway_level) {
            GatewayDisposalAction::Block => {
                let category = gateway_verdict.categories.first().cloned().unwrap_or_else(|| "policy_violation".to_string());
                let answer = templates
                    .and_then(|t| t.template_for(&category, language))
                    .unwrap_or_else(|| builtin_default_template(&category));
                Disposition {
                    overall_risk_level,
                    suggest_action: SuggestAction::Reject,
                    suggest_answer: Some(answer),
                    score: gateway_verdict.score,
                    categories: gateway_verdict.categories.clone(),
                    switch_private_model: false,
                    rewritten_messages: None,
                    restore_mapping: None,
                    restore_session_id: None,
                    dimensions,
                    entities: Vec::new(),
                }
            }
            GatewayDisposalAction::Replace => {
                let category = gateway_verdict.categories.first().cloned().unwrap_or_else(|| "policy_violation".to_string());
                let answer = kb
                    .and_then(|k| k.lookup(&category, messages))
                    .or_else(|| templates.and_then(|t| t.template_for(&category, language)))
                    .unwrap_or_else(|| builtin_default_template(&category));
                Disposition {
                    overall_risk_level,
                    suggest_action: SuggestAction::Replace,
                    suggest_answer: Some(answer),
                    score: gateway_verdict.score,
                    categories: gateway_verdict.categories.clone(),
                    switch_private_model: false,
                    rewritten_messages: None,
                    restore_mapping: None,
                    restore_session_id: None,
                    dimensions: dimensions.clone(),
                    entities: Vec::new(),
                }
            }
            GatewayDisposalAction::Pass => Disposition {
                overall_risk_level,
                suggest_action: SuggestAction::Pass,
                suggest_answer: None,
                score: gateway_verdict.score,
                categories: gateway_verdict.categories.clone(),
                switch_private_model: false,
                rewritten_messages: None,
                restore_mapping: None,
                restore_session_id: None,
                dimensions,
                entities: Vec::new(),
            },
        }
    }
}

/// Replace the last message's text with `anonymized_text` — the anonymizer
/// operates over the flattened conversation, but only the newest message is
/// ever rewritten back into the conversation (the disposal targets the
/// triggering turn).
fn rewrite_last_message(messages: &[Message], anonymized_text: &str) -> Vec<Message> {
    let mut rewritten = messages.to_vec();
    if let Some(last) = rewritten.last_mut() {
        last.content = guardrail_core::MessageContent::Text(anonymized_text.to_string());
    }
    rewritten
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardrail_anonymize::{AnonymizerConfig, Anonymizer};
    use guardrail_core::Role;

    struct NoopDetector;

    #[async_trait::async_trait]
    impl guardrail_anonymize::anonymizer::EntityDetector for NoopDetector {
        async fn detect(&self, _text: &str) -> guardrail_anonymize::Result<Vec<guardrail_anonymize::EntityMatch>> {
            Ok(vec![])
        }
    }

    struct NoopVault;

    #[async_trait::async_trait]
    impl guardrail_anonymize::anonymizer::VaultStorage for NoopVault {
        async fn store_mapping(&self, _session_id: &str, _mapping: guardrail_anonymize::EntityMapping) -> guardrail_anonymize::Result<()> {
            Ok(())
        }
        async fn get_mapping(&self, _session_id: &str, _placeholder: &str) -> guardrail_anonymize::Result<Option<guardrail_anonymize::EntityMapping>> {
            Ok(None)
        }
        async fn get_session_mappings(&self, _session_id: &str) -> guardrail_anonymize::Result<Vec<guardrail_anonymize::EntityMapping>> {
            Ok(vec![])
        }
        async fn delete_session(&self, _session_id: &str) -> guardrail_anonymize::Result<()> {
            Ok(())
        }
    }

    struct NoopAudit;
    impl guardrail_anonymize::anonymizer::AuditLogger for NoopAudit {
        fn log_anonymize(&self, _session_id: &str, _entity_count: usize) {}
        fn log_deanonymize(&self, _session_id: &str, _entity_count: usize) {}
    }

    fn resolver() -> DispositionResolver {
        let anonymizer = Arc::new(Anonymizer::new(
            AnonymizerConfig::default(),
            Arc::new(NoopDetector),
            Arc::new(NoopVault),
            Arc::new(NoopAudit),
        ));
        DispositionResolver::new(ScannerEngine::new(None), anonymizer)
    }

    #[tokio::test]
    async fn whitelist_short_circuits_to_pass() {
        let resolver = resolver();
        let whitelists = vec![WhitelistEntry { keyword: "trusted-phrase".to_string() }];
        let messages = vec![Message::new(Role::User, "this is a trusted-phrase request")];
        let sensitivity = SensitivityConfig::default();

        let disposition = resolver
            .resolve(
                &messages,
                &[],
                &sensitivity,
                7168,
                &whitelists,
                &[],
                &DataLeakagePolicy::default(),
                &GatewayPolicy::default(),
                None,
                None,
                "en",
                true,
            )
            .await;

        assert_eq!(disposition.suggest_action, SuggestAction::Pass);
        assert_eq!(disposition.overall_risk_level, RiskLevel::NoRisk);
    }

    #[tokio::test]
    async fn blacklist_forces_high_risk_block() {
        let resolver = resolver();
        let blacklists = vec![BlacklistEntry {
            list_name: "banned_topics".to_string(),
            keywords: vec!["forbidden".to_string()],
        }];
        let messages = vec![Message::new(Role::User, "talk about forbidden things")];
        let sensitivity = SensitivityConfig::default();
        let gateway_policy = GatewayPolicy::default();

        let disposition = resolver
            .resolve(
                &messages,
                &[],
                &sensitivity,
                7168,
                &[],
                &blacklists,
                &DataLeakagePolicy::default(),
                &gateway_policy,
                None,
                None,
                "en",
                true,
            )
            .await;

        assert_eq!(disposition.suggest_action, SuggestAction::Reject);
        assert_eq!(disposition.overall_risk_level, RiskLevel::HighRisk);
        assert_eq!(disposition.categories, vec!["banned_topics".to_string()]);
        assert_eq!(disposition.dimensions.compliance.risk_level, RiskLevel::HighRisk);
        assert_eq!(disposition.dimensions.security.risk_level, RiskLevel::NoRisk);
    }

    #[tokio::test]
    async fn no_matches_passes_through() {
        let resolver = resolver();
        let messages = vec![Message::new(Role::User, "hello there")];
        let sensitivity = SensitivityConfig::default();

        let disposition = resolver
            .resolve(
                &messages,
                &[],
                &sensitivity,
                7168,
                &[],
                &[],
                &DataLeakagePolicy::default(),
                &GatewayPolicy::default(),
                None,
                None,
                "en",
                true,
            )
            .await;

        assert_eq!(disposition.suggest_action, SuggestAction::Pass);
    }
}
