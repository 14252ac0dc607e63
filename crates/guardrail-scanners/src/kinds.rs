//! Regex and keyword scanner matching (§4.1).

use guardrail_core::{Message, ScannerDefinition};
use regex::Regex;

/// A window matches if any message's flattened text matches the scanner's
/// compiled regex. A compile failure disables the scanner for this request
/// and is logged (§4.1 "Failure semantics"), never propagated as an error.
pub fn regex_matches(scanner: &ScannerDefinition, messages: &[Message]) -> bool {
    let re = match Regex::new(&scanner.definition) {
        Ok(re) => re,
        Err(err) => {
            tracing::warn!(tag = %scanner.tag, error = %err, "regex scanner failed to compile, disabling for this request");
            return false;
        }
    };
    messages.iter().any(|m| re.is_match(&m.as_text()))
}

/// A window matches if any newline-separated keyword appears as a
/// case-insensitive substring of any message's flattened text.
pub fn keyword_matches(scanner: &ScannerDefinition, messages: &[Message]) -> bool {
    let keywords: Vec<String> = scanner
        .definition
        .lines()
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty())
        .collect();

    if keywords.is_empty() {
        return false;
    }

    messages.iter().any(|m| {
        let text = m.as_text().to_lowercase();
        keywords.iter().any(|k| text.contains(k.as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardrail_core::{Dimension, Role, RiskLevel, ScannerKind};

    fn def(kind: ScannerKind, definition: &str) -> ScannerDefinition {
        ScannerDefinition {
            tag: "T1".to_string(),
            name: "Test".to_string(),
            description: "desc".to_string(),
            kind,
            definition: definition.to_string(),
            dimension: Dimension::Compliance,
            default_risk_level: RiskLevel::MediumRisk,
            default_scan_prompt: true,
            default_scan_response: true,
            active: true,
        }
    }

    #[test]
    fn regex_matches_any_message() {
        let scanner = def(ScannerKind::Regex, r"\bssn\b");
        let messages = vec![Message::new(Role::User, "what is your SSN")];
        assert!(regex_matches(&scanner, &messages));
    }

    #[test]
    fn regex_compile_error_disables_scanner() {
        let scanner = def(ScannerKind::Regex, r"(unclosed");
        let messages = vec![Message::new(Role::User, "anything")];
        assert!(!regex_matches(&scanner, &messages));
    }

    #[test]
    fn keyword_matches_case_insensitive_substring() {
        let scanner = def(ScannerKind::Keyword, "competitor inc\nbadword");
        let messages = vec![Message::new(Role::User, "I work at Competitor Inc now")];
        assert!(keyword_matches(&scanner, &messages));
    }

    #[test]
    fn keyword_no_match() {
        let scanner = def(ScannerKind::Keyword, "badword");
        let messages = vec![Message::new(Role::User, "nothing interesting here")];
        assert!(!keyword_matches(&scanner, &messages));
    }
}
