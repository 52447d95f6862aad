//! Layer 2 — Smart filter (spec §2).
//!
//! A cheap, regex/heuristic scoring pass that answers "is there a name or
//! organisation mention here at all?" before the expensive layers run. Its
//! output feeds the decision engine's `smartfilter` contribution (§4.4) and
//! gates the whole pipeline: `should_process == false` short-circuits to
//! `SKIP`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterDecision {
    MustProcess,
    Recommend,
    Maybe,
    Skip,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartFilterResult {
    pub decision: FilterDecision,
    pub should_process: bool,
    pub confidence: f32,
    pub signals: Vec<String>,
}

static CAPITALIZED_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{Lu}\p{Ll}+(?:[\s-]\p{Lu}\p{Ll}+){1,3}").unwrap());
static INITIALS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\p{Lu}\.\s?\p{Lu}?\.?\b").unwrap());
static ORG_LEGAL_FORM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(ооо|зао|оао|пао|тов|пп|фоп|llc|ltd|gmbh|inc|corp|ag|s\.a\.|plc)\b").unwrap()
});
static QUOTED_PHRASE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"["«][^"»]{2,60}["»]"#).unwrap());
static PAYMENT_CONTEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(платеж|оплата|перевод|payment|transfer|получатель|відправник|invoice|инн|edrpou|iban|swift)\b")
        .unwrap()
});
static DIGIT_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{8,}").unwrap());

/// Weighted-signal scoring; all weights sum to at most 1.0 so `confidence`
/// stays in `[0,1]` without clamping on the happy path.
pub fn screen(text: &str) -> SmartFilterResult {
    let mut score = 0.0f32;
    let mut signals = Vec::new();

    if CAPITALIZED_RUN.is_match(text) {
        score += 0.40;
        signals.push("capitalized_name_run".to_string());
    }
    if INITIALS.is_match(text) {
        score += 0.15;
        signals.push("initials_present".to_string());
    }
    if ORG_LEGAL_FORM.is_match(text) {
        score += 0.25;
        signals.push("org_legal_form".to_string());
    }
    if QUOTED_PHRASE.is_match(text) {
        score += 0.10;
        signals.push("quoted_phrase".to_string());
    }
    if PAYMENT_CONTEXT.is_match(text) {
        score += 0.10;
        signals.push("payment_context".to_string());
    }
    if DIGIT_ID.is_match(text) {
        score += 0.10;
        signals.push("long_digit_run".to_string());
    }

    let confidence = score.min(1.0);

    let decision = if confidence >= 0.70 {
        FilterDecision::MustProcess
    } else if confidence >= 0.45 {
        FilterDecision::Recommend
    } else if confidence >= 0.20 {
        FilterDecision::Maybe
    } else {
        FilterDecision::Skip
    };

    let should_process = !matches!(decision, FilterDecision::Skip);

    SmartFilterResult {
        decision,
        should_process,
        confidence,
        signals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_trigger_must_process() {
        let r = screen("Владимир Владимирович Путин, платеж получателю");
        assert!(r.should_process);
        assert!(matches!(r.decision, FilterDecision::MustProcess));
    }

    #[test]
    fn noise_is_skipped() {
        let r = screen("качество хорошее спасибо большое");
        assert!(!r.should_process);
        assert_eq!(r.decision, FilterDecision::Skip);
    }

    #[test]
    fn org_legal_form_counts_towards_recommend_or_higher() {
        let r = screen(r#"ТОВ "Рога і Копита" отримувач"#);
        assert!(r.confidence >= 0.45);
    }
}
