//! Pipeline configuration (spec §4.1 config fields, §4.4 weights/thresholds,
//! §6 feature flags). Plain `serde`-derived structs with per-field defaults,
//! the same shape as the teacher's `Policy`/`PolicyRule` (`default_priority`,
//! `default_enabled`) so the config can be loaded from YAML/JSON and
//! hot-reloaded as a full-object replacement (§5).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YoStrategy {
    Preserve,
    Fold,
}

/// Spec §4.1 normalization config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationConfig {
    pub remove_stop_words: bool,
    pub preserve_names: bool,
    pub enable_advanced_features: bool,
    pub ascii_fastpath: bool,
    pub ru_yo_strategy: YoStrategy,
    pub preserve_feminine_suffix_uk: bool,
    pub strict_stopwords: bool,
    pub enable_en_nicknames: bool,
    pub enable_ru_nickname_expansion: bool,
    pub enable_spacy_ner_uk: bool,
    pub enable_spacy_ner_ru: bool,
    pub enable_spacy_ner_en: bool,
    pub enable_nameparser_en: bool,
    pub morphology_custom_rules_first: bool,
    pub morphology_cache_capacity: usize,
    pub dictionary_cache_capacity: usize,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            remove_stop_words: true,
            preserve_names: true,
            enable_advanced_features: true,
            ascii_fastpath: false,
            ru_yo_strategy: YoStrategy::Preserve,
            preserve_feminine_suffix_uk: true,
            strict_stopwords: false,
            enable_en_nicknames: false,
            enable_ru_nickname_expansion: false,
            enable_spacy_ner_uk: false,
            enable_spacy_ner_ru: false,
            enable_spacy_ner_en: false,
            enable_nameparser_en: true,
            morphology_custom_rules_first: false,
            morphology_cache_capacity: 8_192,
            dictionary_cache_capacity: 8_192,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Spec §4.4 decision-engine weights and thresholds; all config-driven,
/// defaults match the spec's shown values exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    pub w_smartfilter: f32,
    pub w_person: f32,
    pub w_org: f32,
    pub w_similarity: f32,

    pub w_search_exact: f32,
    pub thr_search_exact: f32,
    pub w_search_phrase: f32,
    pub thr_search_phrase: f32,
    pub w_search_ngram: f32,
    pub thr_search_ngram: f32,
    pub w_search_vector: f32,
    pub thr_search_vector: f32,

    pub bonus_search_exact_match: f32,
    pub thr_exact_match_bonus: f32,
    pub bonus_multiple_matches: f32,
    pub bonus_high_confidence_matches: f32,

    pub bonus_date_match: f32,
    pub bonus_id_match: f32,

    pub thr_high: f32,
    pub thr_medium: f32,

    pub require_tin_dob_gate: bool,
    pub thr_strong_name_match: f32,

    #[serde(default = "default_true")]
    pub enable_search: bool,
    #[serde(default = "default_true")]
    pub enable_vector_fallback: bool,
    pub debug_tracing: bool,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            w_smartfilter: 0.25,
            w_person: 0.30,
            w_org: 0.15,
            w_similarity: 0.25,

            w_search_exact: 0.40,
            thr_search_exact: 0.80,
            w_search_phrase: 0.25,
            thr_search_phrase: 0.70,
            w_search_ngram: 0.20,
            thr_search_ngram: 0.60,
            w_search_vector: 0.15,
            thr_search_vector: 0.50,

            bonus_search_exact_match: 0.20,
            thr_exact_match_bonus: 0.95,
            bonus_multiple_matches: 0.10,
            bonus_high_confidence_matches: 0.05,

            bonus_date_match: 0.07,
            bonus_id_match: 0.15,

            thr_high: 0.85,
            thr_medium: 0.50,

            require_tin_dob_gate: false,
            thr_strong_name_match: 0.80,

            enable_search: true,
            enable_vector_fallback: true,
            debug_tracing: false,
        }
    }
}

/// Spec §4.3 hybrid search escalation/rerank config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub ac_confidence_threshold: f32,
    pub vector_cosine_threshold: f32,
    pub dob_boost: f32,
    pub id_boost: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            ac_confidence_threshold: 0.6,
            vector_cosine_threshold: 0.45,
            dob_boost: 0.30,
            id_boost: 0.20,
        }
    }
}

/// Top-level, immutable-after-construction pipeline configuration (§5).
/// Held behind `Arc` and hot-reloaded by full replacement, never mutated
/// in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub normalization: NormalizationConfig,
    pub decision: DecisionConfig,
    pub search: SearchConfig,
    pub max_text_len: usize,
    pub max_latency_threshold_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            normalization: NormalizationConfig::default(),
            decision: DecisionConfig::default(),
            search: SearchConfig::default(),
            max_text_len: 10_000,
            max_latency_threshold_ms: 2_500,
        }
    }
}

impl PipelineConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}
