//! Pipeline orchestrator (spec §2, §5, §6, §7). Ties layers 1-9 together in
//! strict order, building the public request/response shapes and applying
//! the error-propagation policy: layer 1 failures are fatal, everything
//! from layer 2 onward degrades to a zero/low contribution rather than
//! aborting the screen.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::PipelineConfig;
use crate::embeddings::EmbeddingProvider;
use crate::error::{PipelineError, PipelineResult};
use crate::language::{self, LanguageDetection};
use crate::normalize;
use crate::search::{self, AcIndex, VectorIndex};
use crate::signals::{self, sanctioned_cache::SanctionedIdCache};
use crate::smart_filter::{self, SmartFilterResult};
use crate::types::{DecisionOutput, Language, NormalizationResult, SignalsResult};
use crate::{decision, unicode_norm, validation, variants};

#[derive(Debug, Clone, Deserialize)]
pub struct ScreenRequest {
    pub text: String,
    pub language_hint: Option<Language>,
    #[serde(default)]
    pub generate_variants: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScreenResponse {
    pub normalization: NormalizationResult,
    pub signals: SignalsResult,
    pub decision: DecisionOutput,
    pub variants: Vec<Vec<Vec<String>>>,
    pub processing_time_ms: u64,
    pub success: bool,
    pub errors: Vec<String>,
}

/// Everything the orchestrator needs beyond the per-request text: shared,
/// hot-reloadable state held behind `Arc` (spec §5), mirroring the way the
/// teacher wires its policy engine's snapshot state into the request path.
pub struct Pipeline {
    config: Arc<PipelineConfig>,
    sanctioned_ids: Arc<SanctionedIdCache>,
    ac_index: Arc<dyn AcIndex>,
    vector_index: Option<Arc<dyn VectorIndex>>,
    embeddings: Option<Arc<dyn EmbeddingProvider>>,
}

impl Pipeline {
    pub fn new(
        config: Arc<PipelineConfig>,
        sanctioned_ids: Arc<SanctionedIdCache>,
        ac_index: Arc<dyn AcIndex>,
        vector_index: Option<Arc<dyn VectorIndex>>,
        embeddings: Option<Arc<dyn EmbeddingProvider>>,
    ) -> Self {
        Self {
            config,
            sanctioned_ids,
            ac_index,
            vector_index,
            embeddings,
        }
    }

    pub fn reload_config(&mut self, config: PipelineConfig) {
        self.config = Arc::new(config);
    }

    #[instrument(skip(self, request), fields(text_len = request.text.len()))]
    pub async fn screen(&self, request: ScreenRequest) -> PipelineResult<ScreenResponse> {
        let start = Instant::now();
        let mut errors: Vec<String> = Vec::new();

        // Layer 1 — validation. The only layer whose failure is fatal (§7).
        let validated = validation::validate(&request.text, self.config.max_text_len)?;

        // Layer 2 — smart filter.
        let smart_filter: SmartFilterResult = smart_filter::screen(&validated);
        debug!(decision = ?smart_filter.decision, "smart filter result");

        // Layer 3 — language detection.
        let detection: LanguageDetection = language::detect(&validated, request.language_hint);
        if detection.confidence < 0.6 {
            errors.push("language_detection_low_confidence".to_string());
        }

        // Layer 4 — unicode normalization.
        let cleaned = unicode_norm::normalize(&validated, self.config.normalization.ru_yo_strategy);

        // Layer 5 — name normalization (CORE).
        let normalization = normalize::normalize(&cleaned, detection.language, &self.config.normalization);
        errors.extend(normalization.errors.iter().cloned());

        // Layer 6 — signals extraction (CORE).
        let signals_result = signals::extract(&cleaned, &normalization, &self.sanctioned_ids, &self.config);

        // Layer 7 — variants (optional).
        let mut variant_sets = Vec::new();
        if request.generate_variants {
            for person in &normalization.persons_core {
                variant_sets.push(variants::expand_person(person, detection.language));
            }
        }

        // Name-similarity proxy for layer 9: the normalization layer's own
        // confidence already reflects how cleanly the narrative resolved
        // into recognized person/org tokens.
        let name_similarity = normalization.confidence;

        // §4.3 hybrid search, only when smart filter did not skip.
        let search_candidates = if smart_filter.should_process && self.config.decision.enable_search {
            let query = if normalization.normalized.is_empty() {
                normalization.organizations_core.join(" ")
            } else {
                normalization.normalized.clone()
            };
            if query.is_empty() {
                Vec::new()
            } else {
                let dob_anchor = !signals_result.dates.birth.is_empty();
                let id_anchor = signals_result.numbers.values().flatten().any(|id| id.sanctioned);
                match search::hybrid_search(
                    &query,
                    self.ac_index.as_ref(),
                    self.vector_index.as_deref(),
                    self.embeddings.as_deref(),
                    &self.config.search,
                    dob_anchor,
                    id_anchor,
                )
                .await
                {
                    Ok(candidates) => candidates,
                    Err(err) => {
                        warn!(%err, "search unavailable, proceeding with zero contribution");
                        errors.push("search_unavailable".to_string());
                        Vec::new()
                    }
                }
            }
        } else {
            Vec::new()
        };

        // Layer 9 — decision engine (CORE).
        let decision_inputs = decision::DecisionInputs {
            smart_filter: &smart_filter,
            signals: &signals_result,
            name_similarity,
            search_candidates: &search_candidates,
        };
        let decision_output = decision::decide(&decision_inputs, &self.config.decision);

        Ok(ScreenResponse {
            normalization,
            signals: signals_result,
            decision: decision_output,
            variants: variant_sets,
            processing_time_ms: start.elapsed().as_millis() as u64,
            success: true,
            errors,
        })
    }
}

/// Convert an unrecoverable layer-1 failure into the all-layers-failed
/// response shape the HTTP front door returns on a 4xx (§7).
pub fn error_response(err: &PipelineError) -> ScreenResponse {
    ScreenResponse {
        normalization: NormalizationResult {
            normalized: String::new(),
            tokens: Vec::new(),
            trace: Vec::new(),
            persons_core: Vec::new(),
            organizations_core: Vec::new(),
            language: Language::En,
            confidence: 0.0,
            token_count: 0,
            processing_time_ms: 0,
            success: false,
            errors: vec![err.code().to_string()],
        },
        signals: SignalsResult {
            persons: Vec::new(),
            organizations: Vec::new(),
            numbers: Default::default(),
            dates: Default::default(),
            confidence: 0.0,
        },
        decision: DecisionOutput {
            risk: crate::types::Risk::Skip,
            score: 0.0,
            reasons: vec![err.code().to_string()],
            details: serde_json::json!({}),
            review_required: false,
            required_additional_fields: Vec::new(),
        },
        variants: Vec::new(),
        processing_time_ms: 0,
        success: false,
        errors: vec![err.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::InMemoryIndex;

    fn pipeline() -> Pipeline {
        let mut idx = InMemoryIndex::new();
        idx.insert("1", "Владимир Владимирович Путин", vec![0.0; 32]);
        Pipeline::new(
            Arc::new(PipelineConfig::default()),
            Arc::new(SanctionedIdCache::new()),
            Arc::new(idx),
            None,
            None,
        )
    }

    #[tokio::test]
    async fn screens_a_full_name_narrative_end_to_end() {
        let pipeline = pipeline();
        let request = ScreenRequest {
            text: "Владимир Владимирович Путин, перевод".to_string(),
            language_hint: Some(Language::Ru),
            generate_variants: false,
        };
        let response = pipeline.screen(request).await.unwrap();
        assert!(response.success);
        assert_eq!(response.normalization.normalized, "Владимир Владимирович Путин");
        assert!(response.decision.score > 0.0);
    }

    #[tokio::test]
    async fn empty_input_fails_validation() {
        let pipeline = pipeline();
        let request = ScreenRequest {
            text: "   ".to_string(),
            language_hint: None,
            generate_variants: false,
        };
        assert!(pipeline.screen(request).await.is_err());
    }

    #[tokio::test]
    async fn noise_only_text_is_skipped_by_smart_filter() {
        let pipeline = pipeline();
        let request = ScreenRequest {
            text: "качество хорошее спасибо большое".to_string(),
            language_hint: Some(Language::Ru),
            generate_variants: false,
        };
        let response = pipeline.screen(request).await.unwrap();
        assert_eq!(response.decision.risk, crate::types::Risk::Skip);
    }
}
