//! §4.3 — hybrid search candidate contract. Tiered AC (exact/phrase/n-gram)
//! lookup with vector-search escalation and a fuzzy rerank pass, grounded on
//! the tiered-candidate/strict-high-confidence design in the pack's
//! `aegistry` matching-core reference (`other_examples/`), generalized to
//! the trait-seam style the teacher uses for its connector boundaries.

use std::collections::HashMap;

use serde_json::json;
use strsim::jaro_winkler;

use crate::config::SearchConfig;
use crate::embeddings::{cosine_similarity, EmbeddingProvider};
use crate::error::PipelineResult;
use crate::types::{CandidateTrace, SearchCandidate, Tier};

/// Exact/phrase/n-gram lookup against a sanctions-name index. A single
/// trait covering all three AC tiers: the concrete index decides which
/// tier a hit belongs to (it knows whether the match was exact, a phrase
/// subset, or an n-gram overlap) and tags the returned candidate
/// accordingly.
pub trait AcIndex: Send + Sync {
    fn search(&self, normalized_query: &str) -> Vec<SearchCandidate>;
}

/// Vector index searched only when the AC pass comes back empty or weak
/// (§4.3 "AC→vector escalation") and `enable_vector_fallback` is set.
pub trait VectorIndex: Send + Sync {
    fn search(&self, vector: &[f32], top_k: usize) -> Vec<SearchCandidate>;
}

/// In-memory reference implementation of both indexes, keyed by normalized
/// name. Exists so the pipeline and its tests have something to run against
/// without a real search backend; production deployments swap in a real
/// `AcIndex`/`VectorIndex` behind the same traits.
pub struct InMemoryIndex {
    entries: HashMap<String, (String, Vec<f32>)>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>, vector: Vec<f32>) {
        let name = name.into();
        self.entries.insert(id.into(), (name, vector));
    }
}

impl Default for InMemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl AcIndex for InMemoryIndex {
    fn search(&self, normalized_query: &str) -> Vec<SearchCandidate> {
        let query_lower = normalized_query.to_lowercase();
        let mut out = Vec::new();
        for (id, (name, _)) in &self.entries {
            let name_lower = name.to_lowercase();
            let (tier, score) = if name_lower == query_lower {
                (Tier::T0, 1.0)
            } else if name_lower.contains(&query_lower) || query_lower.contains(&name_lower) {
                (Tier::T1, 0.75)
            } else {
                let sim = jaro_winkler(&name_lower, &query_lower) as f32;
                if sim >= 0.6 {
                    (Tier::T2, sim)
                } else {
                    continue;
                }
            };
            out.push(SearchCandidate {
                id: id.clone(),
                name: name.clone(),
                tier,
                score,
                meta: json!({}),
                trace: Some(CandidateTrace {
                    reason: Some(format!("{tier:?}")),
                    cosine: None,
                    fuzz: Some(score),
                    anchors: Vec::new(),
                }),
            });
        }
        out
    }
}

impl VectorIndex for InMemoryIndex {
    fn search(&self, vector: &[f32], top_k: usize) -> Vec<SearchCandidate> {
        let mut scored: Vec<SearchCandidate> = self
            .entries
            .iter()
            .map(|(id, (name, v))| {
                let cosine = cosine_similarity(vector, v);
                SearchCandidate {
                    id: id.clone(),
                    name: name.clone(),
                    tier: Tier::T3,
                    score: cosine,
                    meta: json!({}),
                    trace: Some(CandidateTrace {
                        reason: Some("vector".to_string()),
                        cosine: Some(cosine),
                        fuzz: None,
                        anchors: Vec::new(),
                    }),
                }
            })
            .collect();
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        scored
    }
}

/// Run the full hybrid search contract: AC tiers first, escalate to vector
/// search when AC is weak, then a fuzzy rerank pass, then optional DOB/ID
/// anchor boosts. Returns candidates sorted by final score, descending.
pub async fn hybrid_search(
    query: &str,
    ac: &dyn AcIndex,
    vector_index: Option<&dyn VectorIndex>,
    embeddings: Option<&dyn EmbeddingProvider>,
    config: &SearchConfig,
    dob_anchor: bool,
    id_anchor: bool,
) -> PipelineResult<Vec<SearchCandidate>> {
    let mut candidates = ac.search(query);

    let ac_is_weak = candidates.is_empty()
        || candidates
            .iter()
            .all(|c| c.score < config.ac_confidence_threshold);

    if ac_is_weak {
        if let (Some(vindex), Some(provider)) = (vector_index, embeddings) {
            let vector = provider.encode_one(query).await?;
            let vector_hits: Vec<SearchCandidate> = vindex
                .search(&vector, 10)
                .into_iter()
                .filter(|c| c.score >= config.vector_cosine_threshold)
                .collect();
            candidates.extend(vector_hits);
        }
    }

    rerank(&mut candidates, query, config, dob_anchor, id_anchor);
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    Ok(candidates)
}

/// Fuzzy rerank: blend each candidate's tier score with a direct
/// `jaro_winkler` string-similarity term, then apply DOB/ID anchor boosts
/// when the caller has corroborating signals (§4.3 "a matching DOB or ID
/// raises confidence in an otherwise marginal name match").
fn rerank(
    candidates: &mut [SearchCandidate],
    query: &str,
    config: &SearchConfig,
    dob_anchor: bool,
    id_anchor: bool,
) {
    let query_lower = query.to_lowercase();
    for c in candidates.iter_mut() {
        let fuzz = jaro_winkler(&c.name.to_lowercase(), &query_lower) as f32;
        c.score = (c.score * 0.7 + fuzz * 0.3).min(1.0);
        if let Some(trace) = c.trace.as_mut() {
            trace.fuzz = Some(fuzz);
        }
        if dob_anchor {
            c.score = (c.score + config.dob_boost).min(1.0);
            if let Some(trace) = c.trace.as_mut() {
                trace.anchors.push("dob".to_string());
            }
        }
        if id_anchor {
            c.score = (c.score + config.id_boost).min(1.0);
            if let Some(trace) = c.trace.as_mut() {
                trace.anchors.push("id".to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::MockEmbeddingProvider;

    fn index() -> InMemoryIndex {
        let mut idx = InMemoryIndex::new();
        idx.insert("1", "Иван Петров", vec![0.1; 32]);
        idx.insert("2", "Unrelated Entity", vec![0.9; 32]);
        idx
    }

    #[tokio::test]
    async fn exact_match_is_tier_t0_and_high_confidence() {
        let idx = index();
        let cfg = SearchConfig::default();
        let results = hybrid_search("Иван Петров", &idx, None, None, &cfg, false, false)
            .await
            .unwrap();
        let top = &results[0];
        assert_eq!(top.tier, Tier::T0);
        assert!(top.is_high_confidence());
    }

    #[tokio::test]
    async fn tier_t2_is_never_high_confidence_even_at_high_score() {
        let candidate = SearchCandidate {
            id: "x".into(),
            name: "x".into(),
            tier: Tier::T2,
            score: 0.99,
            meta: json!({}),
            trace: None,
        };
        assert!(!candidate.is_high_confidence());
    }

    #[tokio::test]
    async fn dob_anchor_boosts_score() {
        let idx = index();
        let cfg = SearchConfig::default();
        let provider = MockEmbeddingProvider;
        let without = hybrid_search("Ivan Petrov", &idx, Some(&idx), Some(&provider), &cfg, false, false)
            .await
            .unwrap();
        let with = hybrid_search("Ivan Petrov", &idx, Some(&idx), Some(&provider), &cfg, true, false)
            .await
            .unwrap();
        assert!(with[0].score >= without[0].score);
    }
}
