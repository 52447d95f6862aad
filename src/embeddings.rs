//! Layer 8 — embedding adapter (spec §4.6, optional, off by default).
//!
//! A trait seam so the pipeline never depends on a concrete model; the
//! `async fn` boundary is the one genuine suspension point §5 calls out
//! ("async suspension points only at embedding/search/NER boundaries").
//! The mock implementation is deterministic so pipeline tests never flake
//! on it, mirroring the way the teacher's connector traits ship an
//! in-memory stub alongside the live client.

use async_trait::async_trait;

use crate::error::{PipelineError, PipelineResult};

pub const EMBEDDING_DIM: usize = 32;

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn encode_one(&self, text: &str) -> PipelineResult<Vec<f32>>;
}

/// Deterministic hash-bucket embedding: no model weights, stable across
/// runs, good enough to exercise layer-9's cosine-similarity bonus path in
/// tests without a network dependency.
pub struct MockEmbeddingProvider;

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn encode_one(&self, text: &str) -> PipelineResult<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(PipelineError::EmbeddingUnavailable(
                "empty input".to_string(),
            ));
        }
        let mut vector = vec![0.0f32; EMBEDDING_DIM];
        for (i, byte) in text.bytes().enumerate() {
            let bucket = (byte as usize + i) % EMBEDDING_DIM;
            vector[bucket] += 1.0;
        }
        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in vector.iter_mut() {
                *v /= norm;
            }
        }
        Ok(vector)
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_text_yields_identical_vectors() {
        let provider = MockEmbeddingProvider;
        let a = provider.encode_one("Иван Петров").await.unwrap();
        let b = provider.encode_one("Иван Петров").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn empty_input_is_rejected() {
        let provider = MockEmbeddingProvider;
        assert!(provider.encode_one("").await.is_err());
    }

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }
}
