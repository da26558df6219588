//! Fusion of dense and lexical retrieval signals.
//!
//! Cosine similarity lives in a bounded range while BM25 scores are
//! unbounded and corpus-size-dependent, so raw scores from the two signals
//! are not comparable. Fusion min-max normalizes each signal per call over
//! the union candidate set, then blends them with a configurable weight.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::candidate::Candidate;
use crate::chunk::{Chunk, Granularity};
use crate::error::{PeregrineError, Result};
use crate::retrieval::{RetrievalContext, retrieve_dense};

/// Configuration for hybrid retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridConfig {
    /// Number of fused results to return.
    pub k: usize,
    /// Number of dense candidates to retrieve before fusion.
    pub k_dense: usize,
    /// Number of lexical candidates to keep before fusion.
    pub k_bm25: usize,
    /// Weight of the dense signal, in `[0, 1]`; the lexical signal gets
    /// `1 - alpha`.
    pub alpha: f32,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            k: 5,
            k_dense: 20,
            k_bm25: 20,
            alpha: 0.7,
        }
    }
}

impl HybridConfig {
    /// Default configuration returning `k` fused results.
    pub fn with_k(k: usize) -> Self {
        Self {
            k,
            ..Self::default()
        }
    }
}

/// Min-max normalize `values` to `[0, 1]`.
///
/// The minimum maps to 0 and the maximum to 1. If all values are equal the
/// output is all-zero: the signal carries no discriminative information, and
/// zero also avoids the divide-by-zero.
pub fn min_max_normalize(values: &[f32]) -> Vec<f32> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };
    let (min, max) = values
        .iter()
        .fold((first, first), |(min, max), &v| (min.min(v), max.max(v)));
    if max == min {
        return vec![0.0; values.len()];
    }
    values.iter().map(|&v| (v - min) / (max - min)).collect()
}

/// Retrieve top-`k` chunks by fused dense + lexical score.
///
/// The dense pass retrieves `k_dense` candidates on the fixed granularity.
/// The lexical pass scores the *entire* fixed corpus, then keeps the top
/// `k_bm25` — full-corpus scoring is required for normalization correctness,
/// and is a known scalability cliff for large corpora. The union of both
/// candidate sets is scored: a chunk missing from one signal contributes a
/// raw 0.0 for that signal rather than being excluded. Each signal is
/// min-max normalized over the union, then blended as
/// `alpha * dense_norm + (1 - alpha) * bm25_norm`.
///
/// Returns an empty sequence (not an error) when both passes come back
/// empty. `alpha` outside `[0, 1]` is an invalid-argument error.
pub fn retrieve_hybrid(
    ctx: &RetrievalContext,
    query: &str,
    config: &HybridConfig,
) -> Result<Vec<Candidate>> {
    if !(0.0..=1.0).contains(&config.alpha) {
        return Err(PeregrineError::invalid_argument(format!(
            "alpha must be in [0, 1], got {}",
            config.alpha
        )));
    }

    let dense = retrieve_dense(ctx, query, config.k_dense, Granularity::Fixed)?;

    let bm25_all = ctx.bm25().scores(query);
    let mut bm25_order: Vec<usize> = (0..bm25_all.len()).collect();
    bm25_order.sort_by(|&a, &b| {
        bm25_all[b]
            .partial_cmp(&bm25_all[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    bm25_order.truncate(config.k_bm25);

    let metadata = &ctx.fixed().metadata;
    let dense_map: AHashMap<&str, f32> = dense
        .iter()
        .map(|c| (c.chunk_id.as_str(), c.score.unwrap_or(0.0)))
        .collect();
    let bm25_map: AHashMap<&str, f32> = bm25_order
        .iter()
        .map(|&doc_id| (metadata[doc_id].chunk_id.as_str(), bm25_all[doc_id]))
        .collect();

    // Union of both candidate sets, in deterministic order (dense ranking
    // first, then lexical-only hits) so equal fused scores tie-break stably.
    let mut union: Vec<&str> = Vec::with_capacity(dense_map.len() + bm25_map.len());
    let mut seen: AHashSet<&str> = AHashSet::new();
    for candidate in &dense {
        if seen.insert(candidate.chunk_id.as_str()) {
            union.push(candidate.chunk_id.as_str());
        }
    }
    for &doc_id in &bm25_order {
        let chunk_id = metadata[doc_id].chunk_id.as_str();
        if seen.insert(chunk_id) {
            union.push(chunk_id);
        }
    }

    let meta_by_id: AHashMap<&str, &Chunk> = metadata
        .iter()
        .map(|chunk| (chunk.chunk_id.as_str(), chunk))
        .collect();

    // Stage 1: the union pool with raw scores, zero-filling the missing
    // signal.
    let pool: Vec<Candidate> = union
        .iter()
        .filter_map(|chunk_id| meta_by_id.get(chunk_id).copied())
        .map(|chunk| {
            Candidate::from_chunk(chunk)
                .with_dense_score(dense_map.get(chunk.chunk_id.as_str()).copied().unwrap_or(0.0))
                .with_bm25_score(bm25_map.get(chunk.chunk_id.as_str()).copied().unwrap_or(0.0))
        })
        .collect();

    if pool.is_empty() {
        return Ok(Vec::new());
    }

    // Stage 2: per-signal normalization over the union, then the blend.
    let dense_raw: Vec<f32> = pool.iter().map(|c| c.dense_score.unwrap_or(0.0)).collect();
    let bm25_raw: Vec<f32> = pool.iter().map(|c| c.bm25_score.unwrap_or(0.0)).collect();
    let dense_norm = min_max_normalize(&dense_raw);
    let bm25_norm = min_max_normalize(&bm25_raw);

    let mut fused: Vec<Candidate> = pool
        .into_iter()
        .zip(dense_norm.iter().zip(bm25_norm.iter()))
        .map(|(candidate, (&dn, &bn))| {
            candidate
                .with_norms(dn, bn)
                .with_score(config.alpha * dn + (1.0 - config.alpha) * bn)
        })
        .collect();

    // Stage 3: final ordering, truncation and rank assignment.
    fused.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    fused.truncate(config.k);
    let fused: Vec<Candidate> = fused
        .into_iter()
        .enumerate()
        .map(|(rank, candidate)| candidate.with_rank(rank))
        .collect();

    debug!(
        k = config.k,
        alpha = config.alpha,
        dense = dense.len(),
        results = fused.len(),
        "hybrid retrieval"
    );
    Ok(fused)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::embedding::HashingTextEmbedder;
    use crate::retrieval::testutil::{StaticVectorIndex, chunk, context, context_from};
    use crate::retrieval::{RetrievalContext, RetrievalIndex};
    use crate::vector::{FlatVectorIndex, VectorHit};

    /// Context whose dense signal is fully controlled by a stub index.
    fn stubbed_context(hits: Vec<VectorHit>) -> RetrievalContext {
        let chunks = vec![
            chunk("alpha.rst", 0, "alpha filler words here"),
            chunk("query.rst", 0, "query terms match this document"),
            chunk("other.rst", 0, "unrelated content entirely different"),
        ];
        let size = chunks.len();
        let embedder = Arc::new(HashingTextEmbedder::new(8));
        let fixed = RetrievalIndex::new(Arc::new(StaticVectorIndex { hits, size }), chunks.clone());
        let semantic = RetrievalIndex::new(Arc::new(FlatVectorIndex::new(8)), Vec::new());
        RetrievalContext::new(embedder, fixed, semantic)
    }

    #[test]
    fn test_min_max_normalize_bounds() {
        let normalized = min_max_normalize(&[2.0, 8.0, 5.0]);
        assert_eq!(normalized, vec![0.0, 1.0, 0.5]);
        assert!(normalized.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_min_max_normalize_all_equal_is_zero() {
        assert_eq!(min_max_normalize(&[3.0, 3.0, 3.0]), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_min_max_normalize_empty() {
        assert!(min_max_normalize(&[]).is_empty());
    }

    #[test]
    fn test_min_max_normalize_negative_values() {
        let normalized = min_max_normalize(&[-1.0, 1.0]);
        assert_eq!(normalized, vec![0.0, 1.0]);
    }

    #[test]
    fn test_hybrid_rejects_alpha_out_of_range() {
        let ctx = context();
        let mut config = HybridConfig::default();
        config.alpha = 1.5;
        assert!(retrieve_hybrid(&ctx, "route", &config).is_err());
        config.alpha = -0.1;
        assert!(retrieve_hybrid(&ctx, "route", &config).is_err());
    }

    #[test]
    fn test_hybrid_fused_scores_bounded() {
        let ctx = context();
        let results = retrieve_hybrid(&ctx, "route parameters", &HybridConfig::default()).unwrap();
        assert!(!results.is_empty());
        for candidate in &results {
            let score = candidate.score.unwrap();
            assert!((0.0..=1.0).contains(&score));
            assert!((0.0..=1.0).contains(&candidate.dense_norm.unwrap()));
            assert!((0.0..=1.0).contains(&candidate.bm25_norm.unwrap()));
        }
    }

    #[test]
    fn test_hybrid_rank_contiguity_and_order() {
        let ctx = context();
        let results = retrieve_hybrid(&ctx, "route", &HybridConfig::default()).unwrap();
        for (position, candidate) in results.iter().enumerate() {
            assert_eq!(candidate.rank, Some(position));
        }
        for pair in results.windows(2) {
            assert!(pair[0].score.unwrap() >= pair[1].score.unwrap());
        }
    }

    #[test]
    fn test_hybrid_union_completeness() {
        let ctx = context();
        // k large enough that nothing is truncated: the pool must contain
        // every chunk either signal surfaced.
        let config = HybridConfig {
            k: 100,
            k_dense: 2,
            k_bm25: 2,
            alpha: 0.7,
        };
        let results = retrieve_hybrid(&ctx, "define a simple route", &config).unwrap();

        let dense = retrieve_dense(&ctx, "define a simple route", 2, Granularity::Fixed).unwrap();
        let returned: Vec<&str> = results.iter().map(|c| c.chunk_id.as_str()).collect();
        for candidate in &dense {
            assert!(returned.contains(&candidate.chunk_id.as_str()));
        }
        for &(doc_id, _) in &ctx.bm25().search("define a simple route", 2) {
            let chunk_id = ctx.fixed().metadata[doc_id].chunk_id.as_str();
            assert!(returned.contains(&chunk_id));
        }
    }

    #[test]
    fn test_hybrid_zero_fills_missing_signal() {
        // Dense returns only doc 0; doc 1 surfaces through BM25 alone.
        let ctx = stubbed_context(vec![VectorHit {
            doc_id: 0,
            score: 0.9,
        }]);
        let config = HybridConfig {
            k: 10,
            k_dense: 1,
            k_bm25: 10,
            alpha: 0.5,
        };
        let results = retrieve_hybrid(&ctx, "query terms match", &config).unwrap();

        let lexical_only = results
            .iter()
            .find(|c| c.chunk_id == "query.rst_fixed_0")
            .expect("bm25-only candidate must be in the pool");
        assert_eq!(lexical_only.dense_score, Some(0.0));
        assert!(lexical_only.bm25_score.unwrap() > 0.0);
    }

    #[test]
    fn test_hybrid_alpha_flips_ranking_at_crossover() {
        let hits = vec![
            VectorHit {
                doc_id: 0,
                score: 0.9,
            },
            VectorHit {
                doc_id: 1,
                score: 0.1,
            },
        ];
        // Dense prefers alpha.rst, lexical prefers query.rst.
        let favor_dense = HybridConfig {
            k: 3,
            k_dense: 2,
            k_bm25: 3,
            alpha: 0.9,
        };
        let ctx = stubbed_context(hits);
        let results = retrieve_hybrid(&ctx, "query terms match", &favor_dense).unwrap();
        assert_eq!(results[0].chunk_id, "alpha.rst_fixed_0");

        let favor_lexical = HybridConfig {
            alpha: 0.1,
            ..favor_dense
        };
        let results = retrieve_hybrid(&ctx, "query terms match", &favor_lexical).unwrap();
        assert_eq!(results[0].chunk_id, "query.rst_fixed_0");
    }

    #[test]
    fn test_hybrid_empty_corpus_returns_empty() {
        let ctx = context_from(Vec::new());
        let results = retrieve_hybrid(&ctx, "anything", &HybridConfig::default()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_hybrid_truncates_to_k() {
        let ctx = context();
        let config = HybridConfig::with_k(2);
        let results = retrieve_hybrid(&ctx, "route database", &config).unwrap();
        assert_eq!(results.len(), 2);
    }
}
