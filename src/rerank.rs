//! The reranker boundary.
//!
//! Reranking refines a small candidate set with a query-aware pairwise
//! relevance model (typically a cross-encoder). The engine consumes the
//! [`Reranker`] trait as an opaque scoring oracle and does not implement a
//! relevance model itself; [`EmbeddingSimilarityReranker`] is a
//! deterministic stand-in so pipelines and tests can exercise the boundary
//! without model weights.

use std::sync::Arc;

use tracing::debug;

use crate::candidate::Candidate;
use crate::embedding::TextEmbedder;
use crate::error::Result;

/// A pairwise relevance model applied to a candidate list.
pub trait Reranker: Send + Sync {
    /// Score every candidate against `query`, attach the score as
    /// `rerank_score`, and return the top-`k` sorted descending.
    ///
    /// Implementations return fewer than `k` results when given fewer
    /// candidates; callers must tolerate that.
    fn rerank(&self, query: &str, candidates: Vec<Candidate>, k: usize) -> Result<Vec<Candidate>>;

    /// The name of this reranker.
    fn name(&self) -> &str;
}

/// Reranks by cosine similarity of query and candidate embeddings.
///
/// A bi-encoder stand-in for a true cross-encoder: deterministic, cheap, and
/// good enough to exercise the reranking stage. Production deployments
/// implement [`Reranker`] over a pairwise relevance model instead.
pub struct EmbeddingSimilarityReranker {
    embedder: Arc<dyn TextEmbedder>,
}

impl EmbeddingSimilarityReranker {
    /// Create a reranker scoring with `embedder`.
    ///
    /// The embedder does not need to be the one the index was built with;
    /// reranking only compares query and candidate text to each other.
    pub fn new(embedder: Arc<dyn TextEmbedder>) -> Self {
        Self { embedder }
    }
}

impl Reranker for EmbeddingSimilarityReranker {
    fn rerank(&self, query: &str, candidates: Vec<Candidate>, k: usize) -> Result<Vec<Candidate>> {
        let query_vector = self.embedder.embed(query)?.normalized();

        let mut scored = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let candidate_vector = self.embedder.embed(&candidate.text)?.normalized();
            let score = query_vector.dot(&candidate_vector)?;
            scored.push(candidate.with_rerank_score(score));
        }

        scored.sort_by(|a, b| {
            b.rerank_score
                .partial_cmp(&a.rerank_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);
        debug!(k, results = scored.len(), "reranked candidates");
        Ok(scored)
    }

    fn name(&self) -> &str {
        "EmbeddingSimilarityReranker"
    }
}
