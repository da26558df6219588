//! The stage-scored candidate record flowing through the retrieval pipeline.
//!
//! A [`Candidate`] is a [`Chunk`] enriched with retrieval-time scores. Every
//! score field is an `Option`: `None` means "not yet computed by any stage",
//! never zero. Stages extend candidates with the consuming `with_*` builders
//! and produce new values rather than mutating shared records, so each stage
//! stays independently testable and no score leaks across stages.
//!
//! When serialized, absent stages are absent keys, matching the wire shape
//! consumers of the ranked passage list expect.

use serde::{Deserialize, Serialize};

use crate::chunk::Chunk;

/// A chunk enriched with retrieval-time scores.
///
/// Identity (`chunk_id`) is stable across the whole pipeline; score fields
/// are stage-local and must not be assumed present before the corresponding
/// stage has run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Identifier of the underlying chunk.
    pub chunk_id: String,
    /// The candidate's text. Context expansion replaces this with the
    /// stitched neighbor window.
    pub text: String,
    /// Identifier of the originating document.
    pub source: String,
    /// Title of the owning document.
    #[serde(default)]
    pub title: String,
    /// Category of the owning document.
    #[serde(default)]
    pub category: String,
    /// 0-based position in the stage's final ordering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
    /// Primary relevance score of the producing stage: raw dense similarity
    /// for dense retrieval, the fused score for hybrid retrieval.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    /// Raw dense similarity within fusion (zero-filled for chunks the dense
    /// pass did not return).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dense_score: Option<f32>,
    /// Raw lexical score (zero-filled within fusion, see above).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bm25_score: Option<f32>,
    /// Min-max normalized dense score over the fusion union.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dense_norm: Option<f32>,
    /// Min-max normalized lexical score over the fusion union.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bm25_norm: Option<f32>,
    /// Pairwise relevance score attached by a reranker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rerank_score: Option<f32>,
    /// Id of the anchor chunk this candidate was expanded from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded_from: Option<String>,
    /// Neighbor window size used for expansion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<usize>,
}

impl Candidate {
    /// Create a candidate from a chunk, with no scores attached yet.
    pub fn from_chunk(chunk: &Chunk) -> Self {
        Self {
            chunk_id: chunk.chunk_id.clone(),
            text: chunk.text.clone(),
            source: chunk.source.clone(),
            title: chunk.title.clone(),
            category: chunk.category.clone(),
            rank: None,
            score: None,
            dense_score: None,
            bm25_score: None,
            dense_norm: None,
            bm25_norm: None,
            rerank_score: None,
            expanded_from: None,
            window: None,
        }
    }

    /// Set the 0-based rank.
    pub fn with_rank(mut self, rank: usize) -> Self {
        self.rank = Some(rank);
        self
    }

    /// Set the stage's primary score.
    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }

    /// Set the raw dense similarity.
    pub fn with_dense_score(mut self, score: f32) -> Self {
        self.dense_score = Some(score);
        self
    }

    /// Set the raw lexical score.
    pub fn with_bm25_score(mut self, score: f32) -> Self {
        self.bm25_score = Some(score);
        self
    }

    /// Set both normalized signal scores.
    pub fn with_norms(mut self, dense_norm: f32, bm25_norm: f32) -> Self {
        self.dense_norm = Some(dense_norm);
        self.bm25_norm = Some(bm25_norm);
        self
    }

    /// Set the pairwise reranker score.
    pub fn with_rerank_score(mut self, score: f32) -> Self {
        self.rerank_score = Some(score);
        self
    }

    /// Replace the text with an expanded neighbor window, recording the
    /// anchor chunk id and window size as provenance.
    pub fn expanded(mut self, text: String, window: usize) -> Self {
        self.expanded_from = Some(self.chunk_id.clone());
        self.window = Some(window);
        self.text = text;
        self
    }
}
