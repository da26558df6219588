//! Lexical retrieval over the fixed-granularity corpus.

use tracing::debug;

use crate::candidate::Candidate;
use crate::error::Result;
use crate::retrieval::RetrievalContext;

/// Retrieve the top-`k` chunks by BM25 score.
///
/// Lexical scoring always runs over the fixed-granularity corpus. Results
/// carry their raw lexical score in `bm25_score` and a 0-based `rank`; equal
/// scores keep corpus order.
pub fn retrieve_bm25(ctx: &RetrievalContext, query: &str, k: usize) -> Result<Vec<Candidate>> {
    let hits = ctx.bm25().search(query, k);
    debug!(k, hits = hits.len(), "lexical retrieval");

    Ok(hits
        .iter()
        .enumerate()
        .map(|(rank, &(doc_id, score))| {
            let chunk = &ctx.fixed().metadata[doc_id];
            Candidate::from_chunk(chunk)
                .with_bm25_score(score)
                .with_rank(rank)
        })
        .collect())
}
