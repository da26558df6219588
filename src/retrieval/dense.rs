//! Dense retrieval over a vector index.

use tracing::debug;

use crate::candidate::Candidate;
use crate::chunk::Granularity;
use crate::error::Result;
use crate::retrieval::RetrievalContext;

/// Retrieve the top-`k` chunks by dense similarity on the named granularity.
///
/// The query is embedded with the context's embedder and L2-normalized;
/// since indexed vectors are pre-normalized, the returned inner-product
/// scores equal cosine similarity. Results carry their raw similarity in
/// `score` and a 0-based `rank`.
///
/// An empty query is allowed: it embeds like any other string (the hashing
/// embedder maps it to the zero vector, which scores 0 everywhere).
pub fn retrieve_dense(
    ctx: &RetrievalContext,
    query: &str,
    k: usize,
    granularity: Granularity,
) -> Result<Vec<Candidate>> {
    let pair = ctx.index(granularity);
    let mut query_vector = ctx.embedder().embed(query)?;
    query_vector.normalize();

    let hits = pair.index.search(&query_vector, k)?;
    debug!(
        granularity = %granularity,
        k,
        hits = hits.len(),
        "dense retrieval"
    );

    Ok(hits
        .iter()
        .enumerate()
        .map(|(rank, hit)| {
            // Alignment precondition: hit.doc_id indexes the metadata list.
            let chunk = &pair.metadata[hit.doc_id];
            Candidate::from_chunk(chunk)
                .with_score(hit.score)
                .with_rank(rank)
        })
        .collect())
}
