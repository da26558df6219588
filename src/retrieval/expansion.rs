//! Neighbor-window context expansion.
//!
//! A retrieved chunk is often too narrow to ground generation on its own.
//! Expansion stitches in up to `window` preceding and `window` following
//! chunks from the same source document and granularity, joined with
//! paragraph breaks, and records the anchor chunk id and window size as
//! provenance.
//!
//! Expansion is best-effort and never fatal: unparseable ids and missing
//! neighbors degrade to the unexpanded candidate or a shorter window.

use ahash::AHashMap;
use tracing::debug;

use crate::candidate::Candidate;
use crate::chunk::{Chunk, id};

/// Build the `chunk_id -> chunk` lookup map for a metadata list.
///
/// Neighbor lookup through this map is O(1); building it is O(metadata).
/// Build it once per retrieval batch, never per candidate.
pub fn neighbor_map(metadata: &[Chunk]) -> AHashMap<&str, &Chunk> {
    metadata
        .iter()
        .map(|chunk| (chunk.chunk_id.as_str(), chunk))
        .collect()
}

/// Expand one candidate with its neighbor window.
///
/// The result's text is the concatenation of up to `2 * window + 1` chunk
/// texts from the same source and granularity, in ascending sequence order,
/// joined with `"\n\n"`. Neighbors whose sequence index is out of range or
/// whose id is absent from the map are silently skipped. If the candidate's
/// id cannot be decoded or its source is empty, the candidate is returned
/// unchanged.
pub fn expand_with_neighbors(
    candidate: &Candidate,
    by_id: &AHashMap<&str, &Chunk>,
    window: usize,
) -> Candidate {
    let Some((source, granularity, seq)) = id::decode(&candidate.chunk_id) else {
        return candidate.clone();
    };
    if candidate.source.is_empty() {
        return candidate.clone();
    }

    let mut parts: Vec<&str> = Vec::with_capacity(2 * window + 1);
    let first = seq.saturating_sub(window);
    for neighbor_seq in first..=seq + window {
        let neighbor_id = id::encode(source, granularity, neighbor_seq);
        if let Some(chunk) = by_id.get(neighbor_id.as_str())
            && !chunk.text.is_empty()
        {
            parts.push(chunk.text.as_str());
        }
    }

    if parts.is_empty() {
        return candidate.clone();
    }

    debug!(
        chunk_id = %candidate.chunk_id,
        window,
        stitched = parts.len(),
        "expanded candidate"
    );
    candidate.clone().expanded(parts.join("\n\n"), window)
}

/// Expand every candidate in a batch against `metadata`.
///
/// Builds the id lookup map once for the whole batch.
pub fn expand_all(candidates: &[Candidate], metadata: &[Chunk], window: usize) -> Vec<Candidate> {
    let by_id = neighbor_map(metadata);
    candidates
        .iter()
        .map(|candidate| expand_with_neighbors(candidate, &by_id, window))
        .collect()
}
