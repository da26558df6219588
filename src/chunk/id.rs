//! Encoding and decoding of chunk identifiers.
//!
//! Chunk ids follow the scheme `{source}_{suffix}_{seq}`, e.g.
//! `routing.rst_fixed_19` or `doctrine.rst_sem_3`. The sequence index is a
//! non-negative integer, contiguous per `(source, granularity)` pair, and is
//! assigned at chunk-build time. The scheme is a deliberate string encoding;
//! all parsing of it lives in this module so neighbor expansion and tests
//! never split ids ad hoc.
//!
//! Decoding splits from the right, so sources may themselves contain
//! underscores.

use crate::chunk::Granularity;

/// Encode a chunk identifier from its parts.
pub fn encode(source: &str, granularity: Granularity, seq: usize) -> String {
    format!("{source}_{}_{seq}", granularity.suffix())
}

/// Decode a chunk identifier into `(source, granularity, sequence index)`.
///
/// Returns `None` for anything that does not match the scheme: a missing
/// separator, a non-numeric trailing segment, an unknown granularity suffix,
/// or an empty source.
pub fn decode(chunk_id: &str) -> Option<(&str, Granularity, usize)> {
    let (rest, seq) = chunk_id.rsplit_once('_')?;
    let seq: usize = seq.parse().ok()?;
    let (source, suffix) = rest.rsplit_once('_')?;
    let granularity = Granularity::from_suffix(suffix)?;
    if source.is_empty() {
        return None;
    }
    Some((source, granularity, seq))
}

/// Extract only the trailing sequence index from a chunk identifier.
pub fn sequence(chunk_id: &str) -> Option<usize> {
    decode(chunk_id).map(|(_, _, seq)| seq)
}
