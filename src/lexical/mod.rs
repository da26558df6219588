//! Lexical (term-frequency) retrieval.
//!
//! The lexical side of the engine is an in-process Okapi BM25 index built
//! once over the fixed-granularity corpus at startup and immutable for the
//! process lifetime. Rebuilding it means full reconstruction from the
//! current metadata list.

pub mod bm25;

pub use bm25::{Bm25Index, Bm25Params};

/// Split text into tokens on whitespace.
///
/// No stemming, stopwording or case folding — a deliberate simplicity
/// tradeoff. Exact-case term matches are required for lexical recall, so
/// "Route" and "route" are distinct terms.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}
