//! # Peregrine
//!
//! A hybrid retrieval and fusion engine for retrieval-augmented generation.
//!
//! Peregrine turns a natural-language query into a ranked, deduplicated,
//! context-expanded set of passages suitable for grounding generation:
//!
//! - Dense retrieval over inner-product vector indexes
//! - Lexical retrieval with Okapi BM25 scoring
//! - Score-normalizing fusion of both signals
//! - Neighbor-window context expansion
//! - A pluggable reranker boundary for pairwise relevance models
//!
//! Index construction, document ingestion and answer generation live outside
//! this crate; it consumes pre-built chunk metadata and a queryable vector
//! index handle.

pub mod candidate;
pub mod chunk;
pub mod embedding;
pub mod error;
pub mod lexical;
pub mod rerank;
pub mod retrieval;
pub mod vector;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
