//! Text embedding providers.
//!
//! The [`TextEmbedder`] trait is the boundary to the embedding model. The
//! vector index must be built with the same embedder that later embeds
//! queries, or similarity scores are meaningless.
//!
//! The crate ships two in-process implementations:
//! - [`HashingTextEmbedder`] — a deterministic feature-hashing bag-of-words
//!   embedder, useful for tests and fully offline setups.
//! - [`PrecomputedTextEmbedder`] — a fixed text-to-vector table for when
//!   vectors were computed externally.
//!
//! Real deployments implement the trait over a sentence-embedding model.

pub mod hashing;
pub mod precomputed;

pub use hashing::HashingTextEmbedder;
pub use precomputed::PrecomputedTextEmbedder;

use std::fmt::Debug;

use crate::error::Result;
use crate::vector::Vector;

/// A provider mapping text to fixed-dimension dense vectors.
///
/// Calls are synchronous and blocking; a failed embedding propagates as an
/// error to the caller, with no retries at this layer.
pub trait TextEmbedder: Send + Sync + Debug {
    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Vector>;

    /// Embed a batch of texts.
    ///
    /// The default implementation embeds one text at a time; model-backed
    /// implementations should override it with true batching.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        texts.iter().map(|text| self.embed(text)).collect()
    }

    /// The dimension of produced vectors.
    fn dimension(&self) -> usize;

    /// The name of this embedder.
    fn name(&self) -> &str;
}
