//! Deterministic feature-hashing text embedder.

use std::hash::BuildHasher;

use ahash::RandomState;

use crate::embedding::TextEmbedder;
use crate::error::Result;
use crate::vector::Vector;

/// Fixed hasher seeds so embeddings are stable across processes. An index
/// built in one process must score identically against queries embedded in
/// another.
const HASH_SEEDS: (u64, u64, u64, u64) = (
    0x9e37_79b9_7f4a_7c15,
    0x2545_f491_4f6c_dd1d,
    0x6a09_e667_f3bc_c908,
    0xbb67_ae85_84ca_a73b,
);

/// A deterministic bag-of-words embedder using the hashing trick.
///
/// Each lowercased whitespace token is hashed into one of `dimension`
/// buckets; the resulting count vector is L2-normalized. Two texts sharing
/// many tokens therefore get a high inner product, which makes this embedder
/// a usable stand-in for a sentence-embedding model in tests and fully
/// offline setups. It captures no word order and no semantics.
#[derive(Debug, Clone)]
pub struct HashingTextEmbedder {
    dimension: usize,
    hasher: RandomState,
}

impl HashingTextEmbedder {
    /// Create a new hashing embedder producing vectors of `dimension`.
    pub fn new(dimension: usize) -> Self {
        let (k0, k1, k2, k3) = HASH_SEEDS;
        Self {
            dimension,
            hasher: RandomState::with_seeds(k0, k1, k2, k3),
        }
    }
}

impl Default for HashingTextEmbedder {
    fn default() -> Self {
        Self::new(256)
    }
}

impl TextEmbedder for HashingTextEmbedder {
    /// Embed `text` as a normalized hashed bag of words.
    ///
    /// Text with no tokens (the empty string, all whitespace) embeds to the
    /// zero vector, which scores 0 against every indexed vector.
    fn embed(&self, text: &str) -> Result<Vector> {
        let mut data = vec![0.0f32; self.dimension];
        for token in text.split_whitespace() {
            let bucket = self.hasher.hash_one(token.to_lowercase()) as usize % self.dimension;
            data[bucket] += 1.0;
        }
        let mut vector = Vector::new(data);
        vector.normalize();
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "HashingTextEmbedder"
    }
}
