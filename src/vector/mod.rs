//! Dense vectors and the vector index read interface.

pub mod flat;

pub use flat::FlatVectorIndex;

use serde::{Deserialize, Serialize};

use crate::error::{PeregrineError, Result};

/// A dense vector representation for similarity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    /// The vector dimensions as floating point values.
    pub data: Vec<f32>,
}

impl Vector {
    /// Create a new vector with the given dimensions.
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    /// Get the dimensionality of this vector.
    pub fn dimension(&self) -> usize {
        self.data.len()
    }

    /// Calculate the L2 norm (magnitude) of this vector.
    pub fn norm(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    /// Normalize this vector to unit length. The zero vector is left as is.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for value in &mut self.data {
                *value /= norm;
            }
        }
    }

    /// Get a normalized copy of this vector.
    pub fn normalized(&self) -> Self {
        let mut normalized = self.clone();
        normalized.normalize();
        normalized
    }

    /// Inner product with another vector.
    ///
    /// On L2-normalized vectors this equals cosine similarity.
    pub fn dot(&self, other: &Vector) -> Result<f32> {
        if self.dimension() != other.dimension() {
            return Err(PeregrineError::InvalidOperation(format!(
                "vector dimensions must match: {} vs {}",
                self.dimension(),
                other.dimension()
            )));
        }
        Ok(self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(x, y)| x * y)
            .sum())
    }

    /// Check if this vector contains any NaN or infinite values.
    pub fn is_valid(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }
}

/// A single hit from a vector index search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorHit {
    /// Dense 0-based internal id, indexing the aligned metadata list.
    pub doc_id: usize,
    /// Similarity score, higher is more similar.
    pub score: f32,
}

/// Read interface of a nearest-neighbor index over pre-embedded vectors.
///
/// Implementations are read-only shared state: built once before query
/// serving, never mutated afterwards, and therefore safely shareable across
/// threads without locking.
pub trait VectorIndex: Send + Sync {
    /// Return the top-`k` stored vectors by descending inner product with
    /// `query`. The caller is responsible for normalizing `query`; stored
    /// vectors are expected to be pre-normalized at build time.
    fn search(&self, query: &Vector, k: usize) -> Result<Vec<VectorHit>>;

    /// Number of stored vectors.
    fn len(&self) -> usize;

    /// Check whether the index holds no vectors.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dimensionality of stored vectors.
    fn dimension(&self) -> usize;
}
