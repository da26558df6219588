//! Exact flat inner-product index.

use rayon::prelude::*;

use crate::error::{PeregrineError, Result};
use crate::vector::{Vector, VectorHit, VectorIndex};

/// Below this size a sequential scan beats the rayon fork/join overhead.
const PARALLEL_SCAN_THRESHOLD: usize = 1024;

/// An exact nearest-neighbor index scanning all stored vectors.
///
/// Vectors are L2-normalized on insertion, so the inner-product scores
/// returned by [`search`](VectorIndex::search) equal cosine similarity. The
/// insertion order defines the internal ids: the vector added `i`-th has
/// `doc_id == i`, which must line up with position `i` of the metadata list
/// it was built with.
#[derive(Debug, Clone, Default)]
pub struct FlatVectorIndex {
    dimension: usize,
    vectors: Vec<Vector>,
}

impl FlatVectorIndex {
    /// Create an empty index for vectors of `dimension`.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: Vec::new(),
        }
    }

    /// Add a vector, normalizing it to unit length.
    ///
    /// Returns the internal id assigned to the vector.
    pub fn add(&mut self, vector: Vector) -> Result<usize> {
        if vector.dimension() != self.dimension {
            return Err(PeregrineError::index(format!(
                "vector dimension mismatch: expected {}, got {}",
                self.dimension,
                vector.dimension()
            )));
        }
        if !vector.is_valid() {
            return Err(PeregrineError::index(
                "vector contains NaN or infinite values",
            ));
        }
        self.vectors.push(vector.normalized());
        Ok(self.vectors.len() - 1)
    }

    /// Build an index from a sequence of vectors.
    pub fn from_vectors(dimension: usize, vectors: Vec<Vector>) -> Result<Self> {
        let mut index = Self::new(dimension);
        for vector in vectors {
            index.add(vector)?;
        }
        Ok(index)
    }

    fn scores(&self, query: &Vector) -> Result<Vec<VectorHit>> {
        if self.vectors.len() >= PARALLEL_SCAN_THRESHOLD {
            self.vectors
                .par_iter()
                .enumerate()
                .map(|(doc_id, stored)| {
                    Ok(VectorHit {
                        doc_id,
                        score: query.dot(stored)?,
                    })
                })
                .collect()
        } else {
            self.vectors
                .iter()
                .enumerate()
                .map(|(doc_id, stored)| {
                    Ok(VectorHit {
                        doc_id,
                        score: query.dot(stored)?,
                    })
                })
                .collect()
        }
    }
}

impl VectorIndex for FlatVectorIndex {
    /// Exact top-`k` by descending inner product; ties break by ascending
    /// internal id, so results are deterministic for a fixed index.
    fn search(&self, query: &Vector, k: usize) -> Result<Vec<VectorHit>> {
        if self.vectors.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let mut hits = self.scores(query)?;
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.doc_id.cmp(&b.doc_id))
        });
        hits.truncate(k);
        Ok(hits)
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
