//! Embedder backed by a fixed table of pre-computed vectors.

use ahash::AHashMap;

use crate::embedding::TextEmbedder;
use crate::error::{PeregrineError, Result};
use crate::vector::Vector;

/// An embedder that looks texts up in a fixed table.
///
/// Useful when vectors were computed externally before indexing, and in
/// tests that need exact control over similarities. Embedding a text that is
/// not in the table is an error.
#[derive(Debug, Clone)]
pub struct PrecomputedTextEmbedder {
    dimension: usize,
    table: AHashMap<String, Vector>,
}

impl PrecomputedTextEmbedder {
    /// Create an empty table for vectors of `dimension`.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            table: AHashMap::new(),
        }
    }

    /// Register the vector for a text.
    pub fn insert<S: Into<String>>(&mut self, text: S, vector: Vector) -> Result<()> {
        if vector.dimension() != self.dimension {
            return Err(PeregrineError::invalid_argument(format!(
                "vector dimension mismatch: expected {}, got {}",
                self.dimension,
                vector.dimension()
            )));
        }
        self.table.insert(text.into(), vector);
        Ok(())
    }

    /// Number of registered texts.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Check whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl TextEmbedder for PrecomputedTextEmbedder {
    fn embed(&self, text: &str) -> Result<Vector> {
        self.table.get(text).cloned().ok_or_else(|| {
            PeregrineError::embedding(format!("no precomputed vector for text: {text:?}"))
        })
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "PrecomputedTextEmbedder"
    }
}
