//! The retrieval core: context object, retrievers, fusion, expansion and
//! strategy dispatch.
//!
//! All retrieval runs against a [`RetrievalContext`] constructed once at
//! process start and passed by reference into every call — never through
//! ambient globals — so tests can run against fake indexes. The context is
//! immutable after construction and safely shareable across threads; each
//! query produces its own [`Candidate`](crate::candidate::Candidate) values,
//! so no scoring state is shared between concurrent calls.

pub mod dense;
pub mod dispatch;
pub mod expansion;
pub mod fusion;
pub mod lexical;

pub use dense::retrieve_dense;
pub use dispatch::{Strategy, retrieve};
pub use expansion::{expand_all, expand_with_neighbors, neighbor_map};
pub use fusion::{HybridConfig, min_max_normalize, retrieve_hybrid};
pub use lexical::retrieve_bm25;

use std::sync::Arc;

use tracing::info;

use crate::chunk::{Chunk, Granularity};
use crate::embedding::TextEmbedder;
use crate::lexical::{Bm25Index, Bm25Params};
use crate::vector::VectorIndex;

/// A vector index paired with its aligned metadata list.
///
/// Position `i` of `metadata` corresponds exactly to the index's internal
/// id `i`. The two collections must be built together and stay length- and
/// order-aligned forever; this is a construction precondition, not a runtime
/// check — a divergence silently returns wrong text for a wrong score.
pub struct RetrievalIndex {
    /// The queryable vector index handle.
    pub index: Arc<dyn VectorIndex>,
    /// One chunk record per indexed vector, in internal-id order.
    pub metadata: Vec<Chunk>,
}

impl RetrievalIndex {
    /// Pair an index with its metadata list.
    pub fn new(index: Arc<dyn VectorIndex>, metadata: Vec<Chunk>) -> Self {
        Self { index, metadata }
    }
}

/// Process-lifetime retrieval state: the embedding provider, both
/// granularity indexes and the lexical index.
///
/// The BM25 index is built here, once, from the fixed-granularity metadata's
/// text — the lexical signal always scores the fixed corpus regardless of
/// which granularity the dense side queries.
pub struct RetrievalContext {
    embedder: Arc<dyn TextEmbedder>,
    fixed: RetrievalIndex,
    semantic: RetrievalIndex,
    bm25: Bm25Index,
}

impl RetrievalContext {
    /// Build a context from an embedder and the two index/metadata pairs.
    pub fn new(
        embedder: Arc<dyn TextEmbedder>,
        fixed: RetrievalIndex,
        semantic: RetrievalIndex,
    ) -> Self {
        Self::with_bm25_params(embedder, fixed, semantic, Bm25Params::default())
    }

    /// Build a context with explicit BM25 parameters.
    pub fn with_bm25_params(
        embedder: Arc<dyn TextEmbedder>,
        fixed: RetrievalIndex,
        semantic: RetrievalIndex,
        params: Bm25Params,
    ) -> Self {
        let bm25 = Bm25Index::build_with_params(
            fixed.metadata.iter().map(|chunk| chunk.text.as_str()),
            params,
        );
        info!(
            embedder = embedder.name(),
            fixed_chunks = fixed.metadata.len(),
            semantic_chunks = semantic.metadata.len(),
            "retrieval context initialized"
        );
        Self {
            embedder,
            fixed,
            semantic,
            bm25,
        }
    }

    /// The embedding provider.
    pub fn embedder(&self) -> &Arc<dyn TextEmbedder> {
        &self.embedder
    }

    /// The index/metadata pair for a granularity.
    pub fn index(&self, granularity: Granularity) -> &RetrievalIndex {
        match granularity {
            Granularity::Fixed => &self.fixed,
            Granularity::Semantic => &self.semantic,
        }
    }

    /// The fixed-granularity pair (the corpus the lexical signal scores).
    pub fn fixed(&self) -> &RetrievalIndex {
        &self.fixed
    }

    /// The lexical index.
    pub fn bm25(&self) -> &Bm25Index {
        &self.bm25
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    //! Shared fixtures for the retrieval unit tests.

    use super::*;
    use crate::chunk::id;
    use crate::embedding::HashingTextEmbedder;
    use crate::error::Result;
    use crate::vector::{FlatVectorIndex, Vector, VectorHit};

    /// A stub index returning fixed hits regardless of the query.
    #[derive(Debug)]
    pub struct StaticVectorIndex {
        pub hits: Vec<VectorHit>,
        pub size: usize,
    }

    impl VectorIndex for StaticVectorIndex {
        fn search(&self, _query: &Vector, k: usize) -> Result<Vec<VectorHit>> {
            Ok(self.hits.iter().take(k).copied().collect())
        }

        fn len(&self) -> usize {
            self.size
        }

        fn dimension(&self) -> usize {
            8
        }
    }

    pub fn chunk(source: &str, seq: usize, text: &str) -> Chunk {
        Chunk::new(
            id::encode(source, Granularity::Fixed, seq),
            source.to_string(),
            text.to_string(),
            source.to_string(),
            "docs".to_string(),
        )
    }

    /// A small two-source corpus behind real flat indexes.
    pub fn context() -> RetrievalContext {
        let chunks = vec![
            chunk("routing.rst", 0, "define a simple route with the Route attribute"),
            chunk("routing.rst", 1, "route parameters allow dynamic segments in a route"),
            chunk("doctrine.rst", 0, "doctrine maps entities to database tables"),
            chunk("doctrine.rst", 1, "repositories load entities from the database"),
        ];
        context_from(chunks)
    }

    /// Build a context over `chunks`, using the same records for both
    /// granularities.
    pub fn context_from(chunks: Vec<Chunk>) -> RetrievalContext {
        let embedder = Arc::new(HashingTextEmbedder::new(128));
        let build = |metadata: &[Chunk]| {
            let mut index = FlatVectorIndex::new(embedder.dimension());
            for chunk in metadata {
                index
                    .add(embedder.embed(&chunk.text).expect("embed chunk"))
                    .expect("add vector");
            }
            index
        };
        let fixed = RetrievalIndex::new(Arc::new(build(&chunks)), chunks.clone());
        let semantic = RetrievalIndex::new(Arc::new(build(&chunks)), chunks);
        RetrievalContext::new(embedder, fixed, semantic)
    }
}
