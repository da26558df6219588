//! Strategy dispatch over the closed set of retrieval modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::candidate::Candidate;
use crate::chunk::Granularity;
use crate::error::{PeregrineError, Result};
use crate::retrieval::{
    HybridConfig, RetrievalContext, expand_all, retrieve_bm25, retrieve_dense, retrieve_hybrid,
};

/// A retrieval strategy.
///
/// The set is closed: an unknown strategy name is a configuration mistake
/// and fails at parse time, not something retrieval recovers from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Dense retrieval on the fixed-width granularity.
    Fixed,
    /// Dense retrieval on the paragraph-aware granularity.
    Semantic,
    /// Lexical retrieval only.
    Bm25,
    /// Score-normalizing fusion of dense and lexical signals.
    Hybrid,
    /// Hybrid retrieval with neighbor-window context expansion.
    ParentChild,
}

impl Strategy {
    /// All strategies, in dispatch order.
    pub const ALL: [Strategy; 5] = [
        Strategy::Fixed,
        Strategy::Semantic,
        Strategy::Bm25,
        Strategy::Hybrid,
        Strategy::ParentChild,
    ];

    /// The external name of this strategy.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Fixed => "fixed",
            Strategy::Semantic => "semantic",
            Strategy::Bm25 => "bm25",
            Strategy::Hybrid => "hybrid",
            Strategy::ParentChild => "parent_child",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Strategy {
    type Err = PeregrineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fixed" => Ok(Strategy::Fixed),
            "semantic" => Ok(Strategy::Semantic),
            "bm25" => Ok(Strategy::Bm25),
            "hybrid" => Ok(Strategy::Hybrid),
            "parent_child" => Ok(Strategy::ParentChild),
            _ => Err(PeregrineError::invalid_argument(format!(
                "unknown strategy: {s}"
            ))),
        }
    }
}

/// Run one retrieval query with the named strategy.
///
/// `window` only applies to [`Strategy::ParentChild`], where each fused
/// candidate is expanded with its neighbor window over the fixed metadata.
/// Hybrid strategies use [`HybridConfig`] defaults with `k` overridden; use
/// [`retrieve_hybrid`] directly for full control.
pub fn retrieve(
    ctx: &RetrievalContext,
    query: &str,
    k: usize,
    strategy: Strategy,
    window: usize,
) -> Result<Vec<Candidate>> {
    debug!(%strategy, k, "dispatching retrieval");
    match strategy {
        Strategy::Fixed => retrieve_dense(ctx, query, k, Granularity::Fixed),
        Strategy::Semantic => retrieve_dense(ctx, query, k, Granularity::Semantic),
        Strategy::Bm25 => retrieve_bm25(ctx, query, k),
        Strategy::Hybrid => retrieve_hybrid(ctx, query, &HybridConfig::with_k(k)),
        Strategy::ParentChild => {
            let results = retrieve_hybrid(ctx, query, &HybridConfig::with_k(k))?;
            Ok(expand_all(&results, &ctx.fixed().metadata, window))
        }
    }
}
