//! Chunk records and the chunk identifier scheme.
//!
//! A [`Chunk`] is the immutable unit of retrievable text. Chunks are created
//! once during offline index build and never mutated afterwards; retrieval
//! stages attach their scores to [`Candidate`](crate::candidate::Candidate)
//! copies instead.

pub mod id;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PeregrineError;

/// An immutable unit of retrievable text with its document metadata.
///
/// The metadata list consumed by retrieval is an ordered sequence of these
/// records, line-aligned with the vector index's internal ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Globally unique identifier, `{source}_{suffix}_{seq}` (see [`id`]).
    pub chunk_id: String,
    /// Identifier of the originating document, stable across granularities.
    pub source: String,
    /// The chunk's textual content.
    pub text: String,
    /// Title of the owning document.
    #[serde(default)]
    pub title: String,
    /// Category of the owning document.
    #[serde(default)]
    pub category: String,
}

impl Chunk {
    /// Create a new chunk.
    pub fn new<S: Into<String>>(chunk_id: S, source: S, text: S, title: S, category: S) -> Self {
        Self {
            chunk_id: chunk_id.into(),
            source: source.into(),
            text: text.into(),
            title: title.into(),
            category: category.into(),
        }
    }
}

/// A chunking strategy producing a separate, parallel index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Fixed-width word windows.
    Fixed,
    /// Paragraph-aware splitting.
    Semantic,
}

impl Granularity {
    /// The suffix this granularity uses inside chunk identifiers.
    ///
    /// Corpora built with paragraph-aware splitting use `sem`, not
    /// `semantic`, in their ids (e.g. `routing.rst_sem_3`).
    pub fn suffix(&self) -> &'static str {
        match self {
            Granularity::Fixed => "fixed",
            Granularity::Semantic => "sem",
        }
    }

    /// Resolve a chunk-id suffix back to a granularity.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "fixed" => Some(Granularity::Fixed),
            "sem" => Some(Granularity::Semantic),
            _ => None,
        }
    }

    /// The external name of this granularity.
    pub fn name(&self) -> &'static str {
        match self {
            Granularity::Fixed => "fixed",
            Granularity::Semantic => "semantic",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Granularity {
    type Err = PeregrineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(Granularity::Fixed),
            "semantic" => Ok(Granularity::Semantic),
            _ => Err(PeregrineError::invalid_argument(format!(
                "unknown granularity: {s} (expected 'fixed' or 'semantic')"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_creation() {
        let chunk = Chunk::new(
            "routing.rst_fixed_0",
            "routing.rst",
            "Routing in Symfony",
            "Routing",
            "symfony",
        );
        assert_eq!(chunk.chunk_id, "routing.rst_fixed_0");
        assert_eq!(chunk.source, "routing.rst");
        assert_eq!(chunk.text, "Routing in Symfony");
    }

    #[test]
    fn test_chunk_serde_round_trip() {
        let chunk = Chunk::new("a_fixed_1", "a", "text", "Title", "cat");
        let json = serde_json::to_string(&chunk).unwrap();
        let back: Chunk = serde_json::from_str(&json).unwrap();
        assert_eq!(chunk, back);
    }

    #[test]
    fn test_chunk_deserialize_missing_optional_metadata() {
        // Metadata lines without title/category still load.
        let json = r#"{"chunk_id":"a_fixed_0","source":"a","text":"t"}"#;
        let chunk: Chunk = serde_json::from_str(json).unwrap();
        assert_eq!(chunk.title, "");
        assert_eq!(chunk.category, "");
    }

    #[test]
    fn test_granularity_parsing() {
        assert_eq!("fixed".parse::<Granularity>().unwrap(), Granularity::Fixed);
        assert_eq!(
            "semantic".parse::<Granularity>().unwrap(),
            Granularity::Semantic
        );
        assert!("paragraph".parse::<Granularity>().is_err());
    }

    #[test]
    fn test_granularity_suffix() {
        assert_eq!(Granularity::Fixed.suffix(), "fixed");
        assert_eq!(Granularity::Semantic.suffix(), "sem");
        assert_eq!(Granularity::from_suffix("sem"), Some(Granularity::Semantic));
        assert_eq!(Granularity::from_suffix("semantic"), None);
    }
}
