//! Okapi BM25 index over a chunk corpus.

use ahash::AHashMap;

use crate::lexical::tokenize;

/// BM25 scoring parameters.
///
/// `epsilon` implements Okapi negative-IDF flooring: terms appearing in more
/// than half the corpus get a raw IDF below zero, which is replaced by
/// `epsilon * average_idf` so common terms still contribute a small positive
/// weight instead of penalizing documents that contain them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    /// Term-frequency saturation.
    pub k1: f32,
    /// Length-normalization strength.
    pub b: f32,
    /// Negative-IDF floor factor.
    pub epsilon: f32,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self {
            k1: 1.5,
            b: 0.75,
            epsilon: 0.25,
        }
    }
}

/// An in-memory BM25 ranking structure.
///
/// Built once from the corpus texts; document position in the build iterator
/// is the document id, which must line up with the metadata list the texts
/// came from. Read-only after construction, so shareable across threads
/// without locking.
#[derive(Debug, Clone)]
pub struct Bm25Index {
    params: Bm25Params,
    /// Per-document term frequencies, indexed by corpus position.
    term_freqs: Vec<AHashMap<String, f32>>,
    /// Per-document token counts.
    doc_lens: Vec<f32>,
    /// Average document length over the corpus.
    avgdl: f32,
    /// Per-term inverse document frequency, after epsilon flooring.
    idf: AHashMap<String, f32>,
}

impl Bm25Index {
    /// Build an index over `corpus` with default parameters.
    pub fn build<'a, I>(corpus: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self::build_with_params(corpus, Bm25Params::default())
    }

    /// Build an index over `corpus` with explicit parameters.
    pub fn build_with_params<'a, I>(corpus: I, params: Bm25Params) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut term_freqs: Vec<AHashMap<String, f32>> = Vec::new();
        let mut doc_lens: Vec<f32> = Vec::new();
        let mut doc_freqs: AHashMap<String, u32> = AHashMap::new();

        for text in corpus {
            let mut freqs: AHashMap<String, f32> = AHashMap::new();
            let mut len = 0.0f32;
            for token in tokenize(text) {
                *freqs.entry(token.to_string()).or_insert(0.0) += 1.0;
                len += 1.0;
            }
            for term in freqs.keys() {
                *doc_freqs.entry(term.clone()).or_insert(0) += 1;
            }
            term_freqs.push(freqs);
            doc_lens.push(len);
        }

        let doc_count = doc_lens.len();
        let avgdl = if doc_count > 0 {
            doc_lens.iter().sum::<f32>() / doc_count as f32
        } else {
            0.0
        };
        let idf = Self::calc_idf(&doc_freqs, doc_count, params.epsilon);

        Self {
            params,
            term_freqs,
            doc_lens,
            avgdl,
            idf,
        }
    }

    /// Okapi IDF: `ln((N - df + 0.5) / (df + 0.5))`, with negative values
    /// floored to `epsilon * average_idf`.
    fn calc_idf(
        doc_freqs: &AHashMap<String, u32>,
        doc_count: usize,
        epsilon: f32,
    ) -> AHashMap<String, f32> {
        let n = doc_count as f32;
        let mut idf: AHashMap<String, f32> = AHashMap::with_capacity(doc_freqs.len());
        let mut idf_sum = 0.0f32;
        let mut negative_terms: Vec<String> = Vec::new();

        for (term, &df) in doc_freqs {
            let value = ((n - df as f32 + 0.5) / (df as f32 + 0.5)).ln();
            idf_sum += value;
            if value < 0.0 {
                negative_terms.push(term.clone());
            }
            idf.insert(term.clone(), value);
        }

        if !idf.is_empty() {
            let average_idf = idf_sum / idf.len() as f32;
            let floor = epsilon * average_idf;
            for term in negative_terms {
                idf.insert(term, floor);
            }
        }

        idf
    }

    /// Number of documents in the corpus.
    pub fn len(&self) -> usize {
        self.doc_lens.len()
    }

    /// Check whether the corpus is empty.
    pub fn is_empty(&self) -> bool {
        self.doc_lens.is_empty()
    }

    /// BM25 score of every document in the corpus against `query`, in
    /// corpus order. Query terms absent from the corpus contribute nothing;
    /// a query sharing no terms with a document scores it 0.
    pub fn scores(&self, query: &str) -> Vec<f32> {
        let query_terms: Vec<&str> = tokenize(query).collect();
        let mut scores = vec![0.0f32; self.len()];
        let k1 = self.params.k1;
        let b = self.params.b;

        for term in &query_terms {
            let Some(&idf) = self.idf.get(*term) else {
                continue;
            };
            for (doc_id, freqs) in self.term_freqs.iter().enumerate() {
                let Some(&tf) = freqs.get(*term) else {
                    continue;
                };
                let rel_len = if self.avgdl > 0.0 {
                    self.doc_lens[doc_id] / self.avgdl
                } else {
                    0.0
                };
                let norm = 1.0 - b + b * rel_len;
                scores[doc_id] += idf * (tf * (k1 + 1.0)) / (tf + k1 * norm);
            }
        }

        scores
    }

    /// Top-`k` documents by descending BM25 score as `(doc_id, score)`
    /// pairs. Equal scores break ties by ascending corpus position.
    pub fn search(&self, query: &str, k: usize) -> Vec<(usize, f32)> {
        let scores = self.scores(query);
        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| {
            scores[b]
                .partial_cmp(&scores[a])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });
        order.truncate(k);
        order.into_iter().map(|doc_id| (doc_id, scores[doc_id])).collect()
    }
}
