//! Benchmarks for the retrieval hot paths.

use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};

use peregrine::chunk::{Chunk, Granularity, id};
use peregrine::embedding::{HashingTextEmbedder, TextEmbedder};
use peregrine::retrieval::{HybridConfig, RetrievalContext, RetrievalIndex, retrieve_hybrid};
use peregrine::vector::FlatVectorIndex;

const CORPUS_SIZE: usize = 2_000;

fn synthetic_corpus() -> Vec<Chunk> {
    let topics = [
        "routing controllers attributes urls parameters",
        "doctrine entities repositories database tables",
        "cache pools invalidation tags expiry",
        "console commands input output styling",
        "messenger buses transports handlers retries",
    ];
    (0..CORPUS_SIZE)
        .map(|i| {
            let topic = topics[i % topics.len()];
            Chunk::new(
                id::encode("bench.rst", Granularity::Fixed, i),
                "bench.rst".to_string(),
                format!("{topic} section {i} explains configuration details"),
                "Bench".to_string(),
                "bench".to_string(),
            )
        })
        .collect()
}

fn build_context() -> RetrievalContext {
    let embedder = Arc::new(HashingTextEmbedder::new(128));
    let chunks = synthetic_corpus();
    let mut index = FlatVectorIndex::new(embedder.dimension());
    for chunk in &chunks {
        index
            .add(embedder.embed(&chunk.text).expect("embed"))
            .expect("add");
    }
    let fixed = RetrievalIndex::new(Arc::new(index), chunks);
    let semantic = RetrievalIndex::new(Arc::new(FlatVectorIndex::new(128)), Vec::new());
    RetrievalContext::new(embedder, fixed, semantic)
}

fn bench_retrieval(c: &mut Criterion) {
    let ctx = build_context();
    let config = HybridConfig::default();

    c.bench_function("bm25_full_corpus_scores", |b| {
        b.iter(|| ctx.bm25().scores("routing controllers attributes"))
    });

    c.bench_function("hybrid_retrieve", |b| {
        b.iter(|| retrieve_hybrid(&ctx, "routing controllers attributes", &config).unwrap())
    });
}

criterion_group!(benches, bench_retrieval);
criterion_main!(benches);
