#![allow(dead_code)]

use postings_core::{DocId, InvertedIndex, Position};
use tracing_subscriber::{fmt, EnvFilter};

/// Install a test-friendly subscriber once; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Feed whitespace-separated documents into a fresh index, one position per token.
pub fn build_index(docs: &[(DocId, &str)], corpus_size: u32) -> InvertedIndex {
    let mut index = InvertedIndex::new(corpus_size);
    for (doc_id, text) in docs {
        for (pos, term) in text.split_whitespace().enumerate() {
            index.insert(term, *doc_id, pos as Position);
        }
    }
    index
}

/// The three-document corpus used across the scenario tests.
pub fn cat_corpus() -> InvertedIndex {
    build_index(&[(1, "the cat sat"), (2, "the cat ran"), (3, "dog ran")], 3)
}
