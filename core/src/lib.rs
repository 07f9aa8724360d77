//! Positional inverted index with Boolean, phrase and ranked query evaluation
//! plus Rocchio relevance feedback.
//!
//! The index is fed `(term, doc_id, position)` triples by an external tokenizer,
//! scored once with [`InvertedIndex::assign_scores`], and then read by a
//! [`QueryEngine`] that never mutates it.

pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod posting;
pub mod query;

pub type DocId = u32;
/// Token offset within a document (not a byte offset).
pub type Position = u32;

pub use config::{EngineConfig, FeedbackConfig, RankingConfig};
pub use engine::{QueryEngine, RankingType, SearchMode};
pub use error::{Error, Result};
pub use index::InvertedIndex;
pub use posting::{Posting, PostingsList};
pub use query::Query;
