use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The term has no postings, so its idf is undefined.
    #[error("term not in index: {0:?}")]
    UnknownTerm(String),

    /// Relevance judgments must line up one-to-one with the result list.
    #[error("got {judgments} relevance judgments for {results} results")]
    JudgmentLengthMismatch { judgments: usize, results: usize },

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
