use crate::config::FeedbackConfig;
use crate::error::{Error, Result};
use crate::index::InvertedIndex;
use crate::posting::PostingsList;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Ordered query terms with one weight per term. Terms may repeat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    terms: Vec<String>,
    weights: Vec<f64>,
}

impl Query {
    /// Split on whitespace; every term starts with weight 1.0.
    pub fn new(text: &str) -> Self {
        let terms: Vec<String> = text.split_whitespace().map(|s| s.to_string()).collect();
        let weights = vec![1.0; terms.len()];
        Self { terms, weights }
    }

    pub fn from_weighted<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let (terms, weights) = pairs.into_iter().map(|(t, w)| (t.into(), w)).unzip();
        Self { terms, weights }
    }

    /// Independent duplicate of this query.
    pub fn copy(&self) -> Self { self.clone() }

    pub fn terms(&self) -> &[String] { &self.terms }

    pub fn weights(&self) -> &[f64] { &self.weights }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.terms.iter().map(|t| t.as_str()).zip(self.weights.iter().copied())
    }

    pub fn len(&self) -> usize { self.terms.len() }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    /// Summed weight over every occurrence of `term`.
    pub fn weight_of(&self, term: &str) -> f64 {
        self.iter().filter(|(t, _)| *t == term).map(|(_, w)| w).sum()
    }

    /// Terms in first-occurrence order without repeats.
    pub fn distinct_terms(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.terms
            .iter()
            .map(|t| t.as_str())
            .filter(|t| seen.insert(*t))
            .collect()
    }

    /// Rocchio rewrite toward the documents judged relevant.
    ///
    /// `judgments[i]` refers to `results.get(i)`. The new query is
    /// `alpha * q / |q| + beta * sum(relevant docs) / |relevant terms|`,
    /// and its term order is unspecified.
    pub fn relevance_feedback(
        &mut self,
        results: &PostingsList,
        judgments: &[bool],
        index: &InvertedIndex,
        config: &FeedbackConfig,
    ) -> Result<()> {
        if judgments.len() != results.len() {
            return Err(Error::JudgmentLengthMismatch { judgments: judgments.len(), results: results.len() });
        }

        let mut expanded: HashMap<String, f64> = HashMap::new();
        if !self.is_empty() {
            let inv_len = 1.0 / self.len() as f64;
            let tf = index.term_frequency_vector(self);
            for (term, tf) in self.terms.iter().zip(tf) {
                // unknown terms carry no tf-idf mass
                let tf_idf = index.idf(term).map(|idf| tf as f64 * idf).unwrap_or(0.0);
                expanded.insert(term.clone(), config.alpha * tf_idf * inv_len);
            }
        }

        let mut relevant: HashMap<String, f64> = HashMap::new();
        let mut relevant_docs = 0usize;
        for (posting, _) in results.iter().zip(judgments).filter(|(_, r)| **r) {
            relevant_docs += 1;
            for (term, w) in index.document_tf_idf(posting.doc_id) {
                *relevant.entry(term).or_insert(0.0) += w;
            }
        }
        if !relevant.is_empty() {
            let scale = config.beta / relevant.len() as f64;
            for w in relevant.values_mut() {
                *w *= scale;
            }
        }
        let relevant_terms = relevant.len();
        for (term, w) in relevant {
            *expanded.entry(term).or_insert(0.0) += w;
        }

        tracing::debug!(relevant_docs, relevant_terms, new_len = expanded.len(), "relevance feedback applied");
        let (terms, weights) = expanded.into_iter().unzip();
        self.terms = terms;
        self.weights = weights;
        Ok(())
    }
}
