use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::posting::PostingsList;
use crate::query::Query;
use crate::{DocId, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Term -> postings mapping, plus a per-document term count table used for
/// relevance feedback.
///
/// Built by a sequence of [`insert`](Self::insert) calls, scored once with
/// [`assign_scores`](Self::assign_scores), then shared read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvertedIndex {
    postings: HashMap<String, PostingsList>,
    doc_terms: HashMap<DocId, HashMap<String, u32>>, // doc_id -> term -> distinct offsets
    corpus_size: u32,
}

impl InvertedIndex {
    /// `corpus_size` is the fixed N used for idf; it is not derived from the
    /// documents actually inserted.
    pub fn new(corpus_size: u32) -> Self {
        Self { postings: HashMap::new(), doc_terms: HashMap::new(), corpus_size }
    }

    pub fn from_config(config: &EngineConfig) -> Self { Self::new(config.corpus_size) }

    /// Record one occurrence of `term` at `position` in `doc_id`.
    pub fn insert(&mut self, term: &str, doc_id: DocId, position: Position) {
        let added = match self.postings.get_mut(term) {
            Some(list) => list.add(doc_id, position),
            None => {
                let mut list = PostingsList::new();
                list.add(doc_id, position);
                self.postings.insert(term.to_owned(), list);
                true
            }
        };
        if !added {
            return;
        }
        let counts = self.doc_terms.entry(doc_id).or_default();
        match counts.get_mut(term) {
            Some(c) => *c += 1,
            None => {
                counts.insert(term.to_owned(), 1);
            }
        }
    }

    /// Postings for `term`, or `None` if it was never inserted. Callers treat
    /// `None` as an empty result.
    pub fn postings(&self, term: &str) -> Option<&PostingsList> {
        let list = self.postings.get(term);
        if list.is_none() {
            tracing::trace!(term, "lookup miss");
        }
        list
    }

    pub fn contains(&self, term: &str) -> bool { self.postings.contains_key(term) }

    /// Document frequency, 0 for unknown terms.
    pub fn df(&self, term: &str) -> usize {
        self.postings.get(term).map(|l| l.len()).unwrap_or(0)
    }

    pub fn corpus_size(&self) -> u32 { self.corpus_size }

    pub fn num_terms(&self) -> usize { self.postings.len() }

    /// Number of distinct documents that received at least one insert.
    pub fn num_documents_seen(&self) -> usize { self.doc_terms.len() }

    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.postings.keys().map(|t| t.as_str())
    }

    /// ln(N / df). Fails for terms that are not in the index, where df would be 0.
    pub fn idf(&self, term: &str) -> Result<f64> {
        match self.postings.get(term) {
            Some(list) if !list.is_empty() => Ok(idf_for(self.corpus_size, list.len())),
            _ => Err(Error::UnknownTerm(term.to_owned())),
        }
    }

    /// For every query position, how often that exact term occurs in the query.
    pub fn term_frequency_vector(&self, query: &Query) -> Vec<u32> {
        let terms = query.terms();
        terms
            .iter()
            .map(|t| terms.iter().filter(|other| *other == t).count() as u32)
            .collect()
    }

    /// `tf[i] * idf(term[i])` for every query position.
    pub fn tf_idf_vector(&self, query: &Query) -> Result<Vec<f64>> {
        let tf = self.term_frequency_vector(query);
        query
            .terms()
            .iter()
            .zip(tf)
            .map(|(term, tf)| Ok(tf as f64 * self.idf(term)?))
            .collect()
    }

    /// Set every posting's score to `tf * idf` of its own term. Must run after
    /// the build phase and again if the index is mutated afterwards.
    pub fn assign_scores(&mut self) {
        let n = self.corpus_size;
        let mut scored = 0usize;
        for list in self.postings.values_mut() {
            let idf = idf_for(n, list.len());
            for p in list.iter_mut() {
                p.score = p.tf() as f64 * idf;
                scored += 1;
            }
        }
        tracing::info!(num_terms = self.postings.len(), num_postings = scored, corpus_size = n, "assigned tf-idf scores");
    }

    /// Term counts of one document, as recorded during insertion.
    pub fn document_terms(&self, doc_id: DocId) -> Option<&HashMap<String, u32>> {
        self.doc_terms.get(&doc_id)
    }

    /// tf-idf weight of every term in `doc_id`; empty for unknown documents.
    pub fn document_tf_idf(&self, doc_id: DocId) -> Vec<(String, f64)> {
        let Some(counts) = self.doc_terms.get(&doc_id) else {
            return Vec::new();
        };
        counts
            .iter()
            .map(|(term, &count)| {
                // every term recorded for a document has a non-empty postings list
                let idf = idf_for(self.corpus_size, self.df(term));
                (term.clone(), count as f64 * idf)
            })
            .collect()
    }
}

#[inline]
fn idf_for(corpus_size: u32, df: usize) -> f64 {
    (corpus_size as f64 / df as f64).ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(docs: &[(DocId, &str)], n: u32) -> InvertedIndex {
        let mut index = InvertedIndex::new(n);
        for (doc_id, text) in docs {
            for (pos, term) in text.split_whitespace().enumerate() {
                index.insert(term, *doc_id, pos as Position);
            }
        }
        index
    }

    #[test]
    fn insert_creates_lists_lazily() {
        let index = index_of(&[(1, "the cat sat"), (2, "the cat ran")], 3);
        assert_eq!(index.num_terms(), 4);
        assert_eq!(index.df("the"), 2);
        assert_eq!(index.df("sat"), 1);
        assert_eq!(index.df("dog"), 0);
        assert!(index.postings("dog").is_none());
    }

    #[test]
    fn repeated_insert_does_not_duplicate_offsets() {
        let mut index = InvertedIndex::new(10);
        index.insert("a", 1, 4);
        index.insert("a", 1, 4);
        assert_eq!(index.postings("a").unwrap().get(0).unwrap().positions(), &[4]);
        assert_eq!(index.document_terms(1).unwrap()["a"], 1);

        index.insert("a", 1, 9);
        assert_eq!(index.postings("a").unwrap().get(0).unwrap().tf(), 2);
        assert_eq!(index.document_terms(1).unwrap()["a"], 2);
    }

    #[test]
    fn terms_are_case_sensitive() {
        let index = index_of(&[(1, "Cat cat")], 3);
        assert_eq!(index.df("Cat"), 1);
        assert_eq!(index.postings("cat").unwrap().get(0).unwrap().positions(), &[1]);
    }

    #[test]
    fn idf_uses_fixed_corpus_size() {
        let index = index_of(&[(1, "x y"), (2, "x")], 1000);
        assert!((index.idf("x").unwrap() - (500.0f64).ln()).abs() < 1e-12);
        assert!((index.idf("y").unwrap() - (1000.0f64).ln()).abs() < 1e-12);
        assert_eq!(index.idf("z"), Err(Error::UnknownTerm("z".into())));
    }

    #[test]
    fn tf_vector_counts_repeats_at_every_position() {
        let index = index_of(&[(1, "a b")], 3);
        let q = Query::new("a b a");
        assert_eq!(index.term_frequency_vector(&q), vec![2, 1, 2]);
    }

    #[test]
    fn tf_idf_vector_fails_on_unknown_term() {
        let index = index_of(&[(1, "a b"), (2, "a")], 4);
        let v = index.tf_idf_vector(&Query::new("a a b")).unwrap();
        assert!((v[0] - 2.0 * 2.0f64.ln()).abs() < 1e-12);
        assert!((v[2] - 4.0f64.ln()).abs() < 1e-12);
        assert!(index.tf_idf_vector(&Query::new("a zzz")).is_err());
    }

    #[test]
    fn assign_scores_is_tf_times_idf() {
        let mut index = index_of(&[(1, "the cat sat sat"), (2, "the cat ran"), (3, "dog ran")], 3);
        index.assign_scores();
        let sat = index.postings("sat").unwrap().get(0).unwrap();
        // df = 1, tf = 2, N = 3
        assert_eq!(sat.score, 2.0 * 3.0f64.ln());
        let cat = index.postings("cat").unwrap();
        for p in cat {
            assert_eq!(p.score, (3.0f64 / 2.0).ln());
        }
    }

    #[test]
    fn document_tf_idf_covers_every_term() {
        let index = index_of(&[(1, "the cat sat"), (2, "the cat ran"), (3, "dog ran")], 3);
        let mut v = index.document_tf_idf(1);
        v.sort_by(|a, b| a.0.cmp(&b.0));
        let terms: Vec<&str> = v.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(terms, vec!["cat", "sat", "the"]);
        assert_eq!(v[1].1, 3.0f64.ln());
        assert!(index.document_tf_idf(42).is_empty());
    }
}
