//! Query evaluation over a built [`InvertedIndex`].
//!
//! Intersection and phrase queries fold the query terms' postings lists
//! left to right with a merge join on document id. Every list is put in
//! document-id order first; the index itself makes no ordering promise.

use crate::config::{EngineConfig, RankingConfig};
use crate::index::InvertedIndex;
use crate::posting::{Posting, PostingsList};
use crate::query::Query;
use crate::{DocId, Position};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchMode {
    /// Documents containing every query term.
    Intersection,
    /// Documents containing the query terms in sequence.
    Phrase,
    /// Documents containing any query term, ordered by aggregated score.
    Ranked,
}

/// How ranked retrieval orders its candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RankingType {
    /// Sum of query weight times per-term posting score.
    #[default]
    TfIdf,
    /// Static document prior only (e.g. a link-analysis score).
    Static,
    /// `(1 - w) * tfidf + w * prior`.
    Combination,
}

/// Stateless evaluator borrowing a read-only index. All merge state lives on
/// the stack of each call, so one engine can serve concurrent searches.
#[derive(Debug, Clone)]
pub struct QueryEngine<'a> {
    index: &'a InvertedIndex,
    phrase_window: u32,
    ranking: RankingConfig,
    ranking_type: RankingType,
    static_scores: HashMap<DocId, f64>,
}

impl<'a> QueryEngine<'a> {
    pub fn new(index: &'a InvertedIndex) -> Self {
        Self::with_config(index, &EngineConfig::default())
    }

    pub fn with_config(index: &'a InvertedIndex, config: &EngineConfig) -> Self {
        Self {
            index,
            phrase_window: config.phrase_window.max(1),
            ranking: config.ranking,
            ranking_type: RankingType::default(),
            static_scores: HashMap::new(),
        }
    }

    /// Static per-document priors. Documents without an entry count as 0.
    pub fn with_static_scores(mut self, scores: HashMap<DocId, f64>) -> Self {
        self.static_scores = scores;
        self
    }

    pub fn with_ranking(mut self, ranking_type: RankingType) -> Self {
        self.ranking_type = ranking_type;
        self
    }

    pub fn phrase_window(&self) -> u32 { self.phrase_window }

    /// Evaluate `query`. Intersection and phrase results are in document-id
    /// order, ranked results in descending score order. Unknown terms and
    /// empty queries produce an empty list.
    pub fn search(&self, query: &Query, mode: SearchMode) -> PostingsList {
        tracing::debug!(?mode, terms = query.len(), "search");
        match mode {
            SearchMode::Intersection => self.intersection(query),
            SearchMode::Phrase => self.phrase(query),
            SearchMode::Ranked => self.ranked(query, self.ranking_type),
        }
    }

    pub fn intersection(&self, query: &Query) -> PostingsList {
        // repeating a term cannot narrow an AND query
        match self.lookup_all(query.distinct_terms()) {
            Some(lists) => intersect_lists(&lists),
            None => PostingsList::new(),
        }
    }

    pub fn phrase(&self, query: &Query) -> PostingsList {
        match self.lookup_all(query.terms().iter().map(|t| t.as_str())) {
            Some(lists) => phrase_lists(&lists, self.phrase_window),
            None => PostingsList::new(),
        }
    }

    /// Union of the query terms' postings, scored by aggregating per-term
    /// scores. Requires [`InvertedIndex::assign_scores`] to have run.
    pub fn ranked(&self, query: &Query, ranking_type: RankingType) -> PostingsList {
        let mut tf_idf: HashMap<DocId, f64> = HashMap::new();
        for (term, weight) in query.iter() {
            let Some(list) = self.index.postings(term) else {
                continue;
            };
            for p in list {
                *tf_idf.entry(p.doc_id).or_insert(0.0) += weight * p.score;
            }
        }

        let w = self.ranking.static_weight;
        let results: PostingsList = tf_idf
            .into_iter()
            .map(|(doc_id, tf_idf)| {
                let prior = self.static_scores.get(&doc_id).copied().unwrap_or(0.0);
                let score = match ranking_type {
                    RankingType::TfIdf => tf_idf,
                    RankingType::Static => prior,
                    RankingType::Combination => (1.0 - w) * tf_idf + w * prior,
                };
                Posting::scored(doc_id, score)
            })
            .collect();
        tracing::debug!(?ranking_type, hits = results.len(), "ranked retrieval");
        results.sorted_by_score()
    }

    /// `None` as soon as one term is missing: an AND over it is empty.
    fn lookup_all<'q>(&self, terms: impl IntoIterator<Item = &'q str>) -> Option<Vec<&'a PostingsList>> {
        let index = self.index;
        terms.into_iter().map(|t| index.postings(t)).collect()
    }
}

/// AND of the given lists, folded left to right. Each surviving document
/// keeps the posting of the leftmost list.
pub fn intersect_lists(lists: &[&PostingsList]) -> PostingsList {
    let Some((first, rest)) = lists.split_first() else {
        return PostingsList::new();
    };
    let mut acc = first.sorted_by_doc_id().into_owned();
    for (step, list) in rest.iter().enumerate() {
        if acc.is_empty() {
            break;
        }
        acc = intersect_pair(&acc, &list.sorted_by_doc_id());
        tracing::debug!(step, size = acc.len(), "intersection fold");
    }
    acc
}

/// Phrase match of the given lists in query order. A document survives a
/// step when some offset of the next term follows an offset of the previous
/// one by 1..=window. The surviving posting carries only the offsets of the
/// latest term that continue the phrase, so later steps extend the same chain.
pub fn phrase_lists(lists: &[&PostingsList], window: u32) -> PostingsList {
    let Some((first, rest)) = lists.split_first() else {
        return PostingsList::new();
    };
    let mut acc = first.sorted_by_doc_id().into_owned();
    for (step, list) in rest.iter().enumerate() {
        if acc.is_empty() {
            break;
        }
        acc = phrase_pair(&acc, &list.sorted_by_doc_id(), window);
        tracing::debug!(step, size = acc.len(), "phrase fold");
    }
    acc
}

fn intersect_pair(left: &PostingsList, right: &PostingsList) -> PostingsList {
    let (a, b) = (left.as_slice(), right.as_slice());
    let mut out = PostingsList::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].doc_id.cmp(&b[j].doc_id) {
            Ordering::Equal => {
                out.push(a[i].clone());
                i += 1;
                j += 1;
            }
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
        }
    }
    out
}

fn phrase_pair(left: &PostingsList, right: &PostingsList, window: u32) -> PostingsList {
    let (a, b) = (left.as_slice(), right.as_slice());
    let mut out = PostingsList::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].doc_id.cmp(&b[j].doc_id) {
            Ordering::Equal => {
                let next = following_positions(a[i].positions(), b[j].positions(), window);
                if !next.is_empty() {
                    let mut p = Posting::with_positions(b[j].doc_id, next);
                    p.score = b[j].score;
                    out.push(p);
                }
                i += 1;
                j += 1;
            }
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
        }
    }
    out
}

/// Offsets `p2` in `right` with some `p1` in `left` where `0 < p2 - p1 <= window`.
/// Both inputs are strictly increasing.
fn following_positions(left: &[Position], right: &[Position], window: u32) -> Vec<Position> {
    let mut out = Vec::new();
    let mut k = 0;
    for &p2 in right {
        while k < left.len() && left[k] as u64 + (window as u64) < p2 as u64 {
            k += 1;
        }
        if k < left.len() && left[k] < p2 {
            out.push(p2);
        }
    }
    out
}
