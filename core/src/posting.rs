use crate::{DocId, Position};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;

/// One document's occurrence record for a term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub score: f64,
    positions: Vec<Position>, // strictly increasing
}

impl Posting {
    pub fn new(doc_id: DocId, position: Position) -> Self {
        Self { doc_id, score: 0.0, positions: vec![position] }
    }

    /// Build a posting from arbitrary offsets; they are sorted and deduplicated.
    pub fn with_positions(doc_id: DocId, mut positions: Vec<Position>) -> Self {
        positions.sort_unstable();
        positions.dedup();
        Self { doc_id, score: 0.0, positions }
    }

    /// A posting that only carries a score, as produced by ranked retrieval.
    pub fn scored(doc_id: DocId, score: f64) -> Self {
        Self { doc_id, score, positions: Vec::new() }
    }

    pub fn positions(&self) -> &[Position] { &self.positions }

    /// Occurrences of the term in this document.
    pub fn tf(&self) -> usize { self.positions.len() }

    /// Returns false if the offset was already recorded.
    fn add_position(&mut self, position: Position) -> bool {
        match self.positions.binary_search(&position) {
            Ok(_) => false,
            Err(at) => {
                self.positions.insert(at, position);
                true
            }
        }
    }
}

/// Postings for a single term, at most one per document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostingsList {
    postings: Vec<Posting>,
}

impl PostingsList {
    pub fn new() -> Self { Self::default() }

    /// Merge-insert an occurrence. A second occurrence in the same document is
    /// folded into the existing posting. Returns true if the offset was new.
    pub fn add(&mut self, doc_id: DocId, position: Position) -> bool {
        // Documents are fed in order during a build, so the tail is the usual hit.
        if let Some(last) = self.postings.last_mut() {
            if last.doc_id == doc_id {
                return last.add_position(position);
            }
        }
        match self.postings.iter_mut().find(|p| p.doc_id == doc_id) {
            Some(p) => p.add_position(position),
            None => {
                self.postings.push(Posting::new(doc_id, position));
                true
            }
        }
    }

    /// Append a fully built posting. Callers must not introduce a second
    /// posting for a document already in the list.
    pub fn push(&mut self, posting: Posting) {
        debug_assert!(self.find(posting.doc_id).is_none(), "duplicate posting for doc {}", posting.doc_id);
        self.postings.push(posting);
    }

    pub fn len(&self) -> usize { self.postings.len() }

    pub fn is_empty(&self) -> bool { self.postings.is_empty() }

    pub fn get(&self, i: usize) -> Option<&Posting> { self.postings.get(i) }

    pub fn iter(&self) -> std::slice::Iter<'_, Posting> { self.postings.iter() }

    pub fn as_slice(&self) -> &[Posting] { &self.postings }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Posting> { self.postings.iter_mut() }

    pub fn find(&self, doc_id: DocId) -> Option<&Posting> {
        self.postings.iter().find(|p| p.doc_id == doc_id)
    }

    pub fn doc_ids(&self) -> Vec<DocId> {
        self.postings.iter().map(|p| p.doc_id).collect()
    }

    pub fn is_sorted_by_doc_id(&self) -> bool {
        self.postings.windows(2).all(|w| w[0].doc_id < w[1].doc_id)
    }

    /// Document-id ordered view. Borrows when the list is already in order.
    pub fn sorted_by_doc_id(&self) -> Cow<'_, PostingsList> {
        if self.is_sorted_by_doc_id() {
            return Cow::Borrowed(self);
        }
        let mut postings = self.postings.clone();
        postings.sort_by_key(|p| p.doc_id);
        Cow::Owned(PostingsList { postings })
    }

    /// Copy ordered by descending score, ties broken by ascending document id.
    pub fn sorted_by_score(&self) -> PostingsList {
        let mut postings = self.postings.clone();
        postings.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });
        PostingsList { postings }
    }
}

impl FromIterator<Posting> for PostingsList {
    fn from_iter<I: IntoIterator<Item = Posting>>(iter: I) -> Self {
        let mut list = PostingsList::new();
        for posting in iter {
            list.push(posting);
        }
        list
    }
}

impl IntoIterator for PostingsList {
    type Item = Posting;
    type IntoIter = std::vec::IntoIter<Posting>;

    fn into_iter(self) -> Self::IntoIter { self.postings.into_iter() }
}

impl<'a> IntoIterator for &'a PostingsList {
    type Item = &'a Posting;
    type IntoIter = std::slice::Iter<'a, Posting>;

    fn into_iter(self) -> Self::IntoIter { self.postings.iter() }
}
