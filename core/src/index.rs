use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Token position within a document, counted over the whole document.
pub type Position = u32;
/// Year bucket used to aggregate counts.
pub type Year = u32;

/// Every position at which one token occurs in one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Posting {
    /// Document identifier, conventionally `<year>/<book>`.
    pub doc_id: String,
    /// Positions in increasing order of insertion.
    pub positions: Vec<Position>,
}

impl Posting {
    pub fn new(doc_id: impl Into<String>) -> Self {
        Self { doc_id: doc_id.into(), positions: Vec::new() }
    }
}

/// Occurrences of every token in a single document, ready to be merged.
#[derive(Debug, Clone, Default)]
pub struct DocumentPostings {
    pub doc_id: String,
    pub postings: HashMap<String, Posting>,
}

impl DocumentPostings {
    pub fn new(doc_id: impl Into<String>) -> Self {
        Self { doc_id: doc_id.into(), postings: HashMap::new() }
    }

    pub fn get(&self, token: &str) -> Option<&Posting> {
        self.postings.get(token)
    }

    /// Number of distinct tokens recorded for the document.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub tokens: usize,
    pub documents: usize,
    pub postings: usize,
    pub years: Vec<Year>,
}

/// Master index: token -> postings, plus the cached set of known document ids.
#[derive(Debug, Default, Clone)]
pub struct InvertedIndex {
    pub(crate) postings: HashMap<String, Vec<Posting>>,
    pub(crate) documents: HashSet<String>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    pub fn get(&self, token: &str) -> Option<&[Posting]> {
        self.postings.get(token).map(Vec::as_slice)
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> + '_ {
        self.postings.keys().map(String::as_str)
    }

    pub fn documents(&self) -> &HashSet<String> {
        &self.documents
    }

    /// Distinct tokens in the index.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Years of every known document with a numeric year prefix, ascending.
    pub fn years(&self) -> BTreeSet<Year> {
        self.documents.iter().filter_map(|id| year_of(id)).collect()
    }

    /// Fold one document's postings into the index.
    ///
    /// Every posting registers its document id, whether the token was already
    /// present or not.
    pub fn merge(&mut self, doc: DocumentPostings) {
        for (token, posting) in doc.postings {
            self.insert_posting(token, posting);
        }
    }

    pub(crate) fn insert_posting(&mut self, token: String, posting: Posting) {
        if !self.documents.contains(&posting.doc_id) {
            self.documents.insert(posting.doc_id.clone());
        }
        self.postings.entry(token).or_default().push(posting);
    }

    /// Recompute the cached document id set from the postings.
    pub fn refresh_documents(&mut self) {
        self.documents = self
            .postings
            .values()
            .flatten()
            .map(|p| p.doc_id.clone())
            .collect();
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            tokens: self.postings.len(),
            documents: self.documents.len(),
            postings: self.postings.values().map(Vec::len).sum(),
            years: self.years().into_iter().collect(),
        }
    }
}

/// Year bucket of a document id: the numeric prefix before the first `/`.
pub fn year_of(doc_id: &str) -> Option<Year> {
    let prefix = doc_id.split('/').next().unwrap_or(doc_id);
    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    prefix.parse().ok()
}
