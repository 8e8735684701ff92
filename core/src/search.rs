//! Phrase counting by shift-and-intersect over token positions.

use crate::index::{year_of, InvertedIndex, Year};
use crate::tokenizer::Tokenizer;
use std::collections::{BTreeMap, HashSet};

/// Occurrence count per year.
pub type YearCounts = BTreeMap<Year, u64>;
/// Per-year counts keyed by the (lowercased, trimmed) query phrase.
pub type NgramCounts = BTreeMap<String, YearCounts>;

/// Answer a comma-separated list of phrase queries.
///
/// Returns `None` when the input holds no query at all, which is distinct
/// from `Some` of a table whose counts are all zero.
pub fn search<T: Tokenizer + ?Sized>(index: &InvertedIndex, tokenizer: &T, query: &str) -> Option<NgramCounts> {
    let phrases = split_query(query);
    if phrases.is_empty() {
        return None;
    }
    let years = index.years();
    let mut results = NgramCounts::new();
    for phrase in phrases {
        let lemmas = tokenizer.lemmas(&phrase);
        let mut counts: YearCounts = years.iter().map(|&y| (y, 0)).collect();
        for (doc_id, n) in phrase_occurrences(index, &lemmas) {
            if let Some(year) = year_of(doc_id) {
                *counts.entry(year).or_insert(0) += n;
            }
        }
        tracing::debug!(phrase = %phrase, words = lemmas.len(), "counted phrase");
        results.insert(phrase, counts);
    }
    Some(results)
}

/// Lowercased, trimmed, non-empty pieces of a comma-separated query.
pub fn split_query(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Exact contiguous occurrences of `words` in every document containing all of them.
pub fn phrase_occurrences<'a, S: AsRef<str>>(index: &'a InvertedIndex, words: &[S]) -> Vec<(&'a str, u64)> {
    let candidates = candidate_documents(index, words);
    let mut out = Vec::with_capacity(candidates.len());
    for doc_id in candidates {
        let mut shared: Option<HashSet<i64>> = None;
        for (i, word) in words.iter().enumerate() {
            let shifted: HashSet<i64> = positions_in(index, word.as_ref(), doc_id)
                .map(|p| i64::from(p) - i as i64)
                .collect();
            shared = Some(match shared {
                Some(acc) => acc.intersection(&shifted).copied().collect(),
                None => shifted,
            });
            if shared.as_ref().is_some_and(HashSet::is_empty) {
                break;
            }
        }
        let n = shared.map_or(0, |s| s.len() as u64);
        out.push((doc_id, n));
    }
    out
}

/// Documents that contain every word somewhere, contiguous or not.
fn candidate_documents<'a, S: AsRef<str>>(index: &'a InvertedIndex, words: &[S]) -> HashSet<&'a str> {
    let mut acc: Option<HashSet<&'a str>> = None;
    for word in words {
        let docs: HashSet<&'a str> = index
            .get(word.as_ref())
            .unwrap_or_default()
            .iter()
            .map(|p| p.doc_id.as_str())
            .collect();
        let next = match acc {
            Some(prev) => prev.intersection(&docs).copied().collect(),
            None => docs,
        };
        if next.is_empty() {
            return HashSet::new();
        }
        acc = Some(next);
    }
    acc.unwrap_or_default()
}

/// Every position of `word` in `doc_id`, across all of its postings there.
fn positions_in<'a>(index: &'a InvertedIndex, word: &str, doc_id: &'a str) -> impl Iterator<Item = u32> + 'a {
    index
        .get(word)
        .unwrap_or_default()
        .iter()
        .filter(move |p| p.doc_id == doc_id)
        .flat_map(|p| p.positions.iter().copied())
}
