use ngram_core::corpus::{build_from_corpus, discover};
use ngram_core::{index_document, search, InvertedIndex, StemmingTokenizer, Tokenizer, YearCounts};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use tempfile::tempdir;

fn build(docs: &[(&str, &str)]) -> InvertedIndex {
    let mut index = InvertedIndex::new();
    for (doc_id, text) in docs {
        index.merge(index_document(&StemmingTokenizer, doc_id, text));
    }
    index
}

fn counts(pairs: &[(u32, u64)]) -> YearCounts {
    pairs.iter().copied().collect()
}

/// token -> doc -> position set, ordering ignored.
fn content(index: &InvertedIndex) -> BTreeMap<String, BTreeMap<String, BTreeSet<u32>>> {
    let mut out = BTreeMap::new();
    for token in index.tokens() {
        let docs: &mut BTreeMap<String, BTreeSet<u32>> = out.entry(token.to_string()).or_default();
        for p in index.get(token).unwrap() {
            docs.entry(p.doc_id.clone()).or_default().extend(p.positions.iter().copied());
        }
    }
    out
}

#[test]
fn phrase_must_be_contiguous() {
    let index = build(&[("1900/a", "the cat sat on the mat")]);
    let res = search(&index, &StemmingTokenizer, "cat sat, cat mat").unwrap();
    assert_eq!(res["cat sat"], counts(&[(1900, 1)]));
    assert_eq!(res["cat mat"], counts(&[(1900, 0)]));
}

#[test]
fn phrase_across_lines_matches() {
    let index = build(&[("1900/a", "the black\ncat")]);
    let res = search(&index, &StemmingTokenizer, "black cat").unwrap();
    assert_eq!(res["black cat"], counts(&[(1900, 1)]));
}

#[test]
fn repeated_phrase_counts_every_occurrence() {
    let index = build(&[("1900/a", "the cat the cat the dog the cat")]);
    let res = search(&index, &StemmingTokenizer, "the cat, the").unwrap();
    assert_eq!(res["the cat"], counts(&[(1900, 3)]));
    assert_eq!(res["the"], counts(&[(1900, 4)]));
}

#[test]
fn every_corpus_year_is_reported() {
    let index = build(&[
        ("1900/a", "a cat"),
        ("1910/b", "a dog"),
        ("1920/c", "a bird"),
    ]);
    let res = search(&index, &StemmingTokenizer, "cat").unwrap();
    assert_eq!(res["cat"], counts(&[(1900, 1), (1910, 0), (1920, 0)]));
}

#[test]
fn unknown_word_is_zero_everywhere() {
    let index = build(&[("1900/a", "a cat"), ("1910/b", "a dog")]);
    let res = search(&index, &StemmingTokenizer, "zebra, cat zebra").unwrap();
    assert_eq!(res["zebra"], counts(&[(1900, 0), (1910, 0)]));
    assert_eq!(res["cat zebra"], counts(&[(1900, 0), (1910, 0)]));
}

#[test]
fn empty_query_is_no_result() {
    let index = build(&[("1900/a", "a cat")]);
    assert!(search(&index, &StemmingTokenizer, "").is_none());
    assert!(search(&InvertedIndex::new(), &StemmingTokenizer, "").is_none());
    // a legitimate query over an empty corpus is an empty table, not None
    let res = search(&InvertedIndex::new(), &StemmingTokenizer, "cat").unwrap();
    assert!(res["cat"].is_empty());
}

#[test]
fn single_word_counts_sum_per_year() {
    let index = build(&[
        ("1900/a", "cat cat dog"),
        ("1900/b", "dog cat"),
        ("1901/c", "cats and more cats"),
        ("1902/d", "nothing here"),
    ]);
    let res = search(&index, &StemmingTokenizer, "cat").unwrap();
    assert_eq!(res["cat"], counts(&[(1900, 3), (1901, 2), (1902, 0)]));
}

#[test]
fn lemmatized_query_matches_inflections() {
    let index = build(&[("1950/a", "The dogs were running home")]);
    let res = search(&index, &StemmingTokenizer, "Dog, RUN home").unwrap();
    assert_eq!(res["dog"], counts(&[(1950, 1)]));
    assert_eq!(res["run home"], counts(&[(1950, 1)]));
}

#[test]
fn persist_then_load_preserves_content() {
    let index = build(&[
        ("1900/a", "the cat sat on the mat"),
        ("1901/b", "a cat and a dog"),
    ]);
    let dir = tempdir().unwrap();
    let path = dir.path().join("index").join("inverted_index.txt");
    index.persist(&path).unwrap();

    let loaded = InvertedIndex::open(&path).unwrap();
    assert_eq!(content(&loaded), content(&index));
    assert_eq!(loaded.documents(), index.documents());
    assert_eq!(
        search(&loaded, &StemmingTokenizer, "cat sat, cat"),
        search(&index, &StemmingTokenizer, "cat sat, cat"),
    );
}

#[test]
fn load_into_built_index_fails() {
    let index = build(&[("1900/a", "cat")]);
    let dir = tempdir().unwrap();
    let path = dir.path().join("idx.txt");
    index.persist(&path).unwrap();

    let mut other = build(&[("1901/b", "dog")]);
    assert!(other.load(&path).is_err());
    assert!(other.get("cat").is_none());
}

#[test]
fn load_surfaces_malformed_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("idx.txt");
    fs::write(&path, "cat||1900/a:0\ndog||1900/a:one\n").unwrap();
    let mut index = InvertedIndex::new();
    let err = index.load(&path).unwrap_err();
    assert!(err.to_string().contains("line 2"), "{err}");
    assert!(index.is_empty());
}

#[test]
fn corpus_build_skips_unreadable_documents() {
    let dir = tempdir().unwrap();
    let base = dir.path();
    fs::create_dir_all(base.join("1900")).unwrap();
    fs::create_dir_all(base.join("1901")).unwrap();
    fs::create_dir_all(base.join("notes")).unwrap();
    fs::write(base.join("1900/moby.txt"), "the white whale\nthe sea").unwrap();
    fs::write(base.join("1901/emma.txt"), "the white dress").unwrap();
    fs::write(base.join("1901/broken.txt"), [0xffu8, 0xfe, 0x00]).unwrap();
    fs::write(base.join("notes/readme.txt"), "white").unwrap();

    let found: Vec<String> = discover(base).unwrap().into_iter().map(|d| d.doc_id).collect();
    assert_eq!(found, vec!["1900/moby", "1901/broken", "1901/emma"]);

    let mut index = InvertedIndex::new();
    let report = build_from_corpus(&mut index, &StemmingTokenizer, base).unwrap();
    assert_eq!(report.indexed, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].0, "1901/broken");

    let res = search(&index, &StemmingTokenizer, "white").unwrap();
    assert_eq!(res["white"], counts(&[(1900, 1), (1901, 1)]));
}

#[test]
fn missing_corpus_is_an_error() {
    let dir = tempdir().unwrap();
    assert!(discover(dir.path().join("nope")).is_err());
}

/// Splits on whitespace only, so `|` survives into the token stream.
struct Words;

impl Tokenizer for Words {
    fn lemmas(&self, line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_lowercase).collect()
    }
}

#[test]
fn reserved_token_breaks_phrase_adjacency() {
    let mut index = InvertedIndex::new();
    index.merge(index_document(&Words, "1900/a", "cat a|b dog"));
    let res = search(&index, &Words, "cat dog, cat, dog").unwrap();
    assert_eq!(res["cat dog"], counts(&[(1900, 0)]));
    assert_eq!(res["cat"], counts(&[(1900, 1)]));
    assert_eq!(res["dog"], counts(&[(1900, 1)]));
}

#[test]
fn corpus_build_skips_unstorable_ids_and_persists() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("data");
    fs::create_dir_all(base.join("1900")).unwrap();
    fs::write(base.join("1900/moby.txt"), "the white whale").unwrap();
    fs::write(base.join("1900/Smith, John.txt"), "a white house").unwrap();

    let mut index = InvertedIndex::new();
    let report = build_from_corpus(&mut index, &StemmingTokenizer, &base).unwrap();
    assert_eq!(report.indexed, 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].0, "1900/Smith, John");
    assert!(!index.documents().contains("1900/Smith, John"));

    let path = dir.path().join("inverted_index.txt");
    index.persist(&path).unwrap();
    let loaded = InvertedIndex::open(&path).unwrap();
    let res = search(&loaded, &StemmingTokenizer, "white").unwrap();
    assert_eq!(res["white"], counts(&[(1900, 1)]));
}
