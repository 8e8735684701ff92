//! Year-bucketed n-gram counting over a corpus of `<year>/<book>` documents.
//!
//! Build an [`InvertedIndex`] with [`index_document`] + [`InvertedIndex::merge`]
//! (or [`corpus::build_from_corpus`]), persist it once, then answer phrase
//! queries with [`search()`].

pub mod corpus;
pub mod document;
pub mod error;
pub mod index;
pub mod persist;
pub mod search;
pub mod tokenizer;

pub use document::{index_document, index_lines};
pub use error::{IndexError, Result};
pub use index::{year_of, DocumentPostings, IndexStats, InvertedIndex, Position, Posting, Year};
pub use search::{search, NgramCounts, YearCounts};
pub use tokenizer::{tokenize, StemmingTokenizer, Tokenizer};
