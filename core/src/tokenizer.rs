use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)\p{L}[\p{L}\p{N}_']*").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
}

/// Turns one line of raw text into its ordered sequence of lemma tokens.
///
/// Indexing and querying must go through the same implementation, otherwise
/// query words will not line up with the index keys.
pub trait Tokenizer {
    fn lemmas(&self, line: &str) -> Vec<String>;
}

/// Default tokenizer: NFKC normalization, lowercase, then English stemming.
/// Stopwords are kept so every word of a phrase occupies a position.
#[derive(Debug, Default, Clone, Copy)]
pub struct StemmingTokenizer;

impl Tokenizer for StemmingTokenizer {
    fn lemmas(&self, line: &str) -> Vec<String> {
        tokenize(line)
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for &T {
    fn lemmas(&self, line: &str) -> Vec<String> {
        (**self).lemmas(line)
    }
}

/// Tokenize text into lowercase stems in reading order.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    RE.find_iter(&normalized)
        .map(|mat| STEMMER.stem(mat.as_str()).into_owned())
        .collect()
}
