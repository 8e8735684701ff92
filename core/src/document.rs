use crate::index::{DocumentPostings, Position, Posting};
use crate::tokenizer::Tokenizer;

/// Reserved by the persisted format as a field separator.
pub const RESERVED_CHAR: char = '|';

/// Build the per-document postings for `doc_id` from its lines of text.
///
/// The position counter runs over the whole document. Tokens containing
/// [`RESERVED_CHAR`] are not indexed but still consume a position, so a
/// phrase never matches across them.
pub fn index_lines<'a, T, I>(tokenizer: &T, doc_id: &str, lines: I) -> DocumentPostings
where
    T: Tokenizer + ?Sized,
    I: IntoIterator<Item = &'a str>,
{
    let mut doc = DocumentPostings::new(doc_id);
    let mut pos: Position = 0;
    for line in lines {
        for token in tokenizer.lemmas(line) {
            if !token.contains(RESERVED_CHAR) {
                doc.postings
                    .entry(token)
                    .or_insert_with(|| Posting::new(doc_id))
                    .positions
                    .push(pos);
            }
            pos += 1;
        }
    }
    tracing::debug!(doc_id, tokens = doc.len(), positions = pos, "indexed document");
    doc
}

/// Convenience over [`index_lines`] for a whole text.
pub fn index_document<T: Tokenizer + ?Sized>(tokenizer: &T, doc_id: &str, text: &str) -> DocumentPostings {
    index_lines(tokenizer, doc_id, text.lines())
}
