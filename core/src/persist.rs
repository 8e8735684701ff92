//! Line-oriented text format for the master index.
//!
//! ```text
//! token||doc1:pos,pos,pos;doc2:pos,pos
//! ```
//!
//! One line per token. Blank lines are ignored on load. The file carries no
//! version field.

use crate::error::{IndexError, Result};
use crate::index::{InvertedIndex, Position, Posting};
use std::collections::HashMap;
use std::fs::{create_dir_all, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

const TOKEN_SEP: &str = "||";
const DOC_SEP: char = ';';
const ID_SEP: char = ':';
const POS_SEP: char = ',';

/// Serialize `index` to `out`, tokens sorted and postings sorted by document.
///
/// Postings without positions are not written; a token left with none is
/// omitted entirely.
pub fn write_index<W: Write>(index: &InvertedIndex, mut out: W) -> Result<()> {
    let mut tokens: Vec<&String> = index.postings.keys().collect();
    tokens.sort();
    for token in tokens {
        let mut postings: Vec<&Posting> = index.postings[token]
            .iter()
            .filter(|p| !p.positions.is_empty())
            .collect();
        if postings.is_empty() { continue; }
        check_token(token)?;
        postings.sort_by(|a, b| a.doc_id.cmp(&b.doc_id));

        let mut line = String::with_capacity(token.len() + 16);
        line.push_str(token);
        line.push_str(TOKEN_SEP);
        for (i, posting) in postings.iter().enumerate() {
            check_doc_id(&posting.doc_id)?;
            if i > 0 { line.push(DOC_SEP); }
            line.push_str(&posting.doc_id);
            line.push(ID_SEP);
            let positions: Vec<String> = posting.positions.iter().map(|p| p.to_string()).collect();
            line.push_str(&positions.join(","));
        }
        line.push('\n');
        out.write_all(line.as_bytes())?;
    }
    out.flush()?;
    Ok(())
}

/// Populate an empty `index` from `input`.
///
/// Nothing is applied unless every line parses.
pub fn read_index<R: BufRead>(index: &mut InvertedIndex, input: R) -> Result<()> {
    if !index.is_empty() {
        return Err(IndexError::AlreadyPopulated { tokens: index.len() });
    }
    let mut parsed: HashMap<String, Vec<Posting>> = HashMap::new();
    for (i, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let (token, postings) = parse_line(i + 1, &line)?;
        parsed.entry(token).or_default().extend(postings);
    }
    for (token, postings) in parsed {
        for posting in postings {
            index.insert_posting(token.clone(), posting);
        }
    }
    Ok(())
}

fn parse_line(line_no: usize, line: &str) -> Result<(String, Vec<Posting>)> {
    let (token, rest) = line
        .split_once(TOKEN_SEP)
        .ok_or_else(|| IndexError::format(line_no, "missing `||` separator"))?;
    if token.is_empty() {
        return Err(IndexError::format(line_no, "empty token"));
    }
    if rest.is_empty() {
        return Err(IndexError::format(line_no, "empty posting list"));
    }
    let postings = rest
        .split(DOC_SEP)
        .map(|block| parse_block(line_no, block))
        .collect::<Result<Vec<_>>>()?;
    Ok((token.to_string(), postings))
}

fn parse_block(line_no: usize, block: &str) -> Result<Posting> {
    let (doc_id, positions) = block
        .split_once(ID_SEP)
        .ok_or_else(|| IndexError::format(line_no, format!("document block {block:?} has no `:`")))?;
    if doc_id.is_empty() {
        return Err(IndexError::format(line_no, "empty document id"));
    }
    let positions = positions
        .split(POS_SEP)
        .map(|p| {
            p.parse::<Position>()
                .map_err(|_| IndexError::format(line_no, format!("invalid position {p:?} for {doc_id}")))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Posting { doc_id: doc_id.to_string(), positions })
}

fn check_token(token: &str) -> Result<()> {
    if token.is_empty() || token.contains(['|', '\n', '\r']) {
        return Err(IndexError::InvalidToken(token.to_string()));
    }
    Ok(())
}

/// Whether `doc_id` can be written to and read back from an index file.
pub fn is_storable_doc_id(doc_id: &str) -> bool {
    !doc_id.is_empty() && !doc_id.contains([ID_SEP, DOC_SEP, POS_SEP, '|', '\n', '\r'])
}

fn check_doc_id(doc_id: &str) -> Result<()> {
    if !is_storable_doc_id(doc_id) {
        return Err(IndexError::InvalidDocumentId(doc_id.to_string()));
    }
    Ok(())
}

impl InvertedIndex {
    /// Write the index to `path`, creating parent directories as needed.
    pub fn persist<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            create_dir_all(dir).map_err(|e| IndexError::file(dir, e))?;
        }
        let f = File::create(path).map_err(|e| IndexError::file(path, e))?;
        write_index(self, BufWriter::new(f))?;
        tracing::info!(path = %path.display(), tokens = self.len(), "index written");
        Ok(())
    }

    /// Load a persisted index into this (empty) index.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        if !self.is_empty() {
            return Err(IndexError::AlreadyPopulated { tokens: self.len() });
        }
        let f = File::open(path).map_err(|e| IndexError::file(path, e))?;
        read_index(self, BufReader::new(f))?;
        tracing::info!(path = %path.display(), tokens = self.len(), documents = self.documents.len(), "index loaded");
        Ok(())
    }

    /// Fresh index read from `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut index = Self::new();
        index.load(path)?;
        Ok(index)
    }
}
