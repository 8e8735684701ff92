use crate::document::index_lines;
use crate::error::{IndexError, Result};
use crate::index::{year_of, InvertedIndex};
use crate::persist::is_storable_doc_id;
use crate::tokenizer::Tokenizer;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A document found under `base/<year>/<book>.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusDocument {
    /// `<year>/<book>`
    pub doc_id: String,
    pub path: PathBuf,
}

#[derive(Debug, Default)]
pub struct BuildReport {
    pub indexed: usize,
    /// Documents that could not be read, with the reason.
    pub skipped: Vec<(String, String)>,
}

/// List every document of the corpus rooted at `base`, sorted by id.
pub fn discover<P: AsRef<Path>>(base: P) -> Result<Vec<CorpusDocument>> {
    let base = base.as_ref();
    if !base.is_dir() {
        return Err(IndexError::file(
            base,
            std::io::Error::new(std::io::ErrorKind::NotFound, "corpus directory not found"),
        ));
    }
    let mut docs = Vec::new();
    for entry in WalkDir::new(base).min_depth(2).max_depth(2).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() { continue; }
        let p = entry.path();
        let year = p.parent().and_then(|d| d.file_name()).and_then(|s| s.to_str());
        let book = p.file_stem().and_then(|s| s.to_str());
        if let (Some(year), Some(book)) = (year, book) {
            if year_of(year).is_none() {
                tracing::debug!(path = %p.display(), "skipping file outside a year directory");
                continue;
            }
            docs.push(CorpusDocument { doc_id: format!("{year}/{book}"), path: p.to_path_buf() });
        }
    }
    docs.sort_by(|a, b| a.doc_id.cmp(&b.doc_id));
    Ok(docs)
}

/// Index and merge every document of the corpus at `base`.
///
/// A document that cannot be read, or whose id cannot be stored in an index
/// file, is logged and skipped; the rest of the batch still goes into `index`.
pub fn build_from_corpus<T, P>(index: &mut InvertedIndex, tokenizer: &T, base: P) -> Result<BuildReport>
where
    T: Tokenizer + ?Sized,
    P: AsRef<Path>,
{
    let mut report = BuildReport::default();
    for doc in discover(base)? {
        if !is_storable_doc_id(&doc.doc_id) {
            tracing::warn!(doc_id = %doc.doc_id, path = %doc.path.display(), "skipping document whose id cannot be stored");
            report.skipped.push((doc.doc_id, "document id contains a reserved character".to_string()));
            continue;
        }
        match read_lines(&doc.path) {
            Ok(lines) => {
                let postings = index_lines(tokenizer, &doc.doc_id, lines.iter().map(String::as_str));
                index.merge(postings);
                report.indexed += 1;
            }
            Err(e) => {
                tracing::warn!(doc_id = %doc.doc_id, path = %doc.path.display(), error = %e, "skipping unreadable document");
                report.skipped.push((doc.doc_id, e.to_string()));
            }
        }
    }
    tracing::info!(indexed = report.indexed, skipped = report.skipped.len(), tokens = index.len(), "corpus ingested");
    Ok(report)
}

fn read_lines(path: &Path) -> std::io::Result<Vec<String>> {
    let f = File::open(path)?;
    BufReader::new(f).lines().collect()
}
