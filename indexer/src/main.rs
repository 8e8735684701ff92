use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ngram_core::corpus::build_from_corpus;
use ngram_core::{search, InvertedIndex, NgramCounts, StemmingTokenizer};
use std::io::{self, Write};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build and query a year-bucketed n-gram index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index every `<year>/<book>` file under the corpus directory
    Build {
        /// Corpus root containing one directory per year
        #[arg(long, default_value = "./data")]
        corpus: String,
        /// Output index file
        #[arg(long, default_value = "./index/inverted_index.txt")]
        output: String,
    },
    /// Count comma-separated words or phrases per year
    Search {
        /// Persisted index file
        #[arg(long, default_value = "./index/inverted_index.txt")]
        index: String,
        /// Queries, e.g. "cat, the black dog"
        #[arg(long)]
        query: String,
        /// Print JSON instead of tab-separated rows
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { corpus, output } => build_index(&corpus, &output),
        Commands::Search { index, query, json } => run_search(&index, &query, json),
    }
}

fn build_index(corpus: &str, output: &str) -> Result<()> {
    let mut index = InvertedIndex::new();
    let report = build_from_corpus(&mut index, &StemmingTokenizer, corpus)
        .with_context(|| format!("reading corpus {corpus}"))?;
    for (doc_id, reason) in &report.skipped {
        eprintln!("skipped {doc_id}: {reason}");
    }
    tracing::info!(documents = report.indexed, tokens = index.len(), "ingested documents");

    index.persist(output).with_context(|| format!("writing index {output}"))?;
    tracing::info!(output, "index build complete");
    Ok(())
}

fn run_search(path: &str, query: &str, json: bool) -> Result<()> {
    let index = InvertedIndex::open(path).with_context(|| format!("loading index {path}"))?;
    let Some(results) = search(&index, &StemmingTokenizer, query) else {
        tracing::info!("empty query");
        return Ok(());
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &results)?;
        writeln!(out)?;
    } else {
        write_rows(&mut out, &results)?;
    }
    Ok(())
}

fn write_rows<W: Write>(out: &mut W, results: &NgramCounts) -> io::Result<()> {
    for (ngram, years) in results {
        for (year, count) in years {
            writeln!(out, "{ngram}\t{year}\t{count}")?;
        }
    }
    Ok(())
}
