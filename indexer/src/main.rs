use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use core_lib::document::MISSING_SENTINEL;
use core_lib::persist::{save_corpus, IndexPaths};
use core_lib::{Corpus, RawRecord};
use tracing_subscriber::{fmt, EnvFilter};

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build the movie recommendation corpus from a snapshot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the corpus from a TSV movie snapshot
    Build {
        /// Input snapshot (tab-separated, one movie per line)
        #[arg(long)]
        input: String,
        /// Output index directory
        #[arg(long)]
        output: String,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output } => build(&input, &output),
    }
}

/// Snapshot columns, in order. The header line must match.
const COLUMNS: [&str; 8] = [
    "tconst",
    "primaryTitle",
    "originalTitle",
    "startYear",
    "genres",
    "averageRating",
    "numVotes",
    "primaryName",
];

fn build(input: &str, output: &str) -> Result<()> {
    let file = File::open(Path::new(input)).with_context(|| format!("open snapshot {input}"))?;
    let mut lines = BufReader::new(file).lines();

    let header = match lines.next() {
        Some(line) => line?,
        None => bail!("snapshot {input} is empty"),
    };
    validate_header(&header)?;

    let mut records: Vec<RawRecord> = Vec::new();
    let mut skipped = 0usize;
    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_row(&line) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }
    tracing::info!(ingested = records.len(), skipped, "snapshot read");

    let corpus = Corpus::build(records);
    tracing::info!(
        documents = corpus.stats.document_count,
        vocabulary = corpus.index.len(),
        average_doc_length = corpus.stats.average_doc_length,
        "corpus built"
    );

    let created_at = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "".into());
    save_corpus(&IndexPaths::new(output), &corpus, created_at)?;
    tracing::info!(output, "corpus persisted");
    Ok(())
}

fn validate_header(header: &str) -> Result<()> {
    let fields: Vec<&str> = header.split('\t').collect();
    if fields != COLUMNS {
        bail!("unexpected snapshot header: {header}");
    }
    Ok(())
}

/// Parse one snapshot row. Rows missing rating, votes, or year (sentinel,
/// empty, or unparseable) are rejected here so only well-formed records
/// reach the corpus.
fn parse_row(line: &str) -> Option<RawRecord> {
    let fields: Vec<&str> = line.split('\t').collect();
    let [id, primary_title, original_title, year, genres, average_rating, num_votes, cast_names] =
        fields[..]
    else {
        tracing::warn!(columns = fields.len(), "malformed row, skipping");
        return None;
    };

    let year = year.trim();
    if year.is_empty() || year == MISSING_SENTINEL {
        return None;
    }
    let average_rating: f32 = parse_required(average_rating)?;
    let num_votes: u64 = parse_required(num_votes)?;

    Some(RawRecord {
        id: id.trim().to_string(),
        primary_title: primary_title.to_string(),
        original_title: original_title.to_string(),
        year: year.to_string(),
        genres: genres.to_string(),
        cast_names: cast_names.to_string(),
        average_rating,
        num_votes,
    })
}

fn parse_required<T: std::str::FromStr>(field: &str) -> Option<T> {
    let field = field.trim();
    if field.is_empty() || field == MISSING_SENTINEL {
        return None;
    }
    field.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROW: &str = "tt0000001\tThe Terminal\tN/A\t2004\tComedy,Drama\t7.4\t512000\tTom Hanks, Catherine Zeta-Jones";

    #[test]
    fn parses_a_well_formed_row() {
        let record = parse_row(ROW).unwrap();
        assert_eq!(record.id, "tt0000001");
        assert_eq!(record.year, "2004");
        assert_eq!(record.average_rating, 7.4);
        assert_eq!(record.num_votes, 512000);
        assert_eq!(record.cast_names, "Tom Hanks, Catherine Zeta-Jones");
    }

    #[test]
    fn rejects_rows_missing_required_fields() {
        let no_year = ROW.replace("\t2004\t", "\t\\N\t");
        assert!(parse_row(&no_year).is_none());

        let no_rating = ROW.replace("\t7.4\t", "\t\\N\t");
        assert!(parse_row(&no_rating).is_none());

        let bad_votes = ROW.replace("\t512000\t", "\tmany\t");
        assert!(parse_row(&bad_votes).is_none());
    }

    #[test]
    fn rejects_rows_with_wrong_column_count() {
        assert!(parse_row("tt1\tonly\tfour\tcolumns").is_none());
    }

    #[test]
    fn accepts_the_expected_header_only() {
        assert!(validate_header(&COLUMNS.join("\t")).is_ok());
        assert!(validate_header("tconst,primaryTitle").is_err());
    }

    #[test]
    fn sentinel_genres_and_cast_survive_into_the_record() {
        let row = "tt9\tSolo\t\\N\t1999\t\\N\t5.0\t10\t\\N";
        let record = parse_row(row).unwrap();
        assert_eq!(record.genres, "\\N");
        assert_eq!(record.cast_names, "\\N");
    }
}
