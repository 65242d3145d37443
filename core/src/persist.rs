use crate::corpus::{Corpus, CorpusStats, InvertedIndex, TitleIndex};
use crate::document::Document;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub const FORMAT_VERSION: u32 = 1;

/// Human-readable snapshot header; the binary artifacts hold the bulk data.
#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub version: u32,
    pub created_at: String,
    pub document_count: u32,
    pub average_doc_length: f32,
    pub max_rating: f32,
    pub max_votes: u64,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
    fn documents(&self) -> PathBuf {
        self.root.join("documents.bin")
    }
    fn index(&self) -> PathBuf {
        self.root.join("index.bin")
    }
    fn titles(&self) -> PathBuf {
        self.root.join("titles.bin")
    }
    fn meta(&self) -> PathBuf {
        self.root.join("meta.json")
    }
}

/// Persist the whole corpus snapshot into the index directory.
pub fn save_corpus(paths: &IndexPaths, corpus: &Corpus, created_at: String) -> Result<()> {
    create_dir_all(&paths.root)?;
    write_bincode(paths.documents(), &corpus.documents)?;
    write_bincode(paths.index(), &corpus.index)?;
    write_bincode(paths.titles(), &corpus.titles)?;

    let meta = MetaFile {
        version: FORMAT_VERSION,
        created_at,
        document_count: corpus.stats.document_count,
        average_doc_length: corpus.stats.average_doc_length,
        max_rating: corpus.stats.max_rating,
        max_votes: corpus.stats.max_votes,
    };
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(&meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

/// Load a corpus snapshot persisted by [`save_corpus`].
pub fn load_corpus(paths: &IndexPaths) -> Result<Corpus> {
    let documents: Vec<Document> = read_bincode(paths.documents())?;
    let index: InvertedIndex = read_bincode(paths.index())?;
    let titles: TitleIndex = read_bincode(paths.titles())?;
    let meta = load_meta(paths)?;
    Ok(Corpus {
        documents,
        index,
        titles,
        stats: CorpusStats {
            document_count: meta.document_count,
            average_doc_length: meta.average_doc_length,
            max_rating: meta.max_rating,
            max_votes: meta.max_votes,
        },
    })
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let mut f = File::open(paths.meta())?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}

fn write_bincode<T: Serialize>(path: PathBuf, value: &T) -> Result<()> {
    let mut f = File::create(path)?;
    let bytes = bincode::serialize(value)?;
    f.write_all(&bytes)?;
    Ok(())
}

fn read_bincode<T: serde::de::DeserializeOwned>(path: PathBuf) -> Result<T> {
    let mut f = File::open(path)?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    Ok(bincode::deserialize(&buf)?)
}
