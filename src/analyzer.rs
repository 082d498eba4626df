//! # Schema-Deduplication Analyzer
//!
//! Drives the split codec over streams of concatenated documents and
//! measures structural redundancy: how many distinct schemas a document set
//! contains, how often consecutive documents repeat a schema, and how a
//! bounded recency cache of schema fingerprints would perform.
//!
//! One `Analyzer` carries long-lived state across inputs - the LRU cache and
//! the cumulative hash trace - while per-input counters reset for each call
//! to `analyze`. Every document is additionally round-tripped through the
//! codec and compared byte-for-byte against the input as a sanity check.
//!
//! Two files are written per analyzed input: `schema-count` (one
//! `schema count <n>` line per distinct schema) and `schema-trace` (one
//! decimal fingerprint per document, cumulative).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use eyre::{ensure, eyre, Result, WrapErr};
use hashbrown::HashMap;
use log::info;
use lru::LruCache;

use crate::bson::raw::RawDocument;
use crate::bson::types::ElementType;
use crate::config::DEFAULT_CACHE_CAPACITY;
use crate::split::builder::SplitBuilder;

pub struct Analyzer {
    field_name: String,
    prefix: String,
    cache: LruCache<u32, bool>,
    trace: Vec<u32>,
    output_dir: PathBuf,
}

/// Per-input counters reported by [`Analyzer::analyze`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub docs: u64,
    /// Documents whose tracked field is a string starting with the prefix.
    pub occurrences: u64,
    pub distinct_schemas: usize,
    /// Documents whose schema fingerprint equals the previous document's.
    pub runs: u64,
    /// Cache misses within this input; the cache itself persists across
    /// inputs.
    pub misses: u64,
    /// Whole-percent cache hit rate over this input's documents.
    pub hit_rate: u64,
    /// Input bytes across all documents.
    pub doc_bytes: u64,
    /// Schema-stream bytes, counting each distinct schema once.
    pub schema_bytes: u64,
    /// Split payload bytes across all documents (fixed + variable).
    pub split_bytes: u64,
}

impl Analyzer {
    pub fn new(field_name: &str, prefix: &str, cache_capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(cache_capacity)
            .ok_or_else(|| eyre!("cache capacity must be nonzero"))?;
        Ok(Self {
            field_name: field_name.to_string(),
            prefix: prefix.to_string(),
            cache: LruCache::new(capacity),
            trace: Vec::new(),
            output_dir: PathBuf::from("."),
        })
    }

    /// Analyzer with a recency cache of
    /// [`DEFAULT_CACHE_CAPACITY`](crate::config::DEFAULT_CACHE_CAPACITY)
    /// fingerprints.
    pub fn with_default_capacity(field_name: &str, prefix: &str) -> Result<Self> {
        Self::new(field_name, prefix, DEFAULT_CACHE_CAPACITY)
    }

    /// Directory receiving `schema-count` and `schema-trace`. Defaults to
    /// the working directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Cumulative schema-fingerprint trace across every analyzed input.
    pub fn trace(&self) -> &[u32] {
        &self.trace
    }

    /// Analyzes one stream of concatenated documents. `label` names the
    /// input in logs and errors (typically its file path).
    pub fn analyze(&mut self, label: &str, data: &[u8]) -> Result<FileReport> {
        info!(
            "starting search for docs where {} starts with {}",
            self.field_name, self.prefix
        );

        let mut schema_count: HashMap<Vec<u8>, u64> = HashMap::new();
        let mut last_hash: Option<u32> = None;
        let mut docs = 0u64;
        let mut occurrences = 0u64;
        let mut runs = 0u64;
        let mut misses = 0u64;
        let mut doc_bytes = 0u64;
        let mut schema_bytes = 0u64;
        let mut split_bytes = 0u64;

        let mut pos = 0usize;
        while pos + 4 < data.len() {
            let doc = RawDocument::new(&data[pos..])
                .wrap_err_with(|| format!("document at offset {} in {}", pos, label))?;

            if let Some(field) = doc.get(&self.field_name)? {
                if field.element_type() == ElementType::String
                    && field.as_str()?.starts_with(&self.prefix)
                {
                    occurrences += 1;
                }
            }

            let mut builder = SplitBuilder::new();
            builder.append_elements(&doc)?;
            doc_bytes += doc.as_bytes().len() as u64;
            split_bytes += builder.data_size() as u64;

            let hash = builder.hash();
            let split = builder.release();
            let rebuilt = split.to_bytes()?;
            ensure!(
                rebuilt == doc.as_bytes(),
                "round-trip mismatch for document at offset {} in {}",
                pos,
                label
            );

            self.trace.push(hash);
            if self.cache.get(&hash).is_none() {
                misses += 1;
                self.cache.put(hash, true);
            }

            let count = schema_count.entry_ref(split.schema()).or_insert(0);
            if *count == 0 {
                schema_bytes += split.schema_len() as u64;
            }
            *count += 1;

            if last_hash == Some(hash) {
                runs += 1;
            }
            last_hash = Some(hash);
            docs += 1;
            pos += doc.as_bytes().len();
        }

        self.write_schema_count(&schema_count)?;
        self.write_schema_trace()?;

        let hit_rate = if docs > 0 { (docs - misses) * 100 / docs } else { 0 };
        info!(
            "{} has {} docs, {} of which have {} starting with {}",
            label, docs, occurrences, self.field_name, self.prefix
        );
        info!(
            "{} has data size {}, schema size {}, split data size {}",
            label, doc_bytes, schema_bytes, split_bytes
        );
        info!("{} has {} different schemas", label, schema_count.len());
        info!(
            "{} has {} cases where the schema is unchanged in sequential docs",
            label, runs
        );
        info!(
            "{} had {} misses in cache of size {}: {}% hit rate",
            label,
            misses,
            self.cache.len(),
            hit_rate
        );

        Ok(FileReport {
            docs,
            occurrences,
            distinct_schemas: schema_count.len(),
            runs,
            misses,
            hit_rate,
            doc_bytes,
            schema_bytes,
            split_bytes,
        })
    }

    fn write_schema_count(&self, schema_count: &HashMap<Vec<u8>, u64>) -> Result<()> {
        let path = self.output_dir.join("schema-count");
        let file = File::create(&path)
            .wrap_err_with(|| format!("failed to create {}", path.display()))?;
        let mut out = BufWriter::new(file);
        for count in schema_count.values() {
            writeln!(out, "schema count {}", count)?;
        }
        Ok(())
    }

    fn write_schema_trace(&self) -> Result<()> {
        let path = self.output_dir.join("schema-trace");
        let file = File::create(&path)
            .wrap_err_with(|| format!("failed to create {}", path.display()))?;
        let mut out = BufWriter::new(file);
        for hash in &self.trace {
            writeln!(out, "{}", hash)?;
        }
        Ok(())
    }
}
