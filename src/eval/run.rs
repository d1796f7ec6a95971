//! Run Loader: per-query ranked predictions from a single JSON-lines file.

use crate::error::{EvalError, Result};
use crate::eval::jsonl::JsonlRecords;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// One run file line as written on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct RunRecord {
    #[serde(default)]
    pub query_id: Option<String>,
    #[serde(default)]
    pub ranked_chunk_ids: Vec<String>,
}

/// A validated run line. `ranked_ids` keeps the predicted order and any duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunEntry {
    pub query_id: String,
    pub ranked_ids: Vec<String>,
}

impl RunRecord {
    pub fn into_entry(self, path: &Path, line: usize) -> Result<RunEntry> {
        let query_id = self.query_id.ok_or_else(|| EvalError::MissingField {
            path: path.to_path_buf(),
            line,
            field: "query_id",
        })?;
        Ok(RunEntry {
            query_id,
            ranked_ids: self.ranked_chunk_ids,
        })
    }
}

/// Single-pass iterator over a run file. Re-open the file to read it again.
pub struct RunReader<R> {
    records: JsonlRecords<R, RunRecord>,
}

impl<R: BufRead> RunReader<R> {
    pub fn new(reader: R, path: impl Into<PathBuf>) -> Self {
        Self {
            records: JsonlRecords::new(reader, path),
        }
    }
}

impl<R: BufRead> Iterator for RunReader<R> {
    type Item = Result<RunEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.records.next()?;
        Some(next.and_then(|(line, record)| record.into_entry(self.records.path(), line)))
    }
}

/// Open a run file for lazy reading.
pub fn read_run(path: &Path) -> Result<RunReader<BufReader<File>>> {
    Ok(RunReader {
        records: JsonlRecords::open(path)?,
    })
}
