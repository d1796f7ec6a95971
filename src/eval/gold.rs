//! Gold Loader: labeled queries from one or more JSON-lines files.

use crate::error::{EvalError, Result};
use crate::eval::jsonl::JsonlRecords;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// One gold file line as written on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct GoldRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub positive_chunk_ids: Vec<String>,
}

/// A validated gold line: query id and its set of relevant chunk ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoldEntry {
    pub query_id: String,
    pub positive_ids: HashSet<String>,
}

impl GoldRecord {
    /// Validate the required `id` and collapse the positives into a set.
    pub fn into_entry(self, path: &Path, line: usize) -> Result<GoldEntry> {
        let query_id = self.id.ok_or_else(|| EvalError::MissingField {
            path: path.to_path_buf(),
            line,
            field: "id",
        })?;
        Ok(GoldEntry {
            query_id,
            positive_ids: self.positive_chunk_ids.into_iter().collect(),
        })
    }
}

/// Query id → relevant chunk ids. Read-only once loaded.
#[derive(Debug, Clone, Default)]
pub struct GoldIndex {
    entries: HashMap<String, HashSet<String>>,
}

impl GoldIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert with last-write-wins semantics. Returns true when an earlier
    /// entry for the same query was replaced.
    pub fn insert(&mut self, entry: GoldEntry) -> bool {
        self.entries
            .insert(entry.query_id, entry.positive_ids)
            .is_some()
    }

    pub fn get(&self, query_id: &str) -> Option<&HashSet<String>> {
        self.entries.get(query_id)
    }

    pub fn contains(&self, query_id: &str) -> bool {
        self.entries.contains_key(query_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<GoldEntry> for GoldIndex {
    fn from_iter<I: IntoIterator<Item = GoldEntry>>(iter: I) -> Self {
        let mut index = GoldIndex::new();
        for entry in iter {
            index.insert(entry);
        }
        index
    }
}

/// Expand glob patterns into concrete paths, preserving pattern order.
///
/// Paths within one pattern come back in the glob crate's sorted order. A
/// pattern that matches nothing contributes nothing.
pub fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let matches = glob::glob(pattern).map_err(|source| EvalError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;
        let before = paths.len();
        for entry in matches {
            match entry {
                Ok(path) => paths.push(path),
                Err(e) => {
                    let path = e.path().to_path_buf();
                    return Err(EvalError::io(path, std::io::Error::from(e)));
                }
            }
        }
        if paths.len() == before {
            log::warn!("Gold pattern matched no files: {}", pattern);
        }
    }
    Ok(paths)
}

/// Read one gold file into `index`. Returns the number of records read.
pub fn load_gold_file(path: &Path, index: &mut GoldIndex) -> Result<usize> {
    let mut count = 0;
    for record in JsonlRecords::<_, GoldRecord>::open(path)? {
        let (line, record) = record?;
        let entry = record.into_entry(path, line)?;
        let query_id = entry.query_id.clone();
        if index.insert(entry) {
            log::debug!("Gold entry '{}' overwritten by {}:{}", query_id, path.display(), line);
        }
        count += 1;
    }
    Ok(count)
}

/// Build the gold index from every file the patterns resolve to.
pub fn load_gold(patterns: &[String]) -> Result<GoldIndex> {
    let paths = expand_patterns(patterns)?;
    let mut index = GoldIndex::new();
    let mut records = 0;
    for path in &paths {
        records += load_gold_file(path, &mut index)?;
    }
    log::info!(
        "Loaded {} gold queries ({} records) from {} files",
        index.len(),
        records,
        paths.len()
    );
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn pattern(dir: &TempDir, glob: &str) -> String {
        format!("{}/{}", dir.path().display(), glob)
    }

    fn ids(index: &GoldIndex, query_id: &str) -> Vec<String> {
        let mut v: Vec<String> = index.get(query_id).unwrap().iter().cloned().collect();
        v.sort();
        v
    }

    #[test]
    fn test_load_gold_single_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("gold.jsonl"),
            "# labeled queries\n{\"id\":\"q1\",\"positive_chunk_ids\":[\"a\",\"b\",\"a\"]}\n\n{\"id\":\"q2\"}\n",
        )
        .unwrap();

        let index = load_gold(&[pattern(&dir, "*.jsonl")]).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(ids(&index, "q1"), vec!["a", "b"]);
        assert!(index.get("q2").unwrap().is_empty());
        assert!(!index.contains("q3"));
    }

    #[test]
    fn test_later_file_overwrites_earlier() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("a.jsonl"),
            "{\"id\":\"q1\",\"positive_chunk_ids\":[\"x\",\"y\"]}\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("b.jsonl"),
            "{\"id\":\"q1\",\"positive_chunk_ids\":[\"z\"]}\n",
        )
        .unwrap();

        let index = load_gold(&[pattern(&dir, "*.jsonl")]).unwrap();
        assert_eq!(ids(&index, "q1"), vec!["z"]);

        // Pattern order decides when patterns are given explicitly.
        let index = load_gold(&[pattern(&dir, "b.jsonl"), pattern(&dir, "a.jsonl")]).unwrap();
        assert_eq!(ids(&index, "q1"), vec!["x", "y"]);
    }

    #[test]
    fn test_pattern_without_matches_is_empty() {
        let dir = TempDir::new().unwrap();
        let index = load_gold(&[pattern(&dir, "*.jsonl")]).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_missing_id_is_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("gold.jsonl"),
            "{\"id\":\"q1\"}\n{\"positive_chunk_ids\":[\"a\"]}\n",
        )
        .unwrap();

        let err = load_gold(&[pattern(&dir, "*.jsonl")]).unwrap_err();
        match err {
            EvalError::MissingField { field, line, .. } => {
                assert_eq!(field, "id");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_invalid_pattern_is_error() {
        let err = load_gold(&["gold/[".to_string()]).unwrap_err();
        assert!(matches!(err, EvalError::Pattern { .. }));
    }

    #[test]
    fn test_index_from_entries_last_wins() {
        let entry = |id: &str, pos: &[&str]| GoldEntry {
            query_id: id.to_string(),
            positive_ids: pos.iter().map(|s| s.to_string()).collect(),
        };
        let index: GoldIndex = vec![entry("q", &["a"]), entry("q", &["b"])]
            .into_iter()
            .collect();
        assert_eq!(index.len(), 1);
        assert_eq!(ids(&index, "q"), vec!["b"]);
    }
}
