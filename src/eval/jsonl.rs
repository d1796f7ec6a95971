//! Newline-delimited JSON record reader shared by the gold and run loaders.

use crate::error::{EvalError, Result};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Returns true for lines that carry no record: blank, or a `#` comment.
pub fn is_skippable(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Lazily decodes one `T` per non-comment line.
///
/// Items are `(line_number, record)` with 1-based line numbers so shape errors
/// raised by callers can point back into the file.
pub struct JsonlRecords<R, T> {
    lines: Lines<R>,
    path: PathBuf,
    line_no: usize,
    _record: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> JsonlRecords<BufReader<File>, T> {
    /// Open a file for a single forward pass.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| EvalError::io(path, e))?;
        Ok(Self::new(BufReader::new(file), path))
    }
}

impl<R: BufRead, T: DeserializeOwned> JsonlRecords<R, T> {
    pub fn new(reader: R, path: impl Into<PathBuf>) -> Self {
        Self {
            lines: reader.lines(),
            path: path.into(),
            line_no: 0,
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<R: BufRead, T: DeserializeOwned> Iterator for JsonlRecords<R, T> {
    type Item = Result<(usize, T)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(EvalError::io(&self.path, e))),
            };
            self.line_no += 1;
            if is_skippable(&line) {
                continue;
            }
            let record = serde_json::from_str(line.trim()).map_err(|source| EvalError::Json {
                path: self.path.clone(),
                line: self.line_no,
                source,
            });
            return Some(record.map(|r| (self.line_no, r)));
        }
    }
}
