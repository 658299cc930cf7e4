//! Record sources
//!
//! A source hands out the full sequence of JSON text records each time it is
//! scanned. Inference scans once and decoding scans again, so a source must
//! return the same records on every call.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A re-scannable sequence of JSON text records
pub trait RecordSource {
    /// Read every record, in order
    fn scan(&self) -> Result<Vec<String>>;
}

/// Records held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<String>,
}

impl MemorySource {
    pub fn new<I, S>(records: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            records: records.into_iter().map(Into::into).collect(),
        }
    }
}

impl RecordSource for MemorySource {
    fn scan(&self) -> Result<Vec<String>> {
        Ok(self.records.clone())
    }
}

/// JSON Lines file: one record per non-blank line
#[derive(Debug, Clone)]
pub struct JsonLinesSource {
    path: PathBuf,
}

impl JsonLinesSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for JsonLinesSource {
    fn scan(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Err(Error::FileNotFound {
                path: self.path.display().to_string(),
            });
        }

        let content = fs::read_to_string(&self.path)?;
        let records: Vec<String> = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect();

        debug!(path = %self.path.display(), records = records.len(), "Scanned JSON Lines file");
        Ok(records)
    }
}
