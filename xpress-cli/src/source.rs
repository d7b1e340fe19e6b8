// XPress CLI - Delimited-file data source
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Data source backed by a raw delimited export of the press data store.
//!
//! The file is read once; every fetch filters the loaded rows the way the
//! store would answer the corresponding query.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;
use xpress::{read_samples, PrepError, Sample, SampleQuery, SampleSource};

/// Raw samples loaded from a delimited file.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    samples: Vec<Sample>,
}

impl CsvSource {
    /// Load every row of `path`.
    pub fn open(path: impl AsRef<Path>, delimiter: u8) -> Result<Self, PrepError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(PrepError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            )));
        }

        let file = File::open(&path)?;
        let samples = read_samples(BufReader::new(file), delimiter)?;
        debug!("loaded {} raw rows from {}", samples.len(), path.display());
        Ok(Self { path, samples })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl SampleSource for CsvSource {
    fn fetch(&self, query: &SampleQuery) -> xpress::Result<Vec<Sample>> {
        query.validate()?;
        Ok(self
            .samples
            .iter()
            .filter(|s| query.matches(s))
            .cloned()
            .collect())
    }
}
