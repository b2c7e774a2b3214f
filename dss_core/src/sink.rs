//! Append-only persistence for generated insights and predictions.
//!
//! Records are appended to JSONL (JSON Lines) files under the data
//! directory with file locking, so several processes can share them.

use crate::Result;
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// File under the data dir holding symptom analysis insights
pub const INSIGHTS_FILE: &str = "insights.jsonl";

/// File under the data dir holding risk predictions
pub const PREDICTIONS_FILE: &str = "predictions.jsonl";

/// Destination for generated records
pub trait RecordSink<T: ?Sized> {
    fn append(&mut self, record: &T) -> Result<()>;
}

/// JSONL-based sink with file locking
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl<T: Serialize + ?Sized> RecordSink<T> for JsonlSink {
    fn append(&mut self, record: &T) -> Result<()> {
        self.ensure_parent_dir()?;

        // Serialize before taking the lock so a bad record writes nothing
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        writer.write_all(line.as_bytes())?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!("Appended record to {:?}", self.path);
        Ok(())
    }
}

/// Read every record from a JSONL file
///
/// A missing file reads as empty. Lines that fail to parse are logged and
/// skipped.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<T>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse record at {:?} line {}: {}",
                    path,
                    line_num + 1,
                    e
                );
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} records from {:?}", records.len(), path);
    Ok(records)
}
