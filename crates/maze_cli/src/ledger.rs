//! Persistent run records.
//!
//! Every completed CLI run appends one [`RunRecord`] to a JSON Lines file.
//! The `leaderboard` command reads the most recent records back.
//!
//! # File format
//!
//! One JSON object per line, appended in run order:
//!
//! ```text
//! {"id":"…","timestamp":"2026-10-16T09:12:44Z","scenario":"Pi Estimation","method":"Antithetic",…}
//! ```

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::summary::RunSummary;

/// Ledger error types
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The ledger file could not be opened, read or written.
    #[error("Ledger I/O failed for {path}: {source}")]
    Io {
        /// Ledger file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A line is not a valid record.
    #[error("Malformed record at {path}:{line}: {source}")]
    Parse {
        /// Ledger file.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be encoded.
    #[error("Failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One persisted run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Unique record identifier.
    pub id: Uuid,
    /// When the run finished (UTC).
    pub timestamp: DateTime<Utc>,
    /// Challenge name, e.g. `Pi Estimation`.
    pub scenario: String,
    /// Technique name, e.g. `Antithetic`.
    pub method: String,
    /// Raw samples drawn.
    pub n_samples: usize,
    /// Exact value of the challenge.
    pub true_value: f64,
    /// Final estimate.
    pub estimated_value: f64,
    /// `|true_value - estimated_value|`
    pub error: f64,
    /// Standard error of the estimate.
    pub standard_error: f64,
    /// Wall-clock run time in seconds.
    pub computation_time: f64,
    /// Seed that replays the run.
    pub seed: u64,
}

impl RunRecord {
    /// Record for a finished run, stamped now.
    pub fn from_summary(summary: &RunSummary) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            scenario: summary.challenge.name().to_string(),
            method: summary.technique.name().to_string(),
            n_samples: summary.raw_samples,
            true_value: summary.true_value,
            estimated_value: summary.estimate,
            error: (summary.true_value - summary.estimate).abs(),
            standard_error: summary.standard_error,
            computation_time: summary.elapsed_secs,
            seed: summary.seed,
        }
    }
}

/// Append-only JSON Lines store of [`RunRecord`]s.
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    /// Ledger backed by `path`. The file is created on first append.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> LedgerError {
        LedgerError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Appends one record.
    pub fn append(&self, record: &RunRecord) -> Result<(), LedgerError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| self.io_error(e))?;

        info!(
            path = %self.path.display(),
            id = %record.id,
            scenario = %record.scenario,
            method = %record.method,
            "Run recorded"
        );
        Ok(())
    }

    /// Every record, in file order. A missing file is an empty ledger.
    pub fn load(&self) -> Result<Vec<RunRecord>, LedgerError> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Ledger not found, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let mut records = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| self.io_error(e))?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(|source| LedgerError::Parse {
                path: self.path.clone(),
                line: index + 1,
                source,
            })?;
            records.push(record);
        }
        Ok(records)
    }

    /// The `limit` most recent records, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<RunRecord>, LedgerError> {
        let mut records = self.load()?;
        // Stable sort: records sharing a timestamp keep append order, reversed
        records.reverse();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records.truncate(limit);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(method: &str, error: f64, minutes_ago: i64) -> RunRecord {
        RunRecord {
            id: Uuid::new_v4(),
            timestamp: Utc::now() - Duration::minutes(minutes_ago),
            scenario: "Pi Estimation".to_string(),
            method: method.to_string(),
            n_samples: 5_000,
            true_value: std::f64::consts::PI,
            estimated_value: std::f64::consts::PI + error,
            error,
            standard_error: 0.02,
            computation_time: 0.01,
            seed: 42,
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::new(dir.path().join("absent.jsonl"));
        assert!(ledger.load().unwrap().is_empty());
        assert!(ledger.recent(5).unwrap().is_empty());
    }

    #[test]
    fn test_append_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::new(dir.path().join("nested/dir/runs.jsonl"));

        let first = record("Standard", 0.01, 2);
        let second = record("Antithetic", 0.005, 1);
        ledger.append(&first).unwrap();
        ledger.append(&second).unwrap();

        let loaded = ledger.load().unwrap();
        assert_eq!(loaded, vec![first, second]);

        let contents = fs::read_to_string(ledger.path()).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn test_recent_is_newest_first_and_limited() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::new(dir.path().join("runs.jsonl"));

        for minutes_ago in [30, 10, 50, 20, 40] {
            ledger.append(&record("Standard", 0.01, minutes_ago)).unwrap();
        }

        let recent = ledger.recent(3).unwrap();
        assert_eq!(recent.len(), 3);
        assert!(recent[0].timestamp > recent[1].timestamp);
        assert!(recent[1].timestamp > recent[2].timestamp);

        let all = ledger.recent(100).unwrap();
        assert_eq!(all.len(), 5);
    }

    #[test]
    fn test_malformed_line_reports_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.jsonl");
        let ledger = Ledger::new(&path);
        ledger.append(&record("Standard", 0.01, 1)).unwrap();

        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "\n{{not json").unwrap();

        match ledger.load() {
            Err(LedgerError::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_record_from_summary() {
        use crate::summary::RunSummary;
        use maze_engine::estimate_pi;

        let result = estimate_pi(1_000, true, Some(3)).unwrap();
        let summary = RunSummary::new(
            &result,
            std::f64::consts::PI,
            std::time::Duration::from_millis(5),
        );
        let rec = RunRecord::from_summary(&summary);

        assert_eq!(rec.scenario, "Pi Estimation");
        assert_eq!(rec.method, "Antithetic");
        assert_eq!(rec.n_samples, 1_000);
        assert_eq!(rec.seed, 3);
        assert_eq!(rec.error, summary.absolute_error);
    }
}
