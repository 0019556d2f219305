//! `leaderboard` command implementation
//!
//! Prints the most recent run records, newest first.

use std::io::Write;

use crate::config::RunnerConfig;
use crate::ledger::{Ledger, RunRecord};
use crate::summary::OutputFormat;
use crate::Result;

/// Leaderboard as a table.
pub fn render_leaderboard(records: &[RunRecord]) -> String {
    if records.is_empty() {
        return "No runs recorded yet.".to_string();
    }

    let mut lines = vec![format!(
        "{:<20} {:<22} {:<11} {:>10} {:>10} {:>9}",
        "Time (UTC)", "Scenario", "Method", "Samples", "Error", "Time (s)"
    )];
    for record in records {
        lines.push(format!(
            "{:<20} {:<22} {:<11} {:>10} {:>10.5} {:>9.4}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            record.scenario,
            record.method,
            record.n_samples,
            record.error,
            record.computation_time
        ));
    }
    lines.join("\n")
}

/// Run the leaderboard command
pub fn run<W: Write>(
    config: &RunnerConfig,
    limit: Option<usize>,
    format: OutputFormat,
    out: &mut W,
) -> Result<Vec<RunRecord>> {
    let ledger = Ledger::new(&config.ledger_path);
    let records = ledger.recent(limit.unwrap_or(config.leaderboard_size))?;

    match format {
        OutputFormat::Table => writeln!(out, "{}", render_leaderboard(&records))?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&records)?)?,
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::RunSummary;
    use maze_engine::estimate_pi;
    use std::time::Duration;

    #[test]
    fn test_empty_leaderboard() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunnerConfig {
            ledger_path: dir.path().join("none.jsonl"),
            ..Default::default()
        };

        let mut out = Vec::new();
        let records = run(&config, None, OutputFormat::Table, &mut out).unwrap();
        assert!(records.is_empty());
        assert!(String::from_utf8(out).unwrap().contains("No runs recorded"));
    }

    #[test]
    fn test_leaderboard_respects_limit() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunnerConfig {
            ledger_path: dir.path().join("runs.jsonl"),
            leaderboard_size: 2,
            ..Default::default()
        };
        let ledger = Ledger::new(&config.ledger_path);
        for seed in 0..4 {
            let result = estimate_pi(100, seed % 2 == 0, Some(seed)).unwrap();
            let summary = RunSummary::new(&result, std::f64::consts::PI, Duration::from_millis(1));
            ledger.append(&RunRecord::from_summary(&summary)).unwrap();
        }

        let mut out = Vec::new();
        assert_eq!(run(&config, None, OutputFormat::Table, &mut out).unwrap().len(), 2);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("Pi Estimation"));

        let all = run(&config, Some(10), OutputFormat::Json, &mut Vec::new()).unwrap();
        assert_eq!(all.len(), 4);
    }
}
