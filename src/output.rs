//! Output formatting and persistence for dashboard snapshots.
//!
//! Supports pretty-printing, JSON serialization, and CSV append of the
//! KPI history.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::dashboard::DashboardSnapshot;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// One row of the KPI history CSV, written after every refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistoryRow {
    pub timestamp: DateTime<Utc>,
    pub municipality: Option<String>,
    pub viewport: Option<String>,
    pub projects: usize,
    pub total_units: f64,
    pub total_available: f64,
    pub average_absorption: f64,
    pub population_total: f64,
    pub error_message: Option<String>,
}

/// Logs a snapshot using Rust's debug pretty-print format.
pub fn print_pretty(snapshot: &DashboardSnapshot) {
    debug!("{:#?}", snapshot);
}

/// Logs a snapshot as pretty-printed JSON.
pub fn print_json(snapshot: &DashboardSnapshot) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(snapshot)?);
    Ok(())
}

/// Appends a [`HistoryRow`] to a CSV file.
///
/// Creates the file, and any missing parent directories, with headers if it
/// does not already exist.
pub fn append_record(path: &str, row: &HistoryRow) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating directory for {path}"))?;
        }
    }

    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .with_context(|| format!("opening {path}"))?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // headers only on the first write
        .from_writer(file);

    writer.serialize(row)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{AppState, Panel};
    use std::fs;

    fn snapshot() -> DashboardSnapshot {
        DashboardSnapshot {
            timestamp: Utc::now(),
            state: AppState::default(),
            population: Panel {
                value: Default::default(),
                error: None,
            },
            inventory: Panel {
                value: Default::default(),
                error: None,
            },
            kpis: Panel {
                value: Default::default(),
                error: Some("timeout".to_string()),
            },
        }
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&snapshot());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&snapshot()).unwrap();
    }

    #[test]
    fn test_append_record_creates_file_and_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/history.csv").display().to_string();

        append_record(&path, &HistoryRow::default()).unwrap();

        assert!(Path::new(&path).exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("timestamp,municipality,viewport,projects"));
    }

    #[test]
    fn test_append_record_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv").display().to_string();

        let row = snapshot().history_row();
        append_record(&path, &row).unwrap();
        append_record(&path, &row).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines.iter().filter(|l| l.starts_with("timestamp")).count(), 1);
        assert!(lines[1].ends_with("timeout"));
    }
}
