//! JSON export of orphaned snapshots.
//!
//! The file holds a generation timestamp and the records in discovery order.
//! `read` accepts anything `render` produces.

use std::fs;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::SweepError;
use crate::scan::SnapshotRecord;

#[derive(Debug, Serialize, Deserialize)]
pub struct Export {
    pub generated_at: String,
    pub orphaned_snapshots: Vec<SnapshotRecord>,
}

impl Export {
    pub fn new(records: &[SnapshotRecord], generated_at: DateTime<Utc>) -> Self {
        Export {
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            orphaned_snapshots: records.to_vec(),
        }
    }
}

pub fn render(records: &[SnapshotRecord]) -> Result<String, SweepError> {
    Ok(serde_json::to_string_pretty(&Export::new(records, Utc::now()))?)
}

/// Writes the export file. Nothing is written for an empty result.
pub fn export(records: &[SnapshotRecord], path: &Path) -> Result<bool, SweepError> {
    if records.is_empty() {
        info!(event = "export.skipped", reason = "no orphaned snapshots");
        return Ok(false);
    }

    fs::write(path, render(records)?)?;
    info!(event = "export.written", path = %path.display(), count = records.len());
    Ok(true)
}

pub fn read(path: &Path) -> Result<Export, SweepError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
