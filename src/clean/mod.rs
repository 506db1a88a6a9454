//! Deletion engine.
//!
//! Deletes orphaned snapshots found by a scan:
//! - Dry run: logs what would be deleted, makes no provider calls at all
//! - Execute: deletes each snapshot and waits for the provider to finish
//!
//! Every item is independent. A failed delete is logged, counted, and the
//! batch moves on. Nothing is retried.
//!
//! Confirmation belongs to the caller; this module never prompts.

use tracing::{error, info};

use crate::error::SweepError;
use crate::provider::Provider;
use crate::scan::SnapshotRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanMode {
    DryRun,
    Execute,
}

impl CleanMode {
    pub fn from_dry_run(dry_run: bool) -> Self {
        if dry_run {
            CleanMode::DryRun
        } else {
            CleanMode::Execute
        }
    }
}

#[derive(Debug, Default)]
pub struct CleanResult {
    pub succeeded: usize,
    pub failed: usize,
    /// One line per handled snapshot, "would delete" lines in a dry run.
    pub deleted: Vec<String>,
    pub errors: Vec<SweepError>,
    pub gb_freed: u64,
}

impl CleanResult {
    pub fn counts(&self) -> (usize, usize) {
        (self.succeeded, self.failed)
    }
}

pub fn run<P: Provider + ?Sized>(provider: &P, records: &[SnapshotRecord], mode: CleanMode) -> CleanResult {
    let mut result = CleanResult::default();

    if records.is_empty() {
        info!(event = "clean.nothing_to_delete");
        return result;
    }

    match mode {
        CleanMode::DryRun => {
            for record in records {
                info!(
                    event = "clean.dry_run",
                    snapshot = %record.name,
                    resource_group = %record.resource_group,
                    subscription = %record.subscription_id
                );
                result
                    .deleted
                    .push(format!("[dry-run] would delete: {}", location_display(record)));
                result.succeeded += 1;
                result.gb_freed += record.size_gb;
            }
        }
        CleanMode::Execute => {
            for record in records {
                match delete_record(provider, record) {
                    Ok(msg) => {
                        result.deleted.push(msg);
                        result.succeeded += 1;
                        result.gb_freed += record.size_gb;
                    }
                    Err(e) => {
                        error!(event = "clean.delete_failed", snapshot = %record.name, error = %e);
                        result.errors.push(e);
                        result.failed += 1;
                    }
                }
            }
        }
    }

    info!(event = "clean.completed", succeeded = result.succeeded, failed = result.failed);
    result
}

fn delete_record<P: Provider + ?Sized>(provider: &P, record: &SnapshotRecord) -> Result<String, SweepError> {
    info!(
        event = "clean.delete_started",
        snapshot = %record.name,
        resource_group = %record.resource_group,
        subscription = %record.subscription_id
    );

    provider
        .delete_snapshot(&record.subscription_id, &record.resource_group, &record.name)
        .map_err(|source| SweepError::Deletion {
            name: record.name.clone(),
            resource_group: record.resource_group.clone(),
            source,
        })?;

    info!(event = "clean.delete_completed", snapshot = %record.name);
    Ok(format!("deleted: {}", location_display(record)))
}

fn location_display(record: &SnapshotRecord) -> String {
    format!("{}/{} ({} GB)", record.resource_group, record.name, record.size_gb)
}
