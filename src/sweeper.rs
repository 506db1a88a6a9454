//! Entry point for callers: scan, then optionally delete what the scan found.

use crate::clean::{self, CleanMode, CleanResult};
use crate::config::Config;
use crate::error::SweepError;
use crate::provider::Provider;
use crate::scan::{self, ScanResult, SnapshotRecord};

pub struct Sweeper<P: Provider> {
    provider: P,
    config: Config,
    last_scan: Option<ScanResult>,
}

impl<P: Provider> Sweeper<P> {
    pub fn new(provider: P, config: Config) -> Self {
        Sweeper {
            provider,
            config,
            last_scan: None,
        }
    }

    /// Rescans from scratch with an empty cache. Safe to call repeatedly;
    /// each call replaces the previous result, and a failed scan leaves none.
    pub fn find_orphaned_snapshots(&mut self) -> Result<&[SnapshotRecord], SweepError> {
        self.last_scan = None;
        let result = scan::run(&self.provider, &self.config)?;
        Ok(self.last_scan.insert(result).records.as_slice())
    }

    /// Deletes (or with `dry_run`, pretends to delete) the orphans from the
    /// most recent scan. The caller is responsible for any confirmation.
    pub fn delete_orphaned_snapshots(&self, dry_run: bool) -> Result<CleanResult, SweepError> {
        let scan = self.last_scan.as_ref().ok_or(SweepError::NoScan)?;
        Ok(clean::run(&self.provider, &scan.records, CleanMode::from_dry_run(dry_run)))
    }

    pub fn last_scan(&self) -> Option<&ScanResult> {
        self.last_scan.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
