//! Orphaned snapshot detection.
//!
//! Subscriptions are scanned one at a time. Within a subscription every
//! snapshot that declares a source disk is checked against the existence
//! cache; snapshots whose disk is gone become records. A subscription that
//! fails to enumerate is skipped and contributes nothing.

pub mod accounts;
pub mod cache;
pub mod record;
pub mod resource_id;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::SweepError;
use crate::provider::{AccountScope, Provider};
use cache::ExistenceCache;
pub use record::SnapshotRecord;

#[derive(Debug)]
pub struct ScanResult {
    pub records: Vec<SnapshotRecord>,
    pub scopes_scanned: usize,
    pub scopes_failed: usize,
    pub diagnostics: Vec<String>,
    pub duration_ms: Option<u128>,
    pub peak_memory_bytes: Option<usize>,
}

impl ScanResult {
    pub fn empty() -> Self {
        ScanResult {
            records: Vec::new(),
            scopes_scanned: 0,
            scopes_failed: 0,
            diagnostics: Vec::new(),
            duration_ms: None,
            peak_memory_bytes: None,
        }
    }
}

/// State for exactly one scan: the existence cache and the record
/// accumulator. Built fresh per scan and consumed by `finish`.
pub struct ScanSession<'p, P: Provider + ?Sized> {
    provider: &'p P,
    cache: ExistenceCache,
    result: ScanResult,
}

impl<'p, P: Provider + ?Sized> ScanSession<'p, P> {
    pub fn new(provider: &'p P) -> Self {
        ScanSession {
            provider,
            cache: ExistenceCache::new(),
            result: ScanResult::empty(),
        }
    }

    /// Scans one subscription and appends its orphans in listing order.
    /// On error nothing from this subscription is appended.
    pub fn scan_scope(&mut self, scope: &AccountScope) -> Result<usize, SweepError> {
        info!(
            event = "scan.scope_started",
            subscription = %scope.id,
            name = %scope.display_name
        );

        let listings = self
            .provider
            .list_snapshots(&scope.id)
            .map_err(|e| SweepError::enumeration(&scope.id, e))?;

        info!(event = "scan.snapshots_listed", subscription = %scope.id, count = listings.len());

        let mut found = Vec::new();

        for listing in &listings {
            // no declared origin means nothing to be orphaned from
            let Some(source) = listing.source_disk() else {
                continue;
            };

            if self.cache.exists(self.provider, &scope.id, source)? {
                continue;
            }

            let Some(group) = resource_id::resource_group_of(&listing.id) else {
                let msg = format!(
                    "{}: snapshot {} has an unparsable id ({}), skipped",
                    scope.id, listing.name, listing.id
                );
                warn!(event = "scan.snapshot_id_invalid", subscription = %scope.id, snapshot = %listing.name);
                self.result.diagnostics.push(msg);
                continue;
            };

            found.push(SnapshotRecord::new(scope, listing, group, source));
        }

        let count = found.len();
        self.result.records.extend(found);
        self.result.scopes_scanned += 1;

        info!(event = "scan.scope_completed", subscription = %scope.id, orphaned = count);
        Ok(count)
    }

    /// Scans every scope in order. Enumeration failures skip the scope;
    /// fatal errors (authentication) end the scan.
    pub fn scan_all(&mut self, scopes: &[AccountScope]) -> Result<(), SweepError> {
        for scope in scopes {
            match self.scan_scope(scope) {
                Ok(_) => {}
                Err(e) if !e.is_fatal() => {
                    error!(event = "scan.scope_failed", subscription = %scope.id, error = %e);
                    self.result.diagnostics.push(e.to_string());
                    self.result.scopes_failed += 1;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    pub fn cache(&self) -> &ExistenceCache {
        &self.cache
    }

    pub fn finish(self) -> ScanResult {
        self.result
    }
}

/// Resolves subscriptions and scans them with a fresh session.
pub fn run<P: Provider + ?Sized>(provider: &P, config: &Config) -> Result<ScanResult, SweepError> {
    let start = std::time::Instant::now();

    let scopes = accounts::resolve(provider, config.subscription_id.as_deref())?;

    let mut session = ScanSession::new(provider);
    session.scan_all(&scopes)?;

    let mut result = session.finish();
    result.duration_ms = Some(start.elapsed().as_millis());
    result.peak_memory_bytes = memory_stats::memory_stats().map(|m| m.physical_mem);

    info!(
        event = "scan.completed",
        orphaned = result.records.len(),
        subscriptions = scopes.len(),
        failed = result.scopes_failed
    );

    Ok(result)
}
