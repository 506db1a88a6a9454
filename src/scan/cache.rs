//! Memoized disk existence checks for one scan.
//!
//! Only definitive answers are stored: the disk was found, the provider said
//! it does not exist, or the identifier cannot name a disk at all. Transient
//! provider faults propagate and leave the key unset.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::resource_id::ResourceId;
use crate::error::SweepError;
use crate::provider::Provider;

#[derive(Debug, Default)]
pub struct ExistenceCache {
    entries: HashMap<(String, String), bool>,
}

impl ExistenceCache {
    pub fn new() -> Self {
        ExistenceCache::default()
    }

    pub fn exists<P: Provider + ?Sized>(
        &mut self,
        provider: &P,
        scope: &str,
        resource_id: &str,
    ) -> Result<bool, SweepError> {
        if let Some(&known) = self.get(scope, resource_id) {
            debug!(event = "cache.hit", subscription = scope, resource_id, exists = known);
            return Ok(known);
        }

        let disk = match ResourceId::parse_disk(resource_id) {
            Ok(disk) => disk,
            Err(e) => {
                warn!(event = "cache.invalid_identifier", subscription = scope, error = %e);
                return Ok(self.insert(scope, resource_id, false));
            }
        };

        match provider.get_disk(scope, disk.resource_group, disk.name) {
            Ok(()) => Ok(self.insert(scope, resource_id, true)),
            Err(e) if e.is_not_found() => Ok(self.insert(scope, resource_id, false)),
            Err(e) => Err(SweepError::enumeration(scope, e)),
        }
    }

    pub fn get(&self, scope: &str, resource_id: &str) -> Option<&bool> {
        self.entries.get(&(scope.to_string(), resource_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, scope: &str, resource_id: &str, exists: bool) -> bool {
        self.entries
            .insert((scope.to_string(), resource_id.to_string()), exists);
        exists
    }
}
