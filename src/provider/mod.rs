pub mod az;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// A subscription the credential can see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountScope {
    pub id: String,
    pub display_name: String,
}

impl AccountScope {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        AccountScope {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// One snapshot as listed by the provider. Every field the provider may omit
/// is optional here; defaults are applied when a record is built from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotListing {
    pub id: String,
    pub name: String,
    pub source_disk_id: Option<String>,
    pub size_gb: Option<u64>,
    pub time_created: Option<DateTime<Utc>>,
    pub tags: Option<BTreeMap<String, String>>,
}

impl SnapshotListing {
    /// The declared source disk, treating an empty string as no reference.
    pub fn source_disk(&self) -> Option<&str> {
        self.source_disk_id.as_deref().filter(|s| !s.is_empty())
    }
}

/// Everything the engine needs from the cloud. Calls are synchronous and
/// return only once the provider has answered; per-scope calls take the
/// subscription id they apply to.
pub trait Provider {
    fn list_scopes(&self) -> Result<Vec<AccountScope>, ProviderError>;
    fn get_scope(&self, id: &str) -> Result<AccountScope, ProviderError>;
    fn list_snapshots(&self, scope: &str) -> Result<Vec<SnapshotListing>, ProviderError>;

    /// `Ok(())` when the disk exists, `ProviderError::NotFound` when it
    /// definitively does not.
    fn get_disk(&self, scope: &str, resource_group: &str, name: &str) -> Result<(), ProviderError>;

    /// Deletes a snapshot and waits for the provider to confirm completion.
    fn delete_snapshot(&self, scope: &str, resource_group: &str, name: &str) -> Result<(), ProviderError>;
}

impl<P: Provider + ?Sized> Provider for &P {
    fn list_scopes(&self) -> Result<Vec<AccountScope>, ProviderError> {
        (**self).list_scopes()
    }

    fn get_scope(&self, id: &str) -> Result<AccountScope, ProviderError> {
        (**self).get_scope(id)
    }

    fn list_snapshots(&self, scope: &str) -> Result<Vec<SnapshotListing>, ProviderError> {
        (**self).list_snapshots(scope)
    }

    fn get_disk(&self, scope: &str, resource_group: &str, name: &str) -> Result<(), ProviderError> {
        (**self).get_disk(scope, resource_group, name)
    }

    fn delete_snapshot(&self, scope: &str, resource_group: &str, name: &str) -> Result<(), ProviderError> {
        (**self).delete_snapshot(scope, resource_group, name)
    }
}
