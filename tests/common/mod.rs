use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use snapsweep::error::ProviderError;
use snapsweep::provider::{AccountScope, Provider, SnapshotListing};

/// In-memory cloud with call counters.
#[derive(Default)]
pub struct FakeCloud {
    pub scopes: Vec<AccountScope>,
    pub snapshots: HashMap<String, Vec<SnapshotListing>>,
    pub disks: HashSet<(String, String, String)>,
    pub failing_listings: HashSet<String>,
    pub failing_deletes: HashSet<String>,
    /// Subscriptions whose disk lookups fail with an expired token.
    pub expired_tokens: HashSet<String>,
    pub disk_lookups: RefCell<Vec<(String, String, String)>>,
    pub deletes: RefCell<Vec<(String, String, String)>>,
}

impl FakeCloud {
    pub fn with_scope(mut self, id: &str, name: &str) -> Self {
        self.scopes.push(AccountScope::new(id, name));
        self
    }

    pub fn with_snapshot(mut self, scope: &str, listing: SnapshotListing) -> Self {
        self.snapshots.entry(scope.to_string()).or_default().push(listing);
        self
    }

    pub fn with_disk(mut self, scope: &str, group: &str, name: &str) -> Self {
        self.disks
            .insert((scope.to_string(), group.to_string(), name.to_string()));
        self
    }

    pub fn disk_lookup_count(&self) -> usize {
        self.disk_lookups.borrow().len()
    }

    pub fn delete_count(&self) -> usize {
        self.deletes.borrow().len()
    }
}

impl Provider for FakeCloud {
    fn list_scopes(&self) -> Result<Vec<AccountScope>, ProviderError> {
        Ok(self.scopes.clone())
    }

    fn get_scope(&self, id: &str) -> Result<AccountScope, ProviderError> {
        self.scopes
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(id.to_string()))
    }

    fn list_snapshots(&self, scope: &str) -> Result<Vec<SnapshotListing>, ProviderError> {
        if self.failing_listings.contains(scope) {
            return Err(ProviderError::Api(format!("listing {scope} failed")));
        }
        Ok(self.snapshots.get(scope).cloned().unwrap_or_default())
    }

    fn get_disk(&self, scope: &str, group: &str, name: &str) -> Result<(), ProviderError> {
        let key = (scope.to_string(), group.to_string(), name.to_string());
        self.disk_lookups.borrow_mut().push(key.clone());
        if self.expired_tokens.contains(scope) {
            return Err(ProviderError::Authentication(format!("token for {scope} expired")));
        }
        if self.disks.contains(&key) {
            Ok(())
        } else {
            Err(ProviderError::NotFound(name.to_string()))
        }
    }

    fn delete_snapshot(&self, scope: &str, group: &str, name: &str) -> Result<(), ProviderError> {
        self.deletes
            .borrow_mut()
            .push((scope.to_string(), group.to_string(), name.to_string()));
        if self.failing_deletes.contains(name) {
            return Err(ProviderError::Api(format!("delete {name} failed")));
        }
        Ok(())
    }
}

pub fn disk_id(scope: &str, group: &str, name: &str) -> String {
    format!("/subscriptions/{scope}/resourceGroups/{group}/providers/Microsoft.Compute/disks/{name}")
}

pub fn snapshot(scope: &str, group: &str, name: &str, source: Option<String>) -> SnapshotListing {
    SnapshotListing {
        id: format!("/subscriptions/{scope}/resourceGroups/{group}/providers/Microsoft.Compute/snapshots/{name}"),
        name: name.to_string(),
        source_disk_id: source,
        ..Default::default()
    }
}
