use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::provider::{AccountScope, SnapshotListing};

/// Creation time shown when the provider did not report one.
pub const UNKNOWN_CREATED_TIME: &str = "Unknown";

const CREATED_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// An orphaned snapshot: its declared source disk could not be confirmed to
/// exist. Field names are the export format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub subscription_id: String,
    pub subscription_name: String,
    pub resource_group: String,
    pub name: String,
    pub id: String,
    pub source_disk_id: String,
    pub size_gb: u64,
    pub created_time: String,
    pub tags: BTreeMap<String, String>,
}

impl SnapshotRecord {
    /// Builds a record, applying defaults for everything the listing omitted.
    pub fn new(
        scope: &AccountScope,
        listing: &SnapshotListing,
        resource_group: &str,
        source_disk_id: &str,
    ) -> Self {
        SnapshotRecord {
            subscription_id: scope.id.clone(),
            subscription_name: scope.display_name.clone(),
            resource_group: resource_group.to_string(),
            name: listing.name.clone(),
            id: listing.id.clone(),
            source_disk_id: source_disk_id.to_string(),
            size_gb: listing.size_gb.unwrap_or(0),
            created_time: listing
                .time_created
                .map(|t| t.format(CREATED_TIME_FORMAT).to_string())
                .unwrap_or_else(|| UNKNOWN_CREATED_TIME.to_string()),
            tags: listing.tags.clone().unwrap_or_default(),
        }
    }
}
