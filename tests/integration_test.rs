mod common;

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use common::{disk_id, snapshot, FakeCloud};
use snapsweep::config::Config;
use snapsweep::error::SweepError;
use snapsweep::report::json;
use snapsweep::scan::cache::ExistenceCache;
use snapsweep::sweeper::Sweeper;

fn two_subscription_cloud() -> FakeCloud {
    let mut listed = snapshot("sub-a", "rg-a", "snap-full", Some(disk_id("sub-a", "rg-a", "gone-1")));
    listed.size_gb = Some(256);
    listed.time_created = Some(Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap());
    listed.tags = Some(BTreeMap::from([("team".to_string(), "data".to_string())]));

    FakeCloud::default()
        .with_scope("sub-a", "Alpha")
        .with_scope("sub-b", "Beta")
        .with_disk("sub-a", "rg-a", "live")
        .with_snapshot("sub-a", snapshot("sub-a", "rg-a", "snap1", Some(disk_id("sub-a", "rg-a", "gone-1"))))
        .with_snapshot("sub-a", snapshot("sub-a", "rg-a", "snap2", Some(disk_id("sub-a", "rg-a", "live"))))
        .with_snapshot("sub-a", snapshot("sub-a", "rg-a", "imported", None))
        .with_snapshot("sub-a", listed)
        .with_snapshot("sub-b", snapshot("sub-b", "rg-b", "snap-b", Some("legacy-vhd-uri".into())))
}

#[test]
fn finds_orphans_across_subscriptions_in_discovery_order() {
    let cloud = two_subscription_cloud();
    let mut sweeper = Sweeper::new(&cloud, Config::default());

    let records = sweeper.find_orphaned_snapshots().unwrap();
    let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["snap1", "snap-full", "snap-b"]);

    let snap1 = &records[0];
    assert_eq!(snap1.size_gb, 0);
    assert_eq!(snap1.created_time, "Unknown");
    assert!(snap1.tags.is_empty());
    assert_eq!(snap1.resource_group, "rg-a");

    let full = &records[1];
    assert_eq!(full.size_gb, 256);
    assert_eq!(full.created_time, "2023-06-01 12:00:00 UTC");
    assert_eq!(full.tags["team"], "data");

    assert_eq!(records[2].subscription_name, "Beta");
}

#[test]
fn same_missing_disk_is_looked_up_once() {
    let cloud = two_subscription_cloud();
    let mut sweeper = Sweeper::new(&cloud, Config::default());
    sweeper.find_orphaned_snapshots().unwrap();

    // gone-1 is referenced twice, live once, the legacy id never reaches the provider
    assert_eq!(cloud.disk_lookup_count(), 2);
}

#[test]
fn cached_existence_makes_no_further_calls() {
    let cloud = FakeCloud::default().with_disk("sub-a", "rg", "d1");
    let id = disk_id("sub-a", "rg", "d1");
    let mut cache = ExistenceCache::new();

    assert!(cache.exists(&cloud, "sub-a", &id).unwrap());
    assert!(cache.exists(&cloud, "sub-a", &id).unwrap());
    assert_eq!(cloud.disk_lookup_count(), 1);
}

#[test]
fn every_scan_starts_from_scratch() {
    let cloud = two_subscription_cloud();
    let mut sweeper = Sweeper::new(&cloud, Config::default());

    let first = sweeper.find_orphaned_snapshots().unwrap().to_vec();
    let second = sweeper.find_orphaned_snapshots().unwrap().to_vec();

    assert_eq!(first, second);
    assert_eq!(cloud.disk_lookup_count(), 4);
}

#[test]
fn explicit_subscription_limits_the_scan() {
    let cloud = two_subscription_cloud();
    let config = Config {
        subscription_id: Some("sub-b".into()),
        ..Config::default()
    };
    let mut sweeper = Sweeper::new(&cloud, config);

    let records = sweeper.find_orphaned_snapshots().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].subscription_id, "sub-b");
}

#[test]
fn unknown_subscription_is_fatal() {
    let cloud = two_subscription_cloud();
    let config = Config {
        subscription_id: Some("sub-z".into()),
        ..Config::default()
    };
    let mut sweeper = Sweeper::new(&cloud, config);

    let err = sweeper.find_orphaned_snapshots().unwrap_err();
    assert!(matches!(err, SweepError::ScopeNotFound(_)));
    assert!(err.is_fatal());
    assert!(sweeper.last_scan().is_none());
}

#[test]
fn failing_subscription_does_not_block_others() {
    let mut cloud = two_subscription_cloud();
    cloud.failing_listings.insert("sub-a".into());
    let mut sweeper = Sweeper::new(&cloud, Config::default());

    let records = sweeper.find_orphaned_snapshots().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "snap-b");

    let scan = sweeper.last_scan().unwrap();
    assert_eq!(scan.scopes_failed, 1);
    assert_eq!(scan.scopes_scanned, 1);
}

#[test]
fn expired_credentials_abort_the_scan() {
    let mut cloud = two_subscription_cloud();
    cloud.expired_tokens.insert("sub-a".into());
    let mut sweeper = Sweeper::new(&cloud, Config::default());

    let err = sweeper.find_orphaned_snapshots().unwrap_err();
    assert!(matches!(err, SweepError::Authentication(_)));
    assert!(err.is_fatal());
    assert!(sweeper.last_scan().is_none());
    assert!(matches!(
        sweeper.delete_orphaned_snapshots(false),
        Err(SweepError::NoScan)
    ));
    assert_eq!(cloud.delete_count(), 0);
}

#[test]
fn no_subscriptions_means_no_orphans() {
    let cloud = FakeCloud::default();
    let mut sweeper = Sweeper::new(&cloud, Config::default());

    assert!(sweeper.find_orphaned_snapshots().unwrap().is_empty());
    let result = sweeper.delete_orphaned_snapshots(false).unwrap();
    assert_eq!(result.counts(), (0, 0));
    assert_eq!(cloud.delete_count(), 0);
}

#[test]
fn delete_before_scan_fails() {
    let cloud = FakeCloud::default();
    let sweeper = Sweeper::new(&cloud, Config::default());

    assert!(matches!(
        sweeper.delete_orphaned_snapshots(true),
        Err(SweepError::NoScan)
    ));
}

#[test]
fn dry_run_never_calls_delete() {
    let cloud = two_subscription_cloud();
    let mut sweeper = Sweeper::new(&cloud, Config::default());
    let found = sweeper.find_orphaned_snapshots().unwrap().len();

    let result = sweeper.delete_orphaned_snapshots(true).unwrap();
    assert_eq!(result.counts(), (found, 0));
    assert_eq!(cloud.delete_count(), 0);
}

#[test]
fn third_delete_failing_does_not_abort_batch() {
    let mut cloud = FakeCloud::default().with_scope("sub-a", "Alpha");
    for i in 1..=5 {
        let name = format!("snap{i}");
        cloud = cloud.with_snapshot(
            "sub-a",
            snapshot("sub-a", "rg", &name, Some(disk_id("sub-a", "rg", &format!("gone{i}")))),
        );
    }
    cloud.failing_deletes.insert("snap3".into());

    let mut sweeper = Sweeper::new(&cloud, Config::default());
    sweeper.find_orphaned_snapshots().unwrap();
    let result = sweeper.delete_orphaned_snapshots(false).unwrap();

    assert_eq!(result.counts(), (4, 1));
    assert_eq!(cloud.delete_count(), 5);

    let deleted = cloud.deletes.borrow();
    assert_eq!(deleted[4], ("sub-a".to_string(), "rg".to_string(), "snap5".to_string()));
}

#[test]
fn export_round_trip_preserves_order() {
    let cloud = two_subscription_cloud();
    let mut sweeper = Sweeper::new(&cloud, Config::default());
    let records = sweeper.find_orphaned_snapshots().unwrap().to_vec();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("orphans.json");
    assert!(json::export(&records, &path).unwrap());

    let export = json::read(&path).unwrap();
    let tuples = |rs: &[snapsweep::scan::SnapshotRecord]| {
        rs.iter()
            .map(|r| (r.name.clone(), r.size_gb, r.resource_group.clone()))
            .collect::<Vec<_>>()
    };

    assert_eq!(tuples(&export.orphaned_snapshots), tuples(&records));
    assert_eq!(export.orphaned_snapshots, records);
}
