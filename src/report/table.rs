//! Terminal rendering for orphaned snapshots.
//!
//! - Summary: count, total size, per-subscription breakdown
//! - Detail table in discovery order

use crate::scan::SnapshotRecord;

const HEADERS: [&str; 5] = ["Subscription", "Resource Group", "Snapshot Name", "Size (GB)", "Created Time"];
const WIDTHS: [usize; 5] = [24, 24, 36, 10, 23];

pub fn render_summary(records: &[SnapshotRecord]) -> String {
    if records.is_empty() {
        return String::from("No orphaned snapshots found.\n");
    }

    let mut output = String::new();
    let total_gb: u64 = records.iter().map(|r| r.size_gb).sum();

    output.push_str("\n=== Orphaned Snapshots Summary ===\n");
    output.push_str(&format!("Total orphaned snapshots: {}\n", records.len()));
    output.push_str(&format!("Total size: {total_gb} GB\n"));

    // subscriptions in the order they were first seen
    let mut by_subscription: Vec<(&str, usize, u64)> = Vec::new();
    for record in records {
        match by_subscription
            .iter_mut()
            .find(|(name, _, _)| *name == record.subscription_name)
        {
            Some((_, count, size)) => {
                *count += 1;
                *size += record.size_gb;
            }
            None => by_subscription.push((record.subscription_name.as_str(), 1, record.size_gb)),
        }
    }

    output.push_str("\nBreakdown by subscription:\n");
    for (name, count, size) in by_subscription {
        output.push_str(&format!("  - {name}: {count} snapshots, {size} GB\n"));
    }

    output
}

pub fn render(records: &[SnapshotRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }

    let mut output = String::from("\nOrphaned Snapshots:\n");
    let rule = "-".repeat(WIDTHS.iter().sum::<usize>() + 2 * (WIDTHS.len() - 1));

    output.push_str(&row(&HEADERS.map(String::from)));
    output.push_str(&rule);
    output.push('\n');

    for record in records {
        output.push_str(&row(&[
            record.subscription_name.clone(),
            record.resource_group.clone(),
            record.name.clone(),
            record.size_gb.to_string(),
            record.created_time.clone(),
        ]));
    }

    output
}

fn row(cells: &[String; 5]) -> String {
    let cells: Vec<String> = cells
        .iter()
        .zip(WIDTHS)
        .enumerate()
        .map(|(i, (cell, width))| {
            let cell = truncate(cell, width);
            // size column is numeric
            if i == 3 {
                format!("{cell:>width$}")
            } else {
                format!("{cell:<width$}")
            }
        })
        .collect();

    format!("{}\n", cells.join("  ").trim_end())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{truncated}...")
    }
}
