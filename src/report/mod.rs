pub mod json;
pub mod table;

use crate::clean::{CleanMode, CleanResult};
use crate::config::Config;
use crate::error::SweepError;
use crate::scan::{ScanResult, SnapshotRecord};

pub fn print(result: &ScanResult, config: &Config) -> Result<(), SweepError> {
    print_records(&result.records, config.json_output)?;
    if !config.json_output {
        print_scan_info(result, config.verbose);
        print_diagnostics(result, config.verbose);
    }
    Ok(())
}

pub fn print_records(records: &[SnapshotRecord], json_output: bool) -> Result<(), SweepError> {
    if json_output {
        println!("{}", json::render(records)?);
    } else {
        print!("{}", table::render_summary(records));
        print!("{}", table::render(records));
    }
    Ok(())
}

pub fn print_clean(result: &CleanResult, mode: CleanMode) {
    for item in &result.deleted {
        println!("{item}");
    }

    if !result.errors.is_empty() {
        eprintln!("\nerrors encountered:");
        for error in &result.errors {
            eprintln!("  {error}");
        }
    }

    println!("\n=== Deletion Results ===");
    println!("Successful: {}", result.succeeded);
    println!("Failed: {}", result.failed);

    match mode {
        CleanMode::DryRun => println!("would free: {} GB", result.gb_freed),
        CleanMode::Execute => println!("freed: {} GB", result.gb_freed),
    }
}

fn print_scan_info(result: &ScanResult, verbose: bool) {
    if !verbose {
        return;
    }

    if let Some(duration_ms) = result.duration_ms {
        let duration_sec = duration_ms as f64 / 1000.0;
        println!("\nscan completed in {duration_sec:.2}s");
    }

    println!(
        "subscriptions scanned: {}, failed: {}",
        result.scopes_scanned, result.scopes_failed
    );

    if let Some(peak_bytes) = result.peak_memory_bytes {
        println!("peak memory: {:.1} MB", peak_bytes as f64 / 1_024_f64 / 1_024_f64);
    }
}

fn print_diagnostics(result: &ScanResult, verbose: bool) {
    if result.diagnostics.is_empty() {
        return;
    }

    println!();
    if verbose {
        println!("Diagnostics:");
        println!("{}", "-".repeat(40));
        for diagnostic in &result.diagnostics {
            println!("  {diagnostic}");
        }
    } else {
        for diagnostic in &result.diagnostics {
            println!("[diagnostic] {diagnostic}");
        }
    }
}
