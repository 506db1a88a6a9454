use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use snapsweep::clean::CleanMode;
use snapsweep::cli::{Cli, Command};
use snapsweep::config::{Config, FileConfig, LogLevel};
use snapsweep::error::SweepError;
use snapsweep::provider::az::AzCli;
use snapsweep::report::{self, json};
use snapsweep::sweeper::Sweeper;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging(level: LogLevel) {
    // RUST_LOG wins over --log-level when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

fn scan(sweeper: &mut Sweeper<AzCli>, export: Option<&std::path::Path>) -> Result<usize, SweepError> {
    sweeper.find_orphaned_snapshots()?;
    let result = sweeper.last_scan().ok_or(SweepError::NoScan)?;

    report::print(result, sweeper.config())?;

    if let Some(path) = export {
        if json::export(&result.records, path)? {
            eprintln!("exported {} snapshots to {}", result.records.len(), path.display());
        }
    }

    Ok(result.records.len())
}

fn run(cli: Cli) -> Result<(), SweepError> {
    let file = FileConfig::load(cli.global.config.as_deref())?;
    let mut config = Config::resolve(&cli.global, file)?;
    init_logging(config.log_level);

    match cli.command {
        Command::Report(args) => {
            let export = json::read(&args.input)?;
            report::print_records(&export.orphaned_snapshots, args.json)?;
            if !args.json {
                println!("\ngenerated at: {}", export.generated_at);
            }
        }
        Command::Scan(args) => {
            config.json_output = args.json;
            let provider = AzCli::connect(&config.credential)?;
            let mut sweeper = Sweeper::new(provider, config);

            scan(&mut sweeper, args.export.as_deref())?;
        }
        Command::Clean(args) => {
            let provider = AzCli::connect(&config.credential)?;
            let mut sweeper = Sweeper::new(provider, config);

            let found = scan(&mut sweeper, args.export.as_deref())?;

            if found > 0 && !args.dry_run && !args.yes {
                let proceed = confirm("\nWARNING: This will delete orphaned snapshots. Continue? [y/N]: ")?;
                if !proceed {
                    info!(event = "clean.cancelled");
                    println!("Deletion cancelled");
                    return Ok(());
                }
            }

            let mode = CleanMode::from_dry_run(args.dry_run);
            let result = sweeper.delete_orphaned_snapshots(args.dry_run)?;
            report::print_clean(&result, mode);
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
