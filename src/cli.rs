use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{AuthMethod, LogLevel};

#[derive(Parser)]
#[command(name = "snapsweep")]
#[command(about = "Find and clean up Azure snapshots whose source disk no longer exists")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Find orphaned snapshots and print them
    Scan(ScanArgs),

    /// Find orphaned snapshots and delete them
    Clean(CleanArgs),

    /// Print a previously exported scan
    Report(ReportArgs),
}

#[derive(Args, Debug, Default, Clone)]
pub struct GlobalArgs {
    /// Only scan this subscription (default: every accessible subscription)
    #[arg(long, global = true, env = "SNAPSWEEP_SUBSCRIPTION_ID")]
    pub subscription_id: Option<String>,

    /// How to authenticate
    #[arg(long, global = true, value_enum)]
    pub auth_method: Option<AuthMethod>,

    /// Client ID of a user-assigned managed identity
    #[arg(long, global = true, env = "MANAGED_IDENTITY_CLIENT_ID")]
    pub managed_identity_client_id: Option<String>,

    /// Service principal client ID
    #[arg(long, global = true, env = "AZURE_CLIENT_ID")]
    pub sp_client_id: Option<String>,

    /// Service principal client secret. It is passed to `az login` on the
    /// command line, where other local users can see it; prefer cli or
    /// managed-identity auth on shared hosts.
    #[arg(long, global = true, env = "AZURE_CLIENT_SECRET", hide_env_values = true)]
    pub sp_client_secret: Option<String>,

    /// Service principal tenant ID
    #[arg(long, global = true, env = "AZURE_TENANT_ID")]
    pub sp_tenant_id: Option<String>,

    /// Log level (RUST_LOG overrides)
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (default: ~/.config/snapsweep/config.toml or platform equivalent)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Show scan timing, memory and diagnostics
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Parser)]
pub struct ScanArgs {
    /// Output as JSON instead of table
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Write results to a JSON file
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Parser)]
pub struct CleanArgs {
    /// Show what would be deleted without deleting anything
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(long, default_value_t = false)]
    pub yes: bool,

    /// Write the scan results to a JSON file before deleting
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ReportArgs {
    /// JSON file written by `scan --export`
    #[arg(long)]
    pub input: PathBuf,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
