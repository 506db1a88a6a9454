//! Azure provider backed by the `az` command-line client.
//!
//! Runs `az ... --output json` as a subprocess and parses stdout:
//! - account list / account show for subscriptions
//! - snapshot list per subscription
//! - disk show for existence checks
//! - snapshot delete (blocks until the long-running operation finishes)
//!
//! Failures are classified from stderr into not-found, authentication, and
//! everything else. Only not-found is ever treated as an answer.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Command;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{AccountScope, Provider, SnapshotListing};
use crate::error::{ProviderError, SweepError};
use crate::platform;

/// How the az client obtains its token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// Reuse whatever `az login` session already exists.
    AzureCli,
    ManagedIdentity {
        client_id: Option<String>,
    },
    ServicePrincipal {
        client_id: String,
        client_secret: String,
        tenant_id: String,
    },
}

pub struct AzCli {
    program: &'static str,
    /// Set for non-interactive logins; becomes AZURE_CONFIG_DIR.
    config_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct AzSubscription {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AzSnapshot {
    id: String,
    name: String,
    #[serde(default)]
    creation_data: Option<AzCreationData>,
    #[serde(default)]
    disk_size_gb: Option<u64>,
    #[serde(default)]
    time_created: Option<String>,
    #[serde(default)]
    tags: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AzCreationData {
    #[serde(default)]
    source_resource_id: Option<String>,
}

impl AzCli {
    /// Checks that az is installed and establishes the requested credential.
    pub fn connect(credential: &Credential) -> Result<Self, SweepError> {
        if !platform::az_available() {
            return Err(SweepError::Authentication(
                "az CLI not found (install the Azure CLI and make sure it is on PATH)".to_string(),
            ));
        }

        let program = platform::az_program();

        match credential {
            Credential::AzureCli => {
                info!(event = "auth.method_selected", method = "cli");
                Ok(AzCli { program, config_dir: None })
            }
            Credential::ManagedIdentity { client_id } => {
                info!(event = "auth.method_selected", method = "managed-identity");
                let mut args = vec!["login", "--identity"];
                if let Some(id) = client_id {
                    args.extend(["--username", id.as_str()]);
                }
                let cli = AzCli { program, config_dir: Some(private_profile_dir()?) };
                cli.login(&args)?;
                Ok(cli)
            }
            Credential::ServicePrincipal { client_id, client_secret, tenant_id } => {
                info!(event = "auth.method_selected", method = "service-principal");
                let args = [
                    "login",
                    "--service-principal",
                    "--username",
                    client_id.as_str(),
                    "--password",
                    client_secret.as_str(),
                    "--tenant",
                    tenant_id.as_str(),
                ];
                let cli = AzCli { program, config_dir: Some(private_profile_dir()?) };
                cli.login(&args)?;
                Ok(cli)
            }
        }
    }

    fn login(&self, args: &[&str]) -> Result<(), SweepError> {
        self.run(args)
            .map(|_| ())
            .map_err(|e| SweepError::Authentication(e.to_string()))
    }

    fn run(&self, args: &[&str]) -> Result<String, ProviderError> {
        // login args carry the secret, so only the verb is logged
        let verb = args.iter().take(2).copied().collect::<Vec<_>>().join(" ");
        debug!(event = "az.command", verb = %verb);

        let mut command = Command::new(self.program);
        command.args(args).args(["--output", "json", "--only-show-errors"]);
        if let Some(dir) = &self.config_dir {
            command.env("AZURE_CONFIG_DIR", dir);
        }

        let output = command
            .output()
            .map_err(|e| ProviderError::Api(format!("failed to run az: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_failure(&stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn private_profile_dir() -> Result<PathBuf, SweepError> {
    let dir = platform::az_profile_dir().ok_or_else(|| {
        SweepError::Config("could not determine data directory for the az profile".to_string())
    })?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

impl Provider for AzCli {
    fn list_scopes(&self) -> Result<Vec<AccountScope>, ProviderError> {
        let stdout = self.run(&["account", "list", "--refresh"])?;
        parse_subscriptions(&stdout)
    }

    fn get_scope(&self, id: &str) -> Result<AccountScope, ProviderError> {
        let stdout = self.run(&["account", "show", "--subscription", id])?;
        let sub: AzSubscription = serde_json::from_str(&stdout)
            .map_err(|e| ProviderError::Malformed(format!("account show: {e}")))?;
        Ok(AccountScope::new(sub.id, sub.name))
    }

    fn list_snapshots(&self, scope: &str) -> Result<Vec<SnapshotListing>, ProviderError> {
        let stdout = self.run(&["snapshot", "list", "--subscription", scope])?;
        parse_snapshots(&stdout)
    }

    fn get_disk(&self, scope: &str, resource_group: &str, name: &str) -> Result<(), ProviderError> {
        self.run(&[
            "disk",
            "show",
            "--subscription",
            scope,
            "--resource-group",
            resource_group,
            "--name",
            name,
        ])
        .map(|_| ())
    }

    fn delete_snapshot(&self, scope: &str, resource_group: &str, name: &str) -> Result<(), ProviderError> {
        self.run(&[
            "snapshot",
            "delete",
            "--subscription",
            scope,
            "--resource-group",
            resource_group,
            "--name",
            name,
        ])
        .map(|_| ())
    }
}

fn parse_subscriptions(stdout: &str) -> Result<Vec<AccountScope>, ProviderError> {
    let subs: Vec<AzSubscription> = serde_json::from_str(stdout)
        .map_err(|e| ProviderError::Malformed(format!("account list: {e}")))?;

    Ok(subs
        .into_iter()
        .map(|s| AccountScope::new(s.id, s.name))
        .collect())
}

fn parse_snapshots(stdout: &str) -> Result<Vec<SnapshotListing>, ProviderError> {
    let snapshots: Vec<AzSnapshot> = serde_json::from_str(stdout)
        .map_err(|e| ProviderError::Malformed(format!("snapshot list: {e}")))?;

    Ok(snapshots
        .into_iter()
        .map(|s| SnapshotListing {
            id: s.id,
            name: s.name,
            source_disk_id: s.creation_data.and_then(|c| c.source_resource_id),
            size_gb: s.disk_size_gb,
            time_created: s.time_created.as_deref().and_then(parse_time),
            tags: s.tags,
        })
        .collect())
}

fn parse_time(raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            warn!(event = "az.time_unparsable", value = %raw, error = %e);
            None
        }
    }
}

/// ARM error codes that mean the addressed resource is absent. Other codes
/// (InvalidResourceType, for one) may also say "could not be found" in
/// their text but describe a broken request, not a missing resource.
const NOT_FOUND_CODES: [&str; 3] = [
    "(ResourceNotFound)",
    "(ResourceGroupNotFound)",
    "(SubscriptionNotFound)",
];

/// Maps az stderr onto a provider fault. Authentication is checked first:
/// AADSTS messages say "was not found" about tenants and applications.
fn classify_failure(stderr: &str) -> ProviderError {
    let message = stderr.trim().to_string();

    if stderr.contains("az login") || stderr.contains("AADSTS") || stderr.contains("AuthenticationFailed") {
        return ProviderError::Authentication(message);
    }

    if NOT_FOUND_CODES.iter().any(|code| stderr.contains(code)) || is_unknown_subscription(stderr) {
        return ProviderError::NotFound(message);
    }

    ProviderError::Api(message)
}

/// az's own (code-less) messages for a `--subscription` it does not know.
fn is_unknown_subscription(stderr: &str) -> bool {
    (stderr.contains("Subscription '") && stderr.contains("' not found"))
        || (stderr.contains("The subscription of '") && stderr.contains("doesn't exist"))
}
