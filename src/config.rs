//! Run configuration.
//!
//! Values come from, in order of precedence: command-line flags and their
//! environment variables, the TOML config file, built-in defaults. The client
//! secret is never read from the file.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;

use crate::cli::GlobalArgs;
use crate::error::SweepError;
use crate::provider::az::Credential;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMethod {
    #[default]
    Cli,
    ManagedIdentity,
    ServicePrincipal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    #[value(name = "DEBUG", alias = "debug")]
    Debug,
    #[default]
    #[value(name = "INFO", alias = "info")]
    Info,
    #[value(name = "WARNING", alias = "warning")]
    Warning,
    #[value(name = "ERROR", alias = "error")]
    Error,
}

impl LogLevel {
    /// Directive understood by tracing's EnvFilter.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Contents of config.toml. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub subscription_id: Option<String>,
    pub auth_method: Option<AuthMethod>,
    pub log_level: Option<LogLevel>,
    pub managed_identity_client_id: Option<String>,
    pub sp_client_id: Option<String>,
    pub sp_tenant_id: Option<String>,
}

impl FileConfig {
    /// Loads the explicit path if given (it must exist), otherwise the
    /// default location if present.
    pub fn load(explicit: Option<&Path>) -> Result<Self, SweepError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(FileConfig::default()),
            },
        };

        let text = std::fs::read_to_string(&path)
            .map_err(|e| SweepError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::parse(&text).map_err(|e| SweepError::Config(format!("{}: {e}", path.display())))
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "snapsweep").map(|dirs| dirs.config_dir().join("config.toml"))
}

#[derive(Debug, Clone)]
pub struct Config {
    pub subscription_id: Option<String>,
    pub credential: Credential,
    pub log_level: LogLevel,
    pub verbose: bool,
    pub json_output: bool,
}

impl Config {
    pub fn resolve(args: &GlobalArgs, file: FileConfig) -> Result<Self, SweepError> {
        let method = args.auth_method.or(file.auth_method).unwrap_or_default();

        let credential = match method {
            AuthMethod::Cli => Credential::AzureCli,
            AuthMethod::ManagedIdentity => Credential::ManagedIdentity {
                client_id: args
                    .managed_identity_client_id
                    .clone()
                    .or(file.managed_identity_client_id),
            },
            AuthMethod::ServicePrincipal => {
                let client_id = args.sp_client_id.clone().or(file.sp_client_id);
                let tenant_id = args.sp_tenant_id.clone().or(file.sp_tenant_id);
                match (client_id, args.sp_client_secret.clone(), tenant_id) {
                    (Some(client_id), Some(client_secret), Some(tenant_id)) => Credential::ServicePrincipal {
                        client_id,
                        client_secret,
                        tenant_id,
                    },
                    _ => {
                        return Err(SweepError::Config(
                            "service principal authentication requires client ID, client secret, and tenant ID"
                                .to_string(),
                        ))
                    }
                }
            }
        };

        Ok(Config {
            subscription_id: args.subscription_id.clone().or(file.subscription_id),
            credential,
            log_level: args.log_level.or(file.log_level).unwrap_or_default(),
            verbose: args.verbose,
            json_output: false,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            subscription_id: None,
            credential: Credential::AzureCli,
            log_level: LogLevel::Info,
            verbose: false,
            json_output: false,
        }
    }
}
