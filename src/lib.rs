//! Finds Azure disk snapshots whose source disk no longer exists, reports
//! them, and optionally deletes them.
//!
//! The engine talks to the cloud only through [`provider::Provider`];
//! [`provider::az::AzCli`] implements it on top of the `az` command-line
//! client. [`sweeper::Sweeper`] is the entry point for callers.

pub mod clean;
pub mod cli;
pub mod config;
pub mod error;
pub mod platform;
pub mod provider;
pub mod report;
pub mod scan;
pub mod sweeper;
