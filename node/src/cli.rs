//! # CLI Interface
//!
//! Defines the command-line argument structure for `attesta-node` using
//! `clap` derive. Supports three subcommands: `run`, `status`, and
//! `version`.

use clap::{Parser, Subcommand};

/// Attesta transcript registry node.
///
/// Serves the transcript registry over HTTP: issuance, amendment, lookup,
/// hash verification, and the administrative configuration endpoints.
/// Exposes Prometheus metrics on a separate port.
#[derive(Parser, Debug)]
#[command(
    name = "attesta-node",
    about = "Attesta transcript registry node",
    version,
    propagate_version = true
)]
pub struct AttestaNodeCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the Attesta node binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the registry node.
    Run(RunArgs),
    /// Query the status of a running node via its RPC endpoint.
    Status(StatusArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Port for the REST API.
    #[arg(long, env = "ATTESTA_RPC_PORT", default_value_t = 9751)]
    pub rpc_port: u16,

    /// Port for the Prometheus metrics endpoint.
    #[arg(long, env = "ATTESTA_METRICS_PORT", default_value_t = 9752)]
    pub metrics_port: u16,

    /// Initial issuance fee, in the ledger's smallest unit.
    ///
    /// Can be changed at runtime via `POST /admin/fee` once a fee
    /// recipient is configured.
    #[arg(long, env = "ATTESTA_ISSUANCE_FEE", default_value_t = 500)]
    pub issuance_fee: u64,

    /// Maximum number of transcripts the registry will ever issue.
    #[arg(long, env = "ATTESTA_MAX_TRANSCRIPTS", default_value_t = 1_000_000)]
    pub max_transcripts: u64,

    /// Address to seed into the issuer allow-list. Repeatable.
    ///
    /// Further issuers can be added at runtime via `POST /admin/issuers`.
    #[arg(long = "issuer", env = "ATTESTA_ISSUERS", value_delimiter = ',')]
    pub issuers: Vec<String>,

    /// Log output format: "pretty" or "json".
    #[arg(long, env = "ATTESTA_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,
}

/// Arguments for the `status` subcommand.
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// RPC endpoint of the running node.
    #[arg(long, default_value = "http://127.0.0.1:9751")]
    pub rpc_url: String,
}
