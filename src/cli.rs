//! Command-line interface definition for the ProbModelSEED client
//!
//! This module defines the CLI structure using clap's derive API: generic
//! method invocation, model listing, the method catalog, and keyring token
//! management.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_PATH;

/// probmodelseed - command-line client for the ProbModelSEED service
///
/// Calls ProbModelSEED JSON-RPC methods and prints their results as JSON.
#[derive(Parser, Debug, Clone)]
#[command(name = "probmodelseed")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "PROBMODELSEED_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Override the service URL from config
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Override the authorization token from config
    #[arg(long)]
    pub token: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Invoke any ProbModelSEED method and print its result
    Call {
        /// Method name, bare (`get_model`) or prefixed (`ProbModelSEED.get_model`)
        method: String,

        /// Input payload as a JSON literal
        #[arg(short, long, conflicts_with = "input_file")]
        input: Option<String>,

        /// Read the input payload from a JSON file
        #[arg(long)]
        input_file: Option<PathBuf>,
    },

    /// List the models owned by the authenticated user
    ListModels {
        /// Output raw JSON instead of a table
        #[arg(short, long)]
        json: bool,
    },

    /// Print the catalog of remote methods
    Methods,

    /// Manage the token stored in the OS keyring
    Auth {
        /// Token subcommand
        #[command(subcommand)]
        command: AuthCommand,
    },
}

/// Keyring token subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum AuthCommand {
    /// Store a token in the keyring
    Login {
        /// Token to store
        #[arg(short, long)]
        token: String,

        /// Keyring account; defaults to `auth.user_id` from config
        #[arg(short, long)]
        user_id: Option<String>,
    },

    /// Remove the stored token
    Logout {
        /// Keyring account; defaults to `auth.user_id` from config
        #[arg(short, long)]
        user_id: Option<String>,
    },

    /// Show which credentials requests will use
    Status,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
