//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_PATH;

#[derive(Parser)]
#[command(name = "ipshield")]
#[command(author, version, about = "IP address allow-list authorization")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: PathBuf,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Check whether an IP address is authorized
    Check {
        /// IP address to check
        ip: String,

        /// Exit with an error if the address is not authorized
        #[arg(long)]
        strict: bool,
    },

    /// Validate the config file
    Validate,

    /// Manage the allowlist
    Allowlist {
        #[command(subcommand)]
        action: AllowlistAction,
    },

    /// Show version
    Version,
}

#[derive(Subcommand)]
pub enum AllowlistAction {
    /// Add an address, or a range when HIGH is given
    Add {
        /// IP address (or low end of the range)
        address: String,
        /// High end of the range
        high: Option<String>,
    },
    /// Remove an address or range (must match exactly as added)
    Del {
        /// IP address (or low end of the range)
        address: String,
        /// High end of the range
        high: Option<String>,
    },
    /// List allowlist entries
    List {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}
