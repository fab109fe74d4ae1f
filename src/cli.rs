//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for surveylinker using clap's derive macros.

use clap::{Parser, Subcommand};

/// Surveylinker - single-use NPS survey links
#[derive(Parser)]
#[command(name = "surveylinker")]
#[command(version)]
#[command(about = "Single-use NPS survey link service", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default when no command is given)
    Serve,

    /// Create a survey link
    CreateLink {
        /// Campaign identifier
        #[arg(long)]
        campaign: Option<String>,

        /// Expiry (RFC3339, YYYY-MM-DD or relative like "7d", "1d12h")
        #[arg(long)]
        expiry: Option<String>,
    },

    /// List survey links with their current status
    ListLinks {
        /// Campaign substring filter
        #[arg(long)]
        campaign: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print an admin bearer token for scripting
    IssueToken,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}
