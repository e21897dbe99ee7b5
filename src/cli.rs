//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for urlvault using clap's derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// urlvault - A multi-user URL shortener with per-user quotas
#[derive(Parser)]
#[command(name = "urlvault")]
#[command(version)]
#[command(about = "A multi-user URL shortener with per-user quotas", long_about = None)]
pub struct Cli {
    /// Configuration file path (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default when no command is given)
    Serve,

    /// Manage user accounts directly in the database
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Account management commands
#[derive(Subcommand)]
pub enum UserCommands {
    /// Create an account
    Create {
        /// Username (8-15 characters)
        user_id: String,

        /// Password (if not provided, will prompt interactively)
        #[arg(long)]
        password: Option<String>,

        /// Grant administrator privileges
        #[arg(long)]
        admin: bool,

        /// URL quota, defaults to links.default_url_limit
        #[arg(long)]
        limit: Option<i64>,
    },

    /// Grant or revoke administrator privileges
    SetAdmin {
        user_id: String,

        #[arg(action = clap::ArgAction::Set)]
        is_admin: bool,
    },

    /// Change an account's URL quota
    SetLimit {
        user_id: String,

        url_limit: i64,
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
